//! Purpose: Classify item material strings without ever rewriting them.
//! Exports: `MaterialTag`, `PluginSource`.
//! Role: Validation/reporting helper; the transcoder stores materials verbatim.
//! Invariants: `parse` is total; anything unrecognized is a vanilla name.

/// Third-party item plugins addressable through a material prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PluginSource {
    ItemsAdder,
    Oraxen,
    Nexo,
    MmoItems,
    ExecutableItems,
    ExecutableBlocks,
    SimpleItemGenerator,
}

impl PluginSource {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "itemsadder" => Some(Self::ItemsAdder),
            "oraxen" => Some(Self::Oraxen),
            "nexo" => Some(Self::Nexo),
            "mmoitems" => Some(Self::MmoItems),
            "executableitems" => Some(Self::ExecutableItems),
            "executableblocks" => Some(Self::ExecutableBlocks),
            "simpleitemgenerator" => Some(Self::SimpleItemGenerator),
            _ => None,
        }
    }
}

/// What a slot's `material` string points at: a vanilla name, or a
/// `prefix-payload` selecting a non-vanilla source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MaterialTag {
    Vanilla(String),
    PlayerHead(String),
    Base64Head(String),
    TextureHead(String),
    HeadDatabase(String),
    PluginItem { plugin: PluginSource, id: String },
    Placeholder(String),
    Equipment(String),
    Special(String),
}

const EQUIPMENT_SLOTS: &[&str] = &[
    "main_hand",
    "off_hand",
    "armor_helmet",
    "armor_chestplate",
    "armor_leggings",
    "armor_boots",
];

const SPECIAL_NAMES: &[&str] = &["air", "water_bottle"];

impl MaterialTag {
    pub fn parse(raw: &str) -> Self {
        let material = raw.trim();
        let lowered = material.to_ascii_lowercase();

        if EQUIPMENT_SLOTS.contains(&lowered.as_str()) {
            return Self::Equipment(lowered);
        }
        if SPECIAL_NAMES.contains(&lowered.as_str()) {
            return Self::Special(lowered);
        }

        if let Some((prefix, payload)) = material.split_once('-') {
            let payload = payload.to_string();
            return match prefix.to_ascii_lowercase().as_str() {
                "head" => Self::PlayerHead(payload),
                "basehead" => Self::Base64Head(payload),
                "texture" => Self::TextureHead(payload),
                "hdb" => Self::HeadDatabase(payload),
                "placeholder" => Self::Placeholder(payload),
                other => match PluginSource::from_prefix(other) {
                    Some(plugin) => Self::PluginItem {
                        plugin,
                        id: payload,
                    },
                    None => Self::Vanilla(material.to_string()),
                },
            };
        }

        Self::Vanilla(material.to_string())
    }

    /// The bare name to check against a material catalog, when one applies.
    pub fn vanilla_name(&self) -> Option<&str> {
        match self {
            Self::Vanilla(name) => Some(name.as_str()),
            _ => None,
        }
    }
}
