//! Purpose: Define the in-memory menu document model the transcoder round-trips.
//! Exports: `MenuSettings`, `MenuItem`, `InventoryType`, `RequirementGroup`, `Argument`,
//! `Enchantment`, `PotionEffect`, `BannerLayer`.
//! Invariants: The model is the single source of truth; YAML text is always derived.
//! Invariants: Field defaults here are the semantic defaults the deserializer falls back to.

use std::collections::BTreeSet;

use crate::core::requirement::Requirement;

pub const DEFAULT_MENU_SIZE: u32 = 54;
pub const DEFAULT_LORE_APPEND_MODE: &str = "OVERRIDE";

/// Container screens the downstream plugin can open. Only `CHEST` and
/// `BARREL` take a row count; the rest have fixed slot layouts. Unknown
/// names round-trip verbatim through `Other`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum InventoryType {
    #[default]
    Chest,
    EnderChest,
    Barrel,
    ShulkerBox,
    Hopper,
    Dispenser,
    Dropper,
    Furnace,
    BlastFurnace,
    Smoker,
    BrewingStand,
    Workbench,
    Anvil,
    Enchanting,
    Grindstone,
    Stonecutter,
    Cartography,
    Loom,
    Smithing,
    Other(String),
}

impl InventoryType {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "" | "CHEST" => Self::Chest,
            "ENDER_CHEST" => Self::EnderChest,
            "BARREL" => Self::Barrel,
            "SHULKER_BOX" => Self::ShulkerBox,
            "HOPPER" => Self::Hopper,
            "DISPENSER" => Self::Dispenser,
            "DROPPER" => Self::Dropper,
            "FURNACE" => Self::Furnace,
            "BLAST_FURNACE" => Self::BlastFurnace,
            "SMOKER" => Self::Smoker,
            "BREWING_STAND" => Self::BrewingStand,
            "WORKBENCH" => Self::Workbench,
            "ANVIL" => Self::Anvil,
            "ENCHANTING" => Self::Enchanting,
            "GRINDSTONE" => Self::Grindstone,
            "STONECUTTER" => Self::Stonecutter,
            "CARTOGRAPHY" => Self::Cartography,
            "LOOM" => Self::Loom,
            "SMITHING" => Self::Smithing,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Chest => "CHEST",
            Self::EnderChest => "ENDER_CHEST",
            Self::Barrel => "BARREL",
            Self::ShulkerBox => "SHULKER_BOX",
            Self::Hopper => "HOPPER",
            Self::Dispenser => "DISPENSER",
            Self::Dropper => "DROPPER",
            Self::Furnace => "FURNACE",
            Self::BlastFurnace => "BLAST_FURNACE",
            Self::Smoker => "SMOKER",
            Self::BrewingStand => "BREWING_STAND",
            Self::Workbench => "WORKBENCH",
            Self::Anvil => "ANVIL",
            Self::Enchanting => "ENCHANTING",
            Self::Grindstone => "GRINDSTONE",
            Self::Stonecutter => "STONECUTTER",
            Self::Cartography => "CARTOGRAPHY",
            Self::Loom => "LOOM",
            Self::Smithing => "SMITHING",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Row selection only applies to chest-shaped screens; everything else
    /// ignores `size`.
    pub fn supports_rows(&self) -> bool {
        matches!(self, Self::Chest | Self::Barrel)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enchantment {
    pub name: String,
    pub level: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PotionEffect {
    pub effect: String,
    pub duration: u32,
    pub amplifier: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BannerLayer {
    pub color: String,
    pub pattern: String,
}

/// Requirement list plus the deny/success command lists fired on overall
/// pass/fail. Used for the menu-level open gate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequirementGroup {
    pub requirements: Vec<Requirement>,
    pub deny_commands: Vec<String>,
    pub success_commands: Vec<String>,
}

impl RequirementGroup {
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
            && self.deny_commands.iter().all(|line| line.trim().is_empty())
            && self
                .success_commands
                .iter()
                .all(|line| line.trim().is_empty())
    }
}

/// One positional open-command argument (`%args_N%`, 1-indexed by position).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Argument {
    pub name: String,
    pub requirements: Vec<Requirement>,
    pub deny_commands: Vec<String>,
}

impl Argument {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    /// Stable key, unique within a document; doubles as the serialized map key.
    pub id: String,
    /// Non-empty; the minimum element is the legacy scalar `slot`.
    pub slots: BTreeSet<u32>,
    pub material: String,
    pub display_name: String,
    pub lore: Vec<String>,
    pub lore_append_mode: String,
    pub amount: u32,
    pub dynamic_amount: String,
    pub damage: u32,
    pub priority: u32,
    pub update: bool,
    pub model_data: u32,
    pub left_click_commands: Vec<String>,
    pub right_click_commands: Vec<String>,
    pub middle_click_commands: Vec<String>,
    pub shift_left_click_commands: Vec<String>,
    pub shift_right_click_commands: Vec<String>,
    pub enchantments: Vec<Enchantment>,
    pub item_flags: Vec<String>,
    pub hide_enchantments: bool,
    pub hide_attributes: bool,
    pub hide_tooltip: bool,
    pub enchantment_glint_override: bool,
    pub unbreakable: bool,
    pub glow: bool,
    pub rgb: String,
    pub entity_type: String,
    pub base_color: String,
    pub potion_effects: Vec<PotionEffect>,
    pub banner_meta: Vec<BannerLayer>,
    pub view_requirements: Vec<Requirement>,
    pub click_requirements: Vec<Requirement>,
    pub click_deny_commands: Vec<String>,
    pub click_success_commands: Vec<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, slot: u32) -> Self {
        let mut slots = BTreeSet::new();
        slots.insert(slot);
        Self {
            slots,
            ..Self::default()
        }
        .with_id(id)
    }

    fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Minimum occupied slot, kept for single-slot legacy compatibility.
    pub fn slot(&self) -> u32 {
        self.slots.iter().next().copied().unwrap_or(0)
    }
}

impl Default for MenuItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            slots: BTreeSet::new(),
            material: String::new(),
            display_name: String::new(),
            lore: Vec::new(),
            lore_append_mode: DEFAULT_LORE_APPEND_MODE.to_string(),
            amount: 1,
            dynamic_amount: String::new(),
            damage: 0,
            priority: 0,
            update: false,
            model_data: 0,
            left_click_commands: Vec::new(),
            right_click_commands: Vec::new(),
            middle_click_commands: Vec::new(),
            shift_left_click_commands: Vec::new(),
            shift_right_click_commands: Vec::new(),
            enchantments: Vec::new(),
            item_flags: Vec::new(),
            hide_enchantments: false,
            hide_attributes: false,
            hide_tooltip: false,
            enchantment_glint_override: false,
            unbreakable: false,
            glow: false,
            rgb: String::new(),
            entity_type: String::new(),
            base_color: String::new(),
            potion_effects: Vec::new(),
            banner_meta: Vec::new(),
            view_requirements: Vec::new(),
            click_requirements: Vec::new(),
            click_deny_commands: Vec::new(),
            click_success_commands: Vec::new(),
        }
    }
}

/// Root entity, one per edited document.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuSettings {
    pub title: String,
    pub menu_type: InventoryType,
    pub size: u32,
    pub open_command: String,
    pub register_command: bool,
    pub update_interval: u32,
    /// Legacy convenience field; mirrored into `open_requirement` on
    /// serialize when no explicit open requirement exists.
    pub permission: String,
    pub open_commands: Vec<String>,
    pub close_commands: Vec<String>,
    pub open_requirement: RequirementGroup,
    pub args: Vec<Argument>,
    pub args_usage_message: String,
    pub arguments_support_placeholders: bool,
    pub parse_placeholders_after_arguments: bool,
    pub items: Vec<MenuItem>,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            menu_type: InventoryType::Chest,
            size: DEFAULT_MENU_SIZE,
            open_command: String::new(),
            register_command: false,
            update_interval: 0,
            permission: String::new(),
            open_commands: Vec::new(),
            close_commands: Vec::new(),
            open_requirement: RequirementGroup::default(),
            args: Vec::new(),
            args_usage_message: String::new(),
            arguments_support_placeholders: false,
            parse_placeholders_after_arguments: false,
            items: Vec::new(),
        }
    }
}
