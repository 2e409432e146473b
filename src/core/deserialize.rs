//! Purpose: Reconstruct `MenuSettings` from YAML text, tolerating legacy encodings.
//! Exports: `parse_menu`, `parse_menu_outcome`, `ParseOutcome`.
//! Role: Reader half of the transcoder; permissive defaults for absent fields.
//! Invariants: Returns either a complete settings object or a single Parse error,
//! never a partial result and never a panic.
//! Invariants: Items that resolve to zero slots are dropped, not errors.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value};

use crate::core::argument::decode_args;
use crate::core::error::{Error, ErrorKind};
use crate::core::model::{
    BannerLayer, Enchantment, InventoryType, MenuItem, MenuSettings, PotionEffect,
    DEFAULT_MENU_SIZE,
};
use crate::core::requirement::{decode_keyed, RequirementKind};
use crate::core::slots::expand_value;
use crate::core::value::{
    bool_entry, mapping_entry, scalar_string, str_entry, string_list_entry, u32_entry,
};

pub struct ParseOutcome {
    pub settings: MenuSettings,
    /// Item keys that resolved to zero slots and were dropped.
    pub dropped_items: Vec<String>,
}

pub fn parse_menu(text: &str) -> Result<MenuSettings, Error> {
    parse_menu_outcome(text).map(|outcome| outcome.settings)
}

pub fn parse_menu_outcome(text: &str) -> Result<ParseOutcome, Error> {
    if text.trim().is_empty() {
        return Err(empty_configuration());
    }

    let root: Value = serde_yaml::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("cannot parse menu configuration")
            .with_source(err)
    })?;

    let root = match root {
        Value::Null => return Err(empty_configuration()),
        Value::Mapping(map) => map,
        _ => {
            return Err(Error::new(ErrorKind::Parse)
                .with_message("top-level structure must be a key/value mapping"))
        }
    };

    let mut settings = MenuSettings {
        title: str_entry(&root, "menu_title"),
        open_command: str_entry(&root, "open_command"),
        register_command: bool_entry(&root, "register_command"),
        size: non_zero_or(u32_entry(&root, "size"), DEFAULT_MENU_SIZE),
        menu_type: InventoryType::from_name(&str_entry(&root, "inventory_type")),
        update_interval: u32_entry(&root, "update_interval"),
        open_commands: string_list_entry(&root, "open_commands"),
        close_commands: string_list_entry(&root, "close_commands"),
        args_usage_message: str_entry(&root, "args_usage_message"),
        arguments_support_placeholders: bool_entry(&root, "arguments_support_placeholders"),
        parse_placeholders_after_arguments: bool_entry(&root, "parse_placeholders_after_arguments"),
        ..MenuSettings::default()
    };

    if let Some(block) = mapping_entry(&root, "open_requirement") {
        if let Some(requirements) = mapping_entry(block, "requirements") {
            settings.open_requirement.requirements = decode_keyed(requirements);
        }
        settings.open_requirement.deny_commands = string_list_entry(block, "deny_commands");
        settings.open_requirement.success_commands = string_list_entry(block, "success_commands");

        // Keep the legacy convenience field in sync with the first
        // permission gate.
        for req in &settings.open_requirement.requirements {
            if let RequirementKind::HasPermission { permission } = &req.kind {
                settings.permission = permission.clone();
                break;
            }
        }
    }

    if let Some(args) = root.get("args") {
        settings.args = decode_args(args);
    }

    let mut dropped_items = Vec::new();
    if let Some(items) = mapping_entry(&root, "items") {
        for (key, entry) in items {
            let Some(id) = scalar_string(key) else {
                continue;
            };
            let Some(map) = entry.as_mapping() else {
                dropped_items.push(id);
                continue;
            };
            match decode_item(&id, map) {
                Some(item) => settings.items.push(item),
                None => dropped_items.push(id),
            }
        }
    }

    Ok(ParseOutcome {
        settings,
        dropped_items,
    })
}

fn empty_configuration() -> Error {
    Error::new(ErrorKind::Parse).with_message("empty configuration")
}

fn non_zero_or(value: u32, fallback: u32) -> u32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}

fn decode_item(id: &str, map: &Mapping) -> Option<MenuItem> {
    let slots = decode_slots(map);
    if slots.is_empty() {
        return None;
    }

    let mut item = MenuItem {
        id: id.to_string(),
        slots,
        ..MenuItem::default()
    };

    let material = str_entry(map, "material");
    let material = material.trim();
    item.material = if material.is_empty() {
        "STONE".to_string()
    } else {
        material.to_string()
    };

    item.display_name = str_entry(map, "display_name");
    item.lore = string_list_entry(map, "lore");
    let lore_append_mode = str_entry(map, "lore_append_mode");
    if !lore_append_mode.is_empty() {
        item.lore_append_mode = lore_append_mode;
    }

    item.amount = non_zero_or(u32_entry(map, "amount"), 1);
    item.dynamic_amount = str_entry(map, "dynamic_amount");
    // `data` is the pre-flattening alias for `damage`.
    item.damage = non_zero_or(u32_entry(map, "damage"), u32_entry(map, "data"));
    item.priority = u32_entry(map, "priority");
    item.update = bool_entry(map, "update");
    item.model_data = u32_entry(map, "model_data");

    item.left_click_commands = string_list_entry(map, "left_click_commands");
    item.right_click_commands = string_list_entry(map, "right_click_commands");
    item.middle_click_commands = string_list_entry(map, "middle_click_commands");
    item.shift_left_click_commands = string_list_entry(map, "shift_left_click_commands");
    item.shift_right_click_commands = string_list_entry(map, "shift_right_click_commands");

    item.enchantments = string_list_entry(map, "enchantments")
        .iter()
        .filter_map(|joined| decode_enchantment(joined))
        .collect();
    item.item_flags = string_list_entry(map, "item_flags");

    item.hide_enchantments = bool_entry(map, "hide_enchantments");
    item.hide_attributes = bool_entry(map, "hide_attributes");
    item.hide_tooltip = bool_entry(map, "hide_tooltip");
    item.enchantment_glint_override = bool_entry(map, "enchantment_glint_override");
    item.unbreakable = bool_entry(map, "unbreakable");

    // Lossy by design: a glint forced via hidden enchantments cannot be
    // told apart from a real enchantment the user chose to hide.
    item.glow = item.hide_enchantments && !item.enchantments.is_empty();

    item.rgb = {
        let rgb = str_entry(map, "rgb");
        if rgb.is_empty() {
            str_entry(map, "color")
        } else {
            rgb
        }
    };
    item.entity_type = str_entry(map, "entity_type");
    item.base_color = str_entry(map, "base_color");

    item.potion_effects = string_list_entry(map, "potion_effects")
        .iter()
        .filter_map(|joined| decode_potion_effect(joined))
        .collect();
    item.banner_meta = string_list_entry(map, "banner_meta")
        .iter()
        .filter_map(|joined| decode_banner_layer(joined))
        .collect();

    if let Some(block) = mapping_entry(map, "view_requirement") {
        if let Some(requirements) = mapping_entry(block, "requirements") {
            item.view_requirements = decode_keyed(requirements);
        }
    }

    if let Some(block) = mapping_entry(map, "click_requirement") {
        if let Some(requirements) = mapping_entry(block, "requirements") {
            item.click_requirements = decode_keyed(requirements);
        }
        item.click_deny_commands = string_list_entry(block, "deny_commands");
        item.click_success_commands = string_list_entry(block, "success_commands");
    }

    Some(item)
}

/// `slots` (array, CSV string, or lone integer) wins over the scalar
/// `slot`; a present-but-unusable `slots` value does not fall back.
fn decode_slots(map: &Mapping) -> BTreeSet<u32> {
    if let Some(value) = map.get("slots") {
        return expand_value(value);
    }
    let mut slots = BTreeSet::new();
    match map.get("slot") {
        Some(Value::Number(number)) => {
            if let Some(slot) = number.as_u64().and_then(|wide| u32::try_from(wide).ok()) {
                slots.insert(slot);
            }
        }
        Some(Value::String(text)) => {
            if let Ok(slot) = text.trim().parse::<u32>() {
                slots.insert(slot);
            }
        }
        _ => {}
    }
    slots
}

fn decode_enchantment(joined: &str) -> Option<Enchantment> {
    let mut parts = joined.split(';');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }
    let level = parts
        .next()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|level| *level > 0)
        .unwrap_or(1);
    Some(Enchantment {
        name: name.to_string(),
        level,
    })
}

fn decode_potion_effect(joined: &str) -> Option<PotionEffect> {
    let mut parts = joined.split(';');
    let effect = parts.next().unwrap_or_default().trim();
    if effect.is_empty() {
        return None;
    }
    let duration = parts
        .next()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let amplifier = parts
        .next()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);
    Some(PotionEffect {
        effect: effect.to_string(),
        duration,
        amplifier,
    })
}

fn decode_banner_layer(joined: &str) -> Option<BannerLayer> {
    let mut parts = joined.split(';');
    let color = parts.next().unwrap_or_default().trim();
    if color.is_empty() {
        return None;
    }
    let pattern = parts.next().unwrap_or_default().trim();
    Some(BannerLayer {
        color: color.to_string(),
        pattern: pattern.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_menu, parse_menu_outcome};
    use crate::core::error::ErrorKind;
    use crate::core::model::InventoryType;
    use crate::core::requirement::RequirementKind;

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let settings = parse_menu("menu_title: Shop\n").expect("parse");
        assert_eq!(settings.title, "Shop");
        assert_eq!(settings.size, 54);
        assert_eq!(settings.menu_type, InventoryType::Chest);
        assert!(!settings.register_command);
        assert!(settings.items.is_empty());
        assert!(settings.args.is_empty());
    }

    #[test]
    fn empty_input_is_a_distinct_parse_error() {
        for text in ["", "   \n", "# only a comment\n"] {
            let err = parse_menu(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse);
            assert_eq!(err.message(), Some("empty configuration"));
        }
    }

    #[test]
    fn invalid_yaml_is_a_parse_error_not_a_panic() {
        let err = parse_menu("items:\n  - ]broken[\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = parse_menu("just a string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn items_read_every_slot_encoding() {
        let settings = parse_menu(
            r#"
items:
  csv:
    material: STONE
    slots: '0,2,4-6'
  ranged:
    material: DIRT
    slots:
      - '9-10'
      - 13
  scalar:
    material: SAND
    slot: 3
"#,
        )
        .expect("parse");
        let by_id = |id: &str| {
            settings
                .items
                .iter()
                .find(|item| item.id == id)
                .expect("item")
        };
        assert_eq!(
            by_id("csv").slots.iter().copied().collect::<Vec<_>>(),
            vec![0, 2, 4, 5, 6]
        );
        assert_eq!(
            by_id("ranged").slots.iter().copied().collect::<Vec<_>>(),
            vec![9, 10, 13]
        );
        assert_eq!(by_id("scalar").slot(), 3);
    }

    #[test]
    fn zero_slot_items_are_dropped_and_reported() {
        let outcome = parse_menu_outcome(
            r#"
items:
  ghost:
    material: STONE
  solid:
    material: DIRT
    slot: 1
"#,
        )
        .expect("parse");
        assert_eq!(outcome.dropped_items, vec!["ghost".to_string()]);
        assert_eq!(outcome.settings.items.len(), 1);
        assert_eq!(outcome.settings.items[0].id, "solid");
    }

    #[test]
    fn damage_reads_the_legacy_data_alias() {
        let settings = parse_menu(
            r#"
items:
  old:
    material: WOOL
    slot: 0
    data: 14
"#,
        )
        .expect("parse");
        assert_eq!(settings.items[0].damage, 14);
    }

    #[test]
    fn enchantments_and_companions_decode_from_joined_strings() {
        let settings = parse_menu(
            r#"
items:
  kit:
    material: POTION
    slot: 0
    enchantments:
      - 'sharpness;5'
      - 'unbreaking'
    potion_effects:
      - 'SPEED;200;1'
    banner_meta:
      - 'RED;STRIPE_TOP'
"#,
        )
        .expect("parse");
        let item = &settings.items[0];
        assert_eq!(item.enchantments[0].name, "sharpness");
        assert_eq!(item.enchantments[0].level, 5);
        assert_eq!(item.enchantments[1].level, 1);
        assert_eq!(item.potion_effects[0].duration, 200);
        assert_eq!(item.banner_meta[0].pattern, "STRIPE_TOP");
    }

    #[test]
    fn glow_is_reconstructed_from_hidden_enchantments() {
        let settings = parse_menu(
            r#"
items:
  star:
    material: NETHER_STAR
    slot: 0
    enchantments:
      - 'efficiency;1'
    hide_enchantments: true
  plain:
    material: STONE
    slot: 1
    hide_enchantments: true
"#,
        )
        .expect("parse");
        assert!(settings.items[0].glow);
        assert!(!settings.items[1].glow);
    }

    #[test]
    fn open_requirement_mirrors_first_permission_gate() {
        let settings = parse_menu(
            r#"
open_requirement:
  requirements:
    gate:
      type: has permission
      permission: menu.open
  deny_commands:
    - '[message] &cNo.'
"#,
        )
        .expect("parse");
        assert_eq!(settings.permission, "menu.open");
        assert_eq!(settings.open_requirement.requirements.len(), 1);
        assert_eq!(settings.open_requirement.requirements[0].id, "gate");
        assert!(matches!(
            settings.open_requirement.requirements[0].kind,
            RequirementKind::HasPermission { .. }
        ));
    }

    #[test]
    fn click_requirement_carries_group_command_lists() {
        let settings = parse_menu(
            r#"
items:
  buy:
    material: EMERALD
    slot: 0
    click_requirement:
      requirements:
        cost:
          type: has money
          amount: 100
      deny_commands:
        - '[message] &cToo poor'
      success_commands:
        - '[console] give %player_name% emerald 1'
"#,
        )
        .expect("parse");
        let item = &settings.items[0];
        assert_eq!(item.click_requirements.len(), 1);
        assert_eq!(item.click_deny_commands.len(), 1);
        assert_eq!(item.click_success_commands.len(), 1);
    }
}
