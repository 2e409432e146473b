//! Purpose: Project `MenuSettings` into the plugin's YAML schema, deterministically.
//! Exports: `generate_menu`.
//! Role: Writer half of the transcoder; field emission order is fixed, not alphabetical.
//! Invariants: Two calls with equal input produce byte-identical output.
//! Invariants: Empty/default fields are omitted field by field; the input is never mutated.
//! Invariants: Total over the model; emitter failures surface as a single Generate error.

use serde_yaml::{Mapping, Value};

use crate::core::argument::encode_args;
use crate::core::error::{Error, ErrorKind};
use crate::core::model::{MenuItem, MenuSettings, DEFAULT_LORE_APPEND_MODE};
use crate::core::requirement::{encode_numbered, Requirement, RequirementKind};
use crate::core::slots::{compact, SlotToken};
use crate::core::value::{
    put, put_bool_true, put_command_lines, put_string, put_string_list, put_string_nonempty,
    put_u32, put_u32_nonzero, string_seq,
};

const PERMISSION_DENY_MESSAGE: &str = "[message] &cYou don't have permission to open this menu!";

pub fn generate_menu(settings: &MenuSettings) -> Result<String, Error> {
    let doc = build_document(settings);
    serde_yaml::to_string(&Value::Mapping(doc)).map_err(|err| {
        Error::new(ErrorKind::Generate)
            .with_message("cannot generate menu configuration")
            .with_source(err)
    })
}

fn build_document(settings: &MenuSettings) -> Mapping {
    let mut doc = Mapping::new();
    put_string(&mut doc, "menu_title", &settings.title);
    put_string(&mut doc, "open_command", &settings.open_command);
    put(
        &mut doc,
        "register_command",
        Value::Bool(settings.register_command),
    );
    put_u32(&mut doc, "size", settings.size);
    put_string(&mut doc, "inventory_type", settings.menu_type.as_str());

    put_u32_nonzero(&mut doc, "update_interval", settings.update_interval);
    put_string_list(&mut doc, "open_commands", &settings.open_commands);
    put_string_list(&mut doc, "close_commands", &settings.close_commands);

    if let Some(block) = encode_open_requirement(settings) {
        put(&mut doc, "open_requirement", Value::Mapping(block));
    }

    if let Some(args) = encode_args(&settings.args) {
        put(&mut doc, "args", args);
    }
    put_string_nonempty(&mut doc, "args_usage_message", &settings.args_usage_message);
    put_bool_true(
        &mut doc,
        "arguments_support_placeholders",
        settings.arguments_support_placeholders,
    );
    put_bool_true(
        &mut doc,
        "parse_placeholders_after_arguments",
        settings.parse_placeholders_after_arguments,
    );

    let mut items = Mapping::new();
    for item in &settings.items {
        // An item with no slots cannot be placed; the reader drops such
        // entries and the writer mirrors that.
        if item.slots.is_empty() {
            continue;
        }
        let key = if item.id.is_empty() {
            format!("item_{}", item.slot())
        } else {
            item.id.clone()
        };
        items.insert(Value::String(key), Value::Mapping(encode_item(item)));
    }
    put(&mut doc, "items", Value::Mapping(items));

    doc
}

fn encode_open_requirement(settings: &MenuSettings) -> Option<Mapping> {
    let group = &settings.open_requirement;
    if !group.is_empty() {
        let mut block = Mapping::new();
        put(
            &mut block,
            "requirements",
            Value::Mapping(encode_numbered(&group.requirements)),
        );
        put_command_lines(&mut block, "deny_commands", &group.deny_commands);
        put_command_lines(&mut block, "success_commands", &group.success_commands);
        return Some(block);
    }

    let permission = settings.permission.trim();
    if permission.is_empty() {
        return None;
    }

    // Legacy convenience: a lone `permission` field becomes a canned open gate.
    let fallback = Requirement {
        id: "permission".to_string(),
        kind: RequirementKind::HasPermission {
            permission: permission.to_string(),
        },
        deny_commands: vec![PERMISSION_DENY_MESSAGE.to_string()],
        success_commands: Vec::new(),
    };
    let mut requirements = Mapping::new();
    requirements.insert(
        Value::String("permission".to_string()),
        Value::Mapping(crate::core::requirement::encode(&fallback)),
    );
    let mut block = Mapping::new();
    put(&mut block, "requirements", Value::Mapping(requirements));
    Some(block)
}

fn encode_item(item: &MenuItem) -> Mapping {
    let mut map = Mapping::new();
    put_string(&mut map, "material", &item.material);

    if item.slots.len() == 1 {
        put_u32(&mut map, "slot", item.slot());
    } else {
        let tokens: Vec<Value> = compact(&item.slots)
            .into_iter()
            .map(SlotToken::to_value)
            .collect();
        put(&mut map, "slots", Value::Sequence(tokens));
    }

    put_string(&mut map, "display_name", &item.display_name);
    put(&mut map, "lore", string_seq(&item.lore));
    if !item.lore_append_mode.is_empty() && item.lore_append_mode != DEFAULT_LORE_APPEND_MODE {
        put_string(&mut map, "lore_append_mode", &item.lore_append_mode);
    }

    put_u32(&mut map, "amount", item.amount.max(1));
    if !item.dynamic_amount.trim().is_empty() {
        put_string(&mut map, "dynamic_amount", &item.dynamic_amount);
    }
    put_u32_nonzero(&mut map, "damage", item.damage);
    put_u32_nonzero(&mut map, "priority", item.priority);
    put_bool_true(&mut map, "update", item.update);
    put_u32_nonzero(&mut map, "model_data", item.model_data);

    put_command_lines(&mut map, "left_click_commands", &item.left_click_commands);
    put_command_lines(&mut map, "right_click_commands", &item.right_click_commands);
    put_command_lines(
        &mut map,
        "middle_click_commands",
        &item.middle_click_commands,
    );
    put_command_lines(
        &mut map,
        "shift_left_click_commands",
        &item.shift_left_click_commands,
    );
    put_command_lines(
        &mut map,
        "shift_right_click_commands",
        &item.shift_right_click_commands,
    );

    let mut enchantments: Vec<String> = item
        .enchantments
        .iter()
        .filter(|entry| !entry.name.trim().is_empty() && entry.level > 0)
        .map(|entry| format!("{};{}", entry.name, entry.level))
        .collect();
    // Glow is sugar for "any enchantment, glint hidden".
    if item.glow && enchantments.is_empty() {
        enchantments.push("efficiency;1".to_string());
    }
    put_string_list(&mut map, "enchantments", &enchantments);
    put_string_list(&mut map, "item_flags", &item.item_flags);

    put_bool_true(
        &mut map,
        "hide_enchantments",
        item.hide_enchantments || item.glow,
    );
    put_bool_true(&mut map, "hide_attributes", item.hide_attributes);
    put_bool_true(&mut map, "hide_tooltip", item.hide_tooltip);
    put_bool_true(
        &mut map,
        "enchantment_glint_override",
        item.enchantment_glint_override,
    );
    put_bool_true(&mut map, "unbreakable", item.unbreakable);

    put_string_nonempty(&mut map, "rgb", item.rgb.trim());
    put_string_nonempty(&mut map, "entity_type", item.entity_type.trim());
    put_string_nonempty(&mut map, "base_color", item.base_color.trim());

    let potion_effects: Vec<String> = item
        .potion_effects
        .iter()
        .filter(|entry| !entry.effect.trim().is_empty())
        .map(|entry| format!("{};{};{}", entry.effect, entry.duration, entry.amplifier))
        .collect();
    put_string_list(&mut map, "potion_effects", &potion_effects);

    let banner_meta: Vec<String> = item
        .banner_meta
        .iter()
        .filter(|layer| !layer.color.trim().is_empty())
        .map(|layer| format!("{};{}", layer.color, layer.pattern))
        .collect();
    put_string_list(&mut map, "banner_meta", &banner_meta);

    if !item.view_requirements.is_empty() {
        let mut block = Mapping::new();
        put(
            &mut block,
            "requirements",
            Value::Mapping(encode_numbered(&item.view_requirements)),
        );
        put(&mut map, "view_requirement", Value::Mapping(block));
    }

    if !item.click_requirements.is_empty() {
        let mut block = Mapping::new();
        put(
            &mut block,
            "requirements",
            Value::Mapping(encode_numbered(&item.click_requirements)),
        );
        put_string_list(&mut block, "deny_commands", &item.click_deny_commands);
        put_string_list(&mut block, "success_commands", &item.click_success_commands);
        put(&mut map, "click_requirement", Value::Mapping(block));
    }

    map
}

#[cfg(test)]
mod tests {
    use super::generate_menu;
    use crate::core::model::{Enchantment, InventoryType, MenuItem, MenuSettings};
    use crate::core::requirement::{Requirement, RequirementKind};
    use serde_yaml::Value;

    fn settings_with_item(item: MenuItem) -> MenuSettings {
        let mut settings = MenuSettings {
            title: "&8Test".to_string(),
            open_command: "test".to_string(),
            ..MenuSettings::default()
        };
        settings.items.push(item);
        settings
    }

    fn parse_doc(text: &str) -> Value {
        serde_yaml::from_str(text).expect("generated yaml parses")
    }

    #[test]
    fn single_slot_items_use_the_scalar_slot_field() {
        let text = generate_menu(&settings_with_item(MenuItem::new("gem", 13))).expect("generate");
        let doc = parse_doc(&text);
        let item = &doc["items"]["gem"];
        assert_eq!(item["slot"], Value::Number(13.into()));
        assert!(item.get("slots").is_none());
    }

    #[test]
    fn multi_slot_items_compact_into_range_tokens() {
        let mut item = MenuItem::new("frame", 0);
        item.slots.extend([1, 2, 5]);
        let text = generate_menu(&settings_with_item(item)).expect("generate");
        let doc = parse_doc(&text);
        assert_eq!(
            doc["items"]["frame"]["slots"],
            Value::Sequence(vec![
                Value::String("0-2".to_string()),
                Value::Number(5.into()),
            ])
        );
    }

    #[test]
    fn click_command_keys_are_absent_when_lists_are_empty() {
        let text = generate_menu(&settings_with_item(MenuItem::new("gem", 0))).expect("generate");
        for key in [
            "left_click_commands",
            "right_click_commands",
            "middle_click_commands",
            "shift_left_click_commands",
            "shift_right_click_commands",
        ] {
            assert!(!text.contains(key), "unexpected key {key}");
        }
    }

    #[test]
    fn glow_expands_into_synthetic_enchantment() {
        let mut item = MenuItem::new("star", 4);
        item.glow = true;
        let text = generate_menu(&settings_with_item(item)).expect("generate");
        let doc = parse_doc(&text);
        let encoded = &doc["items"]["star"];
        assert_eq!(
            encoded["enchantments"],
            Value::Sequence(vec![Value::String("efficiency;1".to_string())])
        );
        assert_eq!(encoded["hide_enchantments"], Value::Bool(true));
    }

    #[test]
    fn glow_keeps_real_enchantments_untouched() {
        let mut item = MenuItem::new("sword", 4);
        item.glow = true;
        item.enchantments.push(Enchantment {
            name: "sharpness".to_string(),
            level: 5,
        });
        let text = generate_menu(&settings_with_item(item)).expect("generate");
        let doc = parse_doc(&text);
        assert_eq!(
            doc["items"]["sword"]["enchantments"],
            Value::Sequence(vec![Value::String("sharpness;5".to_string())])
        );
    }

    #[test]
    fn lone_permission_field_synthesizes_open_requirement() {
        let settings = MenuSettings {
            permission: "menu.open".to_string(),
            ..MenuSettings::default()
        };
        let text = generate_menu(&settings).expect("generate");
        let doc = parse_doc(&text);
        let req = &doc["open_requirement"]["requirements"]["permission"];
        assert_eq!(req["type"], Value::String("has permission".to_string()));
        assert_eq!(req["permission"], Value::String("menu.open".to_string()));
        assert!(req["deny_commands"].as_sequence().is_some());
    }

    #[test]
    fn explicit_open_requirement_wins_over_permission_field() {
        let mut settings = MenuSettings {
            permission: "menu.legacy".to_string(),
            ..MenuSettings::default()
        };
        settings
            .open_requirement
            .requirements
            .push(Requirement::of(RequirementKind::Javascript {
                expression: "true".to_string(),
            }));
        let text = generate_menu(&settings).expect("generate");
        let doc = parse_doc(&text);
        let requirements = doc["open_requirement"]["requirements"]
            .as_mapping()
            .expect("requirements");
        assert!(requirements.get("requirement_1").is_some());
        assert!(requirements.get("permission").is_none());
    }

    #[test]
    fn output_is_deterministic_for_equal_input() {
        let mut item = MenuItem::new("gem", 3);
        item.slots.extend([4, 5, 9]);
        item.left_click_commands.push("[close]".to_string());
        let settings = settings_with_item(item);
        let first = generate_menu(&settings).expect("generate");
        let second = generate_menu(&settings).expect("generate");
        assert_eq!(first, second);
    }

    #[test]
    fn inventory_type_and_size_are_always_present() {
        let settings = MenuSettings {
            menu_type: InventoryType::Hopper,
            size: 5,
            ..MenuSettings::default()
        };
        let text = generate_menu(&settings).expect("generate");
        let doc = parse_doc(&text);
        assert_eq!(doc["inventory_type"], Value::String("HOPPER".to_string()));
        assert_eq!(doc["size"], Value::Number(5.into()));
        assert_eq!(doc["register_command"], Value::Bool(false));
    }

    #[test]
    fn zero_slot_items_are_not_emitted() {
        let mut item = MenuItem::new("ghost", 0);
        item.slots.clear();
        let text = generate_menu(&settings_with_item(item)).expect("generate");
        let doc = parse_doc(&text);
        assert!(doc["items"]
            .as_mapping()
            .expect("items map")
            .is_empty());
    }
}
