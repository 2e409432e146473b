//! Purpose: Regression coverage for the parse-failure taxonomy.
//! Exports: Integration tests only.
//! Role: Verify the two externally visible error classes stay distinct:
//! structural parse failures error out, malformed fields fall back silently.
//! Invariants: No input ever panics the deserializer.

use menuforge::core::deserialize::parse_menu;
use menuforge::core::error::ErrorKind;

#[test]
fn invalid_yaml_reports_a_parse_error() {
    let cases = [
        "items:\n  - ]broken[\n",
        "a: b\n\tc: d\n",
        "key: {unclosed\n",
    ];
    for text in cases {
        let err = parse_menu(text).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Parse, "input: {text:?}");
        assert!(std::error::Error::source(&err).is_some(), "input: {text:?}");
    }
}

#[test]
fn empty_or_null_input_reports_empty_configuration() {
    for text in ["", "  ", "\n\n", "# comment only\n", "null", "~"] {
        let err = parse_menu(text).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Parse, "input: {text:?}");
        assert_eq!(err.message(), Some("empty configuration"), "input: {text:?}");
    }
}

#[test]
fn non_mapping_roots_are_rejected_without_panicking() {
    for text in ["just a string", "- a\n- b\n", "42"] {
        let err = parse_menu(text).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Parse, "input: {text:?}");
    }
}

#[test]
fn malformed_fields_fall_back_instead_of_failing() {
    // Every field here is the wrong shape; the parse must still succeed
    // with semantic defaults.
    let settings = parse_menu(
        r#"
menu_title: [not, a, string]
size: many
register_command: 3
update_interval: -5
open_commands: solo
open_requirement: not-a-map
args: 17
items:
  broken: not-a-map
  ok:
    material: STONE
    slot: 2
    amount: lots
    enchantments: 'unlisted'
"#,
    )
    .expect("permissive parse");

    assert_eq!(settings.title, "");
    assert_eq!(settings.size, 54);
    assert!(!settings.register_command);
    assert_eq!(settings.update_interval, 0);
    assert_eq!(settings.open_commands, vec!["solo".to_string()]);
    assert!(settings.open_requirement.requirements.is_empty());
    assert!(settings.args.is_empty());
    assert_eq!(settings.items.len(), 1);
    assert_eq!(settings.items[0].amount, 1);
    assert_eq!(settings.items[0].enchantments.len(), 1);
    assert_eq!(settings.items[0].enchantments[0].name, "unlisted");
}

#[test]
fn hostile_slot_ranges_do_not_blow_up() {
    let settings = parse_menu(
        r#"
menu_title: x
items:
  wide:
    material: STONE
    slots: '0-4294967295'
  fine:
    material: DIRT
    slots: '9-4, 3'
"#,
    )
    .expect("parse");
    // The absurd range is malformed input, the descending range is skipped;
    // only the plain token survives.
    assert_eq!(settings.items.len(), 1);
    assert_eq!(settings.items[0].id, "fine");
    assert_eq!(settings.items[0].slot(), 3);
}
