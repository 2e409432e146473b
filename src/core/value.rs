//! Purpose: Centralize permissive reads and schema-shaped writes over `serde_yaml` values.
//! Exports: scalar/list/mapping accessors plus `put_*` emitters used by the transcoder.
//! Role: Boundary that keeps "recognized but malformed falls back to default" in one place.
//! Invariants: Read accessors never fail; absent or mistyped fields yield type defaults.
//! Invariants: `put_*` emitters never insert empty strings, empty lists, or false flags.

use serde_yaml::{Mapping, Value};

pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub fn str_entry(map: &Mapping, key: &str) -> String {
    map.get(key)
        .and_then(scalar_string)
        .unwrap_or_default()
}

pub fn u32_entry(map: &Mapping, key: &str) -> u32 {
    match map.get(key) {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|wide| u32::try_from(wide).ok())
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

pub fn bool_entry(map: &Mapping, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub fn string_list_entry(map: &Mapping, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).map(|only| vec![only]).unwrap_or_default(),
        None => Vec::new(),
    }
}

pub fn mapping_entry<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(key).and_then(Value::as_mapping)
}

pub fn put(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::String(key.to_string()), value);
}

pub fn put_string(map: &mut Mapping, key: &str, text: &str) {
    put(map, key, Value::String(text.to_string()));
}

pub fn put_string_nonempty(map: &mut Mapping, key: &str, text: &str) {
    if !text.is_empty() {
        put_string(map, key, text);
    }
}

pub fn put_bool_true(map: &mut Mapping, key: &str, flag: bool) {
    if flag {
        put(map, key, Value::Bool(true));
    }
}

pub fn put_u32(map: &mut Mapping, key: &str, number: u32) {
    put(map, key, Value::Number(u64::from(number).into()));
}

pub fn put_u32_nonzero(map: &mut Mapping, key: &str, number: u32) {
    if number > 0 {
        put_u32(map, key, number);
    }
}

pub fn string_seq(items: &[String]) -> Value {
    Value::Sequence(
        items
            .iter()
            .map(|item| Value::String(item.clone()))
            .collect(),
    )
}

pub fn put_string_list(map: &mut Mapping, key: &str, items: &[String]) {
    if !items.is_empty() {
        put(map, key, string_seq(items));
    }
}

/// Command lists drop blank entries before emission; an all-blank list is omitted.
pub fn put_command_lines(map: &mut Mapping, key: &str, lines: &[String]) {
    let kept: Vec<String> = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect();
    put_string_list(map, key, &kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn map_from(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).expect("mapping")
    }

    #[test]
    fn str_entry_coerces_scalars_and_defaults() {
        let map = map_from("title: 42\nname: menu\nflag: true\n");
        assert_eq!(str_entry(&map, "title"), "42");
        assert_eq!(str_entry(&map, "name"), "menu");
        assert_eq!(str_entry(&map, "flag"), "true");
        assert_eq!(str_entry(&map, "missing"), "");
    }

    #[test]
    fn u32_entry_accepts_numbers_and_numeric_strings() {
        let map = map_from("a: 9\nb: '27'\nc: -3\nd: junk\n");
        assert_eq!(u32_entry(&map, "a"), 9);
        assert_eq!(u32_entry(&map, "b"), 27);
        assert_eq!(u32_entry(&map, "c"), 0);
        assert_eq!(u32_entry(&map, "d"), 0);
    }

    #[test]
    fn string_list_entry_accepts_lone_scalar() {
        let map = map_from("cmds: solo\nlist:\n  - one\n  - two\n");
        assert_eq!(string_list_entry(&map, "cmds"), vec!["solo".to_string()]);
        assert_eq!(
            string_list_entry(&map, "list"),
            vec!["one".to_string(), "two".to_string()]
        );
        assert!(string_list_entry(&map, "missing").is_empty());
    }

    #[test]
    fn put_command_lines_drops_blanks_and_empty_lists() {
        let mut map = Mapping::new();
        put_command_lines(
            &mut map,
            "left_click_commands",
            &["[close]".to_string(), "   ".to_string()],
        );
        put_command_lines(&mut map, "right_click_commands", &["  ".to_string()]);
        assert_eq!(
            map.get("left_click_commands"),
            Some(&Value::Sequence(vec![Value::String("[close]".into())]))
        );
        assert!(map.get("right_click_commands").is_none());
    }
}
