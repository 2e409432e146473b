//! Purpose: Compact slot sets into range tokens and expand legacy slot encodings.
//! Exports: `SlotToken`, `compact`, `expand_value`, `expand_str`.
//! Role: Leaf codec shared by the serializer and deserializer for item `slots`.
//! Invariants: `expand_*` never panics; malformed tokens are skipped, not fatal.
//! Invariants: `compact` output is ascending and deduplicated; runs of length
//! >= 2 become `start-end` strings, singletons stay bare integers.

use std::collections::BTreeSet;

use serde_yaml::Value;

/// Ranges wider than this are treated as malformed input rather than
/// expanded element by element.
const MAX_RANGE_SPAN: u32 = 4096;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotToken {
    Single(u32),
    Range(u32, u32),
}

impl SlotToken {
    pub fn to_value(self) -> Value {
        match self {
            Self::Single(slot) => Value::Number(u64::from(slot).into()),
            Self::Range(start, end) => Value::String(format!("{start}-{end}")),
        }
    }
}

pub fn compact(slots: &BTreeSet<u32>) -> Vec<SlotToken> {
    let mut tokens = Vec::new();
    let mut iter = slots.iter().copied();
    let Some(first) = iter.next() else {
        return tokens;
    };

    let mut start = first;
    let mut prev = first;
    for current in iter {
        if current != prev + 1 {
            tokens.push(run_token(start, prev));
            start = current;
        }
        prev = current;
    }
    tokens.push(run_token(start, prev));
    tokens
}

fn run_token(start: u32, end: u32) -> SlotToken {
    if start == end {
        SlotToken::Single(start)
    } else {
        SlotToken::Range(start, end)
    }
}

/// Expand whatever shape a config stored under `slots`: an array of
/// integers and/or range strings, a single comma-separated string, or a
/// lone integer.
pub fn expand_value(value: &Value) -> BTreeSet<u32> {
    let mut slots = BTreeSet::new();
    match value {
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::Number(number) => {
                        if let Some(slot) = number.as_u64().and_then(|wide| u32::try_from(wide).ok())
                        {
                            slots.insert(slot);
                        }
                    }
                    Value::String(text) => expand_into(text, &mut slots),
                    _ => {}
                }
            }
        }
        Value::String(text) => expand_into(text, &mut slots),
        Value::Number(number) => {
            if let Some(slot) = number.as_u64().and_then(|wide| u32::try_from(wide).ok()) {
                slots.insert(slot);
            }
        }
        _ => {}
    }
    slots
}

pub fn expand_str(text: &str) -> BTreeSet<u32> {
    let mut slots = BTreeSet::new();
    expand_into(text, &mut slots);
    slots
}

fn expand_into(text: &str, slots: &mut BTreeSet<u32>) {
    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some((start, end)) = token.split_once('-') {
            let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>())
            else {
                continue;
            };
            if start > end || end - start > MAX_RANGE_SPAN {
                continue;
            }
            slots.extend(start..=end);
        } else if let Ok(slot) = token.parse::<u32>() {
            slots.insert(slot);
        }
    }
}
