//! Purpose: Encode/decode the `args` block with its per-document dual shape.
//! Exports: `encode_args`, `decode_args`.
//! Role: Chooses list vs. map encoding once per document and tolerates every
//! legacy shape on the way back in.
//! Invariants: A map shape is emitted for the whole document as soon as any
//! argument carries requirements or deny commands; never a mixed list/map shape.
//! Invariants: Decoding accepts a flat string list, a mixed list, a keyed map,
//! or a single space-separated string, independently.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value};

use crate::core::model::Argument;
use crate::core::requirement::{decode_keyed, encode, Requirement};
use crate::core::value::{mapping_entry, put, scalar_string, string_list_entry, string_seq};

pub fn encode_args(args: &[Argument]) -> Option<Value> {
    let named: Vec<&Argument> = args.iter().filter(|arg| !arg.name.trim().is_empty()).collect();
    if named.is_empty() {
        return None;
    }

    let needs_map = named
        .iter()
        .any(|arg| !arg.requirements.is_empty() || !arg.deny_commands.is_empty());
    if !needs_map {
        let names: Vec<String> = named.iter().map(|arg| arg.name.clone()).collect();
        return Some(string_seq(&names));
    }

    let mut map = Mapping::new();
    for arg in named {
        if arg.requirements.is_empty() && arg.deny_commands.is_empty() {
            map.insert(Value::String(arg.name.clone()), Value::Bool(true));
        } else {
            map.insert(
                Value::String(arg.name.clone()),
                Value::Mapping(encode_payload(arg)),
            );
        }
    }
    Some(Value::Mapping(map))
}

fn encode_payload(arg: &Argument) -> Mapping {
    let mut payload = Mapping::new();
    if !arg.requirements.is_empty() {
        let mut requirements = Mapping::new();
        let mut used = BTreeSet::new();
        for (index, req) in arg.requirements.iter().enumerate() {
            requirements.insert(
                Value::String(requirement_key(req, index, &mut used)),
                Value::Mapping(encode(req)),
            );
        }
        put(&mut payload, "requirements", Value::Mapping(requirements));
    }
    if !arg.deny_commands.is_empty() {
        put(&mut payload, "deny_commands", string_seq(&arg.deny_commands));
    }
    payload
}

/// Map key for an argument requirement: its `id`, else the type string with
/// spaces collapsed to underscores, else a positional fallback. Collisions
/// get a numeric suffix.
fn requirement_key(req: &Requirement, index: usize, used: &mut BTreeSet<String>) -> String {
    let base = if req.id.is_empty() {
        let derived = req.kind.type_str().replace(' ', "_");
        if derived.is_empty() {
            format!("req_{}", index + 1)
        } else {
            derived
        }
    } else {
        req.id.clone()
    };

    if used.insert(base.clone()) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

pub fn decode_args(value: &Value) -> Vec<Argument> {
    let mut args = Vec::new();
    match value {
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::String(name) => args.push(Argument::named(name.clone())),
                    Value::Mapping(entry) => {
                        for (name, payload) in entry {
                            let Some(name) = scalar_string(name) else {
                                continue;
                            };
                            args.push(decode_payload(name, payload));
                        }
                    }
                    Value::Number(number) => args.push(Argument::named(number.to_string())),
                    _ => {}
                }
            }
        }
        Value::Mapping(entries) => {
            for (name, payload) in entries {
                let Some(name) = scalar_string(name) else {
                    continue;
                };
                args.push(decode_payload(name, payload));
            }
        }
        Value::String(joined) => {
            for name in joined.split_whitespace() {
                args.push(Argument::named(name));
            }
        }
        _ => {}
    }
    args
}

fn decode_payload(name: String, payload: &Value) -> Argument {
    let mut arg = Argument::named(name);
    if let Some(map) = payload.as_mapping() {
        if let Some(requirements) = mapping_entry(map, "requirements") {
            arg.requirements = decode_keyed(requirements);
        }
        arg.deny_commands = string_list_entry(map, "deny_commands");
    }
    arg
}
