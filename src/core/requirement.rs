//! Purpose: Encode/decode the type-dispatched requirement objects shared by all gates.
//! Exports: `Requirement`, `RequirementKind`, `CompareOp`, `Amount`, `encode`, `decode`,
//! `encode_numbered`, `decode_keyed`.
//! Role: Sub-codec reused by the open gate, per-item view/click gates, and argument gates.
//! Invariants: `encode` emits exactly the fields meaningful to the kind; never an empty
//! string, empty list, or null value.
//! Invariants: Unknown or missing `type` decodes to `RequirementKind::None`, never an error.

use serde_yaml::{Mapping, Value};

use crate::core::value::{
    bool_entry, put, put_bool_true, put_string, put_string_list, put_string_nonempty, put_u32,
    put_u32_nonzero, scalar_string, str_entry, string_list_entry, u32_entry,
};

/// Int-or-placeholder coercion, applied uniformly to every "amount"-like
/// field: a plain integer stays numeric, anything else is kept verbatim as
/// a placeholder expression. Blank values are unset and never serialized.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Amount {
    #[default]
    Unset,
    Int(i64),
    Expr(String),
}

impl Amount {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Unset;
        }
        match trimmed.parse::<i64>() {
            Ok(number) => Self::Int(number),
            Err(_) => Self::Expr(raw.to_string()),
        }
    }

    fn from_entry(map: &Mapping, key: &str) -> Self {
        match map.get(key) {
            Some(Value::Number(number)) => number
                .as_i64()
                .map(Self::Int)
                .unwrap_or_else(|| Self::Expr(number.to_string())),
            Some(Value::String(text)) => Self::parse(text),
            _ => Self::Unset,
        }
    }

    fn emit(&self, map: &mut Mapping, key: &str) {
        match self {
            Self::Unset => {}
            Self::Int(number) => put(map, key, Value::Number((*number).into())),
            Self::Expr(text) => put_string_nonempty(map, key, text),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }
}

/// Closed sum over the requirement kinds the downstream plugin understands.
/// Each variant carries only the fields meaningful to it; the six numeric
/// comparators share a variant since they differ only in operator.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequirementKind {
    #[default]
    None,
    HasPermission {
        permission: String,
    },
    LacksPermission {
        permission: String,
    },
    HasPermissions {
        permissions: Vec<String>,
        minimum: u32,
    },
    HasMoney {
        amount: Amount,
    },
    HasItem {
        material: String,
        amount: u32,
    },
    HasExp {
        amount: u32,
        level: bool,
    },
    HasMeta {
        key: String,
        meta_type: String,
        value: String,
    },
    StringEquals {
        input: String,
        output: String,
    },
    StringNotEquals {
        input: String,
        output: String,
    },
    StringEqualsIgnoreCase {
        input: String,
        output: String,
    },
    StringContains {
        input: String,
        output: String,
    },
    StringNotContains {
        input: String,
        output: String,
    },
    StringLength {
        input: String,
        min: u32,
        max: u32,
    },
    RegexMatches {
        input: String,
        output: String,
    },
    RegexNotMatches {
        input: String,
        output: String,
    },
    Compare {
        op: CompareOp,
        input: String,
        output: String,
    },
    Javascript {
        expression: String,
    },
    IsNear {
        location: String,
        distance: Amount,
    },
    IsNotNear {
        location: String,
        distance: Amount,
    },
    IsObject {
        input: String,
        object_type: String,
    },
}

impl RequirementKind {
    pub fn type_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::HasPermission { .. } => "has permission",
            Self::LacksPermission { .. } => "!has permission",
            Self::HasPermissions { .. } => "has permissions",
            Self::HasMoney { .. } => "has money",
            Self::HasItem { .. } => "has item",
            Self::HasExp { .. } => "has exp",
            Self::HasMeta { .. } => "has meta",
            Self::StringEquals { .. } => "string equals",
            Self::StringNotEquals { .. } => "!string equals",
            Self::StringEqualsIgnoreCase { .. } => "string equals ignorecase",
            Self::StringContains { .. } => "string contains",
            Self::StringNotContains { .. } => "!string contains",
            Self::StringLength { .. } => "string length",
            Self::RegexMatches { .. } => "regex matches",
            Self::RegexNotMatches { .. } => "!regex matches",
            Self::Compare { op, .. } => op.as_str(),
            Self::Javascript { .. } => "javascript",
            Self::IsNear { .. } => "is near",
            Self::IsNotNear { .. } => "!is near",
            Self::IsObject { .. } => "is object",
        }
    }
}

/// A single named condition gating an action or visibility. `id` is the
/// map key when the requirement lives in a keyed map; empty otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Requirement {
    pub id: String,
    pub kind: RequirementKind,
    pub deny_commands: Vec<String>,
    pub success_commands: Vec<String>,
}

impl Requirement {
    pub fn of(kind: RequirementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

pub fn encode(req: &Requirement) -> Mapping {
    let mut map = Mapping::new();
    let type_str = req.kind.type_str();
    if !type_str.is_empty() {
        put_string(&mut map, "type", type_str);
    }

    match &req.kind {
        RequirementKind::None => {}
        RequirementKind::HasPermission { permission }
        | RequirementKind::LacksPermission { permission } => {
            put_string_nonempty(&mut map, "permission", permission);
        }
        RequirementKind::HasPermissions {
            permissions,
            minimum,
        } => {
            let trimmed: Vec<String> = permissions
                .iter()
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect();
            put_string_list(&mut map, "permissions", &trimmed);
            put_u32_nonzero(&mut map, "minimum", *minimum);
        }
        RequirementKind::HasMoney { amount } => {
            amount.emit(&mut map, "amount");
        }
        RequirementKind::HasItem { material, amount } => {
            put_string_nonempty(&mut map, "material", material);
            put_u32(&mut map, "amount", (*amount).max(1));
        }
        RequirementKind::HasExp { amount, level } => {
            put_u32(&mut map, "amount", *amount);
            put_bool_true(&mut map, "level", *level);
        }
        RequirementKind::HasMeta {
            key,
            meta_type,
            value,
        } => {
            put_string_nonempty(&mut map, "key", key);
            put_string_nonempty(&mut map, "meta_type", meta_type);
            put_string_nonempty(&mut map, "value", value);
        }
        RequirementKind::StringEquals { input, output }
        | RequirementKind::StringNotEquals { input, output }
        | RequirementKind::StringEqualsIgnoreCase { input, output }
        | RequirementKind::StringContains { input, output }
        | RequirementKind::StringNotContains { input, output }
        | RequirementKind::Compare { input, output, .. } => {
            put_string_nonempty(&mut map, "input", input);
            put_string_nonempty(&mut map, "output", output);
        }
        RequirementKind::RegexMatches { input, output }
        | RequirementKind::RegexNotMatches { input, output } => {
            put_string_nonempty(&mut map, "input", input);
            put_string_nonempty(&mut map, "output", output);
            // Some downstream configs read the pattern from `regex` instead.
            put_string_nonempty(&mut map, "regex", output);
        }
        RequirementKind::StringLength { input, min, max } => {
            put_string_nonempty(&mut map, "input", input);
            put_u32_nonzero(&mut map, "min", *min);
            put_u32_nonzero(&mut map, "max", *max);
        }
        RequirementKind::Javascript { expression } => {
            put_string_nonempty(&mut map, "expression", expression);
        }
        RequirementKind::IsNear { location, distance }
        | RequirementKind::IsNotNear { location, distance } => {
            put_string_nonempty(&mut map, "location", location);
            distance.emit(&mut map, "distance");
        }
        RequirementKind::IsObject { input, object_type } => {
            put_string_nonempty(&mut map, "input", input);
            put_string_nonempty(&mut map, "object", object_type);
        }
    }

    put_string_list(&mut map, "deny_commands", &req.deny_commands);
    put_string_list(&mut map, "success_commands", &req.success_commands);
    map
}

pub fn decode(id: &str, map: &Mapping) -> Requirement {
    let type_str = str_entry(map, "type");
    let kind = match type_str.as_str() {
        "has permission" => RequirementKind::HasPermission {
            permission: str_entry(map, "permission"),
        },
        "!has permission" => RequirementKind::LacksPermission {
            permission: str_entry(map, "permission"),
        },
        "has permissions" => RequirementKind::HasPermissions {
            permissions: permissions_entry(map),
            minimum: u32_entry(map, "minimum"),
        },
        "has money" => RequirementKind::HasMoney {
            amount: Amount::from_entry(map, "amount"),
        },
        "has item" => RequirementKind::HasItem {
            material: str_entry(map, "material"),
            amount: u32_entry(map, "amount"),
        },
        "has exp" => RequirementKind::HasExp {
            amount: u32_entry(map, "amount"),
            level: bool_entry(map, "level"),
        },
        "has meta" => RequirementKind::HasMeta {
            key: str_entry(map, "key"),
            meta_type: str_entry(map, "meta_type"),
            value: str_entry(map, "value"),
        },
        "string equals" => RequirementKind::StringEquals {
            input: str_entry(map, "input"),
            output: str_entry(map, "output"),
        },
        "!string equals" => RequirementKind::StringNotEquals {
            input: str_entry(map, "input"),
            output: str_entry(map, "output"),
        },
        "string equals ignorecase" => RequirementKind::StringEqualsIgnoreCase {
            input: str_entry(map, "input"),
            output: str_entry(map, "output"),
        },
        "string contains" => RequirementKind::StringContains {
            input: str_entry(map, "input"),
            output: str_entry(map, "output"),
        },
        "!string contains" => RequirementKind::StringNotContains {
            input: str_entry(map, "input"),
            output: str_entry(map, "output"),
        },
        "string length" => RequirementKind::StringLength {
            input: str_entry(map, "input"),
            min: u32_entry(map, "min"),
            max: u32_entry(map, "max"),
        },
        "regex matches" => RequirementKind::RegexMatches {
            input: str_entry(map, "input"),
            output: output_or_regex(map),
        },
        "!regex matches" => RequirementKind::RegexNotMatches {
            input: str_entry(map, "input"),
            output: output_or_regex(map),
        },
        "javascript" => RequirementKind::Javascript {
            expression: str_entry(map, "expression"),
        },
        "is near" => RequirementKind::IsNear {
            location: str_entry(map, "location"),
            distance: Amount::from_entry(map, "distance"),
        },
        "!is near" => RequirementKind::IsNotNear {
            location: str_entry(map, "location"),
            distance: Amount::from_entry(map, "distance"),
        },
        "is object" => RequirementKind::IsObject {
            input: str_entry(map, "input"),
            object_type: str_entry(map, "object"),
        },
        other => match CompareOp::from_str(other) {
            Some(op) => RequirementKind::Compare {
                op,
                input: str_entry(map, "input"),
                output: str_entry(map, "output"),
            },
            None => RequirementKind::None,
        },
    };

    Requirement {
        id: id.to_string(),
        kind,
        deny_commands: string_list_entry(map, "deny_commands"),
        success_commands: string_list_entry(map, "success_commands"),
    }
}

/// Writer-side keying for requirement groups: `requirement_1..N` in order.
pub fn encode_numbered(requirements: &[Requirement]) -> Mapping {
    let mut out = Mapping::new();
    for (index, req) in requirements.iter().enumerate() {
        out.insert(
            Value::String(format!("requirement_{}", index + 1)),
            Value::Mapping(encode(req)),
        );
    }
    out
}

/// Decode a `requirements:` mapping, preserving each entry's map key as its `id`.
pub fn decode_keyed(requirements: &Mapping) -> Vec<Requirement> {
    let mut out = Vec::new();
    for (key, entry) in requirements {
        let Some(map) = entry.as_mapping() else {
            continue;
        };
        let id = scalar_string(key).unwrap_or_default();
        out.push(decode(&id, map));
    }
    out
}

fn output_or_regex(map: &Mapping) -> String {
    let output = str_entry(map, "output");
    if output.is_empty() {
        str_entry(map, "regex")
    } else {
        output
    }
}

fn permissions_entry(map: &Mapping) -> Vec<String> {
    match map.get("permissions") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_string)
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
