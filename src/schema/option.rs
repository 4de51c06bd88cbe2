//! Option declarations
use super::condition::Clause;
use super::datatype::Datatype;

/// How an option holds its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean stored as `'0'`/`'1'`
    Flag,
    Value,
    /// Single value that is masked when displayed
    Secret,
    /// Ordered list, duplicates kept
    OrderedList,
    /// Unordered list of distinct values
    Set,
}

impl OptionKind {
    pub fn is_list(&self) -> bool {
        matches!(self, OptionKind::OrderedList | OptionKind::Set)
    }
}

/// Static description of one configurable option
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Option name in the config store
    pub key: &'static str,
    pub kind: OptionKind,
    pub datatype: Datatype,
    pub default: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    /// Required while visible
    pub required: bool,
    /// Alternative clauses; an empty slice means always visible
    pub depends: &'static [Clause],
    pub title: &'static str,
    pub description: &'static str,
}

impl OptionSpec {
    /// A free-text option with no dependencies
    pub const fn value(key: &'static str, title: &'static str) -> Self {
        OptionSpec {
            key,
            kind: OptionKind::Value,
            datatype: Datatype::Any,
            default: None,
            placeholder: None,
            required: false,
            depends: &[],
            title,
            description: "",
        }
    }

    /// A boolean option defaulting to off
    pub const fn flag(key: &'static str, title: &'static str) -> Self {
        OptionSpec {
            kind: OptionKind::Flag,
            datatype: Datatype::Bool,
            default: Some("0"),
            ..OptionSpec::value(key, title)
        }
    }

    pub const fn kind(self, kind: OptionKind) -> Self {
        OptionSpec { kind, ..self }
    }

    pub const fn datatype(self, datatype: Datatype) -> Self {
        OptionSpec { datatype, ..self }
    }

    pub const fn default(self, default: &'static str) -> Self {
        OptionSpec {
            default: Some(default),
            ..self
        }
    }

    pub const fn placeholder(self, placeholder: &'static str) -> Self {
        OptionSpec {
            placeholder: Some(placeholder),
            ..self
        }
    }

    pub const fn required(self) -> Self {
        OptionSpec {
            required: true,
            ..self
        }
    }

    pub const fn depends(self, depends: &'static [Clause]) -> Self {
        OptionSpec { depends, ..self }
    }

    pub const fn description(self, description: &'static str) -> Self {
        OptionSpec {
            description,
            ..self
        }
    }
}
