//! Declarative visibility conditions
//!
//! An option lists zero or more alternative clauses. It is shown when any
//! clause holds, and a clause holds when all of its conditions match the
//! current values of the same section.

/// A single test against the value of another option in the same section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Controlling option
    pub key: &'static str,
    pub expected: &'static str,
    /// Match when the controlling value differs from `expected`
    pub negate: bool,
}

impl Condition {
    /// Visible while `key` equals `expected`
    pub const fn eq(key: &'static str, expected: &'static str) -> Self {
        Condition {
            key,
            expected,
            negate: false,
        }
    }

    /// Visible while `key` differs from `expected`
    pub const fn ne(key: &'static str, expected: &'static str) -> Self {
        Condition {
            key,
            expected,
            negate: true,
        }
    }

    /// Reversed match against the empty string
    pub const fn non_empty(key: &'static str) -> Self {
        Condition::ne(key, "")
    }

    /// Evaluate against the controlling value.
    ///
    /// An unset controller matches nothing, whatever the sense of the test.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match value {
            None => false,
            Some(v) => (v == self.expected) != self.negate,
        }
    }
}

/// A conjunction of conditions
pub type Clause = &'static [Condition];
