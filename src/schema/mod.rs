//! Schema registry: every option the panel knows about, grouped by section type
pub mod condition;
pub mod datatype;
pub mod easytier;
pub mod option;

pub use condition::{Clause, Condition};
pub use datatype::Datatype;
pub use easytier::{GLOBAL, NETWORK};
pub use option::{OptionKind, OptionSpec};

/// How many sections of a type exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one section with this fixed name
    Named(&'static str),
    /// Zero or more anonymous sections, in order
    Repeated,
}

/// Options of one section type
#[derive(Debug)]
pub struct SectionSchema {
    pub section_type: &'static str,
    pub cardinality: Cardinality,
    pub options: &'static [OptionSpec],
}

impl SectionSchema {
    /// Look up an option that may not exist
    pub fn find(&self, key: &str) -> Option<&'static OptionSpec> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Look up a declared option.
    ///
    /// # Panics
    ///
    /// Panics when `key` is not declared for this section type; callers
    /// holding untrusted keys go through [`SectionSchema::find`].
    pub fn option(&self, key: &str) -> &'static OptionSpec {
        match self.find(key) {
            Some(spec) => spec,
            None => panic!(
                "option '{}' is not declared for section type '{}'",
                key, self.section_type
            ),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.options.iter().map(|o| o.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_controllers(schema: &SectionSchema) {
        for spec in schema.options {
            for clause in spec.depends {
                for cond in clause.iter() {
                    let controller = schema.find(cond.key);
                    assert!(
                        controller.is_some(),
                        "{} depends on undeclared {}",
                        spec.key,
                        cond.key
                    );
                    // controllers must be unconditional so evaluation never recurses forever
                    assert!(
                        controller.map(|c| c.depends.is_empty()).unwrap_or(false),
                        "{} is controlled by conditional option {}",
                        spec.key,
                        cond.key
                    );
                }
            }
        }
    }

    #[test]
    fn dependencies_point_at_declared_options() {
        check_controllers(&GLOBAL);
        check_controllers(&NETWORK);
    }

    #[test]
    fn keys_are_unique() {
        for schema in [&GLOBAL, &NETWORK] {
            let mut keys: Vec<_> = schema.keys().collect();
            keys.sort_unstable();
            let before = keys.len();
            keys.dedup();
            assert_eq!(before, keys.len(), "{}", schema.section_type);
        }
    }

    #[test]
    fn defaults_pass_their_datatype() {
        for schema in [&GLOBAL, &NETWORK] {
            for spec in schema.options {
                if let Some(default) = spec.default {
                    assert!(spec.datatype.accepts(default), "{}", spec.key);
                }
            }
        }
    }

    #[test]
    fn declared_defaults() {
        assert_eq!(GLOBAL.option("local_conf_path").default, Some("/etc/easytier.conf"));
        assert_eq!(GLOBAL.option("config_path").default, Some("/etc/easytier"));
        assert_eq!(NETWORK.option("enabled").default, Some("1"));
        assert_eq!(GLOBAL.option("peers").kind, OptionKind::OrderedList);
        assert_eq!(NETWORK.option("fw_masq_ifaces").kind, OptionKind::Set);
        assert_eq!(GLOBAL.cardinality, Cardinality::Named("global"));
    }

    #[test]
    fn section_types_and_free_text_options() {
        assert_eq!(GLOBAL.section_type, "easytier");
        assert_eq!(NETWORK.section_type, "network");
        for key in ["peers", "hostname", "device", "local_conf_path", "config_path"] {
            assert_eq!(GLOBAL.option(key).datatype, Datatype::Any, "{}", key);
        }
        assert_eq!(GLOBAL.option("ipv4").datatype, Datatype::Ipv4);
        assert_eq!(NETWORK.option("fw_forward_ifaces").datatype, Datatype::Device);
    }

    #[test]
    #[should_panic(expected = "not declared")]
    fn undeclared_option_is_fatal() {
        GLOBAL.option("mtu");
    }
}
