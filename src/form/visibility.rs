//! Which options of a section are currently shown and required
//!
//! Everything here is a pure function of the schema and the record values
//! passed in; nothing is cached between calls.
use crate::schema::{Clause, OptionSpec, SectionSchema};

use super::record::Record;

/// Whether `key` is shown given the current values of its section.
///
/// # Panics
///
/// Panics when `key` is not declared in `schema`.
pub fn is_visible(schema: &SectionSchema, key: &str, record: &Record) -> bool {
    spec_visible(schema, schema.option(key), record)
}

/// Declared-required options are only enforced while visible
pub fn is_required(schema: &SectionSchema, key: &str, record: &Record) -> bool {
    let spec = schema.option(key);
    spec.required && spec_visible(schema, spec, record)
}

/// Options currently shown, in declaration order
pub fn active_options<'r>(
    schema: &'r SectionSchema,
    record: &'r Record,
) -> impl Iterator<Item = &'static OptionSpec> + 'r {
    schema
        .options
        .iter()
        .filter(move |spec| spec_visible(schema, spec, record))
}

pub(crate) fn spec_visible(schema: &SectionSchema, spec: &OptionSpec, record: &Record) -> bool {
    spec.depends.is_empty() || spec.depends.iter().any(|c| clause_holds(schema, c, record))
}

fn clause_holds(schema: &SectionSchema, clause: &Clause, record: &Record) -> bool {
    clause
        .iter()
        .all(|cond| cond.matches(controller_value(schema, cond.key, record)))
}

/// A hidden controller reads as unset
fn controller_value<'r>(schema: &SectionSchema, key: &str, record: &'r Record) -> Option<&'r str> {
    if is_visible(schema, key, record) {
        record.scalar(key)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GLOBAL, NETWORK};

    fn global(values: &[(&str, &str)]) -> Record {
        let mut record = Record::new("global");
        for (k, v) in values {
            record.insert(k, (*v).into());
        }
        record
    }

    #[test]
    fn console_selects_value_group() {
        let local = global(&[("console", "0")]);
        assert!(is_visible(&GLOBAL, "network", &local));
        assert!(is_visible(&GLOBAL, "peers", &local));
        assert!(!is_visible(&GLOBAL, "server", &local));
        assert!(!is_visible(&GLOBAL, "machine", &local));

        let console = global(&[("console", "1")]);
        assert!(is_visible(&GLOBAL, "server", &console));
        assert!(is_visible(&GLOBAL, "machine", &console));
        assert!(!is_visible(&GLOBAL, "network", &console));
        assert!(!is_visible(&GLOBAL, "device", &console));
    }

    #[test]
    fn unset_controller_hides_both_groups() {
        let record = global(&[]);
        assert!(!is_visible(&GLOBAL, "server", &record));
        assert!(!is_visible(&GLOBAL, "network", &record));
        assert!(is_visible(&GLOBAL, "port", &record));
    }

    #[test]
    fn copy_config_path_follows_reversed_empty_match() {
        let set = global(&[("config_path", "/etc/easytier")]);
        assert!(is_visible(&GLOBAL, "copy_config_path", &set));

        let empty = global(&[("config_path", "")]);
        assert!(!is_visible(&GLOBAL, "copy_config_path", &empty));

        assert!(!is_visible(&GLOBAL, "copy_config_path", &global(&[])));
    }

    #[test]
    fn required_only_while_visible() {
        let local = global(&[("console", "0")]);
        assert!(is_required(&GLOBAL, "network", &local));
        assert!(is_required(&GLOBAL, "secret", &local));
        assert!(!is_required(&GLOBAL, "server", &local));
        assert!(!is_required(&GLOBAL, "hostname", &local));

        let console = global(&[("console", "1")]);
        assert!(is_required(&GLOBAL, "server", &console));
        assert!(!is_required(&GLOBAL, "network", &console));
    }

    #[test]
    fn interface_pickers_follow_their_flags() {
        let mut record = Record::new("cfg000001");
        record.insert("fw_allow_forward", "1".into());
        record.insert("fw_allow_masq", "0".into());
        assert!(is_visible(&NETWORK, "fw_forward_ifaces", &record));
        assert!(!is_visible(&NETWORK, "fw_masq_ifaces", &record));
    }

    #[test]
    fn active_options_keep_declaration_order() {
        let record = global(&[("console", "1"), ("config_path", "/etc/easytier")]);
        let keys: Vec<_> = active_options(&GLOBAL, &record).map(|o| o.key).collect();
        assert_eq!(
            keys,
            vec![
                "enabled",
                "console",
                "server",
                "machine",
                "port",
                "local_conf_path",
                "config_path",
                "copy_config_path",
                "fw_allow_input",
            ]
        );
    }
}
