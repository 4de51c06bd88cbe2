//! One section's option values, edited field by field against its schema
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{StoreError, ValidationError, ValidationReason};
use crate::schema::datatype::normalize_bool;
use crate::schema::{Datatype, OptionKind, OptionSpec, SectionSchema};
use crate::store::{ConfigStore, Value};

use super::visibility;

/// Values of a single section, keyed by option name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    section: String,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// A record with no values at all
    pub fn new(section: impl Into<String>) -> Self {
        Record {
            section: section.into(),
            values: BTreeMap::new(),
        }
    }

    /// A record holding every declared default
    pub fn with_defaults(schema: &SectionSchema, section: impl Into<String>) -> Self {
        let mut record = Record::new(section);
        for spec in schema.options {
            if let Some(default) = spec.default {
                record.insert(spec.key, default.into());
            }
        }
        record
    }

    /// Read a section from the store; options it does not hold take their defaults
    pub fn load(store: &dyn ConfigStore, schema: &SectionSchema, section: &str) -> Self {
        let mut record = Record::with_defaults(schema, section);
        for key in schema.keys() {
            if let Some(value) = store.get(schema.section_type, section, key) {
                record.insert(key, value);
            }
        }
        record
    }

    /// Section id this record belongs to
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value of `key` when it holds a single string
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_scalar)
    }

    pub fn is_on(&self, key: &str) -> bool {
        self.values.get(key).map(Value::is_on).unwrap_or(false)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store a value without any checks
    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Validate and commit one field.
    ///
    /// On failure the record is left unchanged. Clearing a field that is
    /// required while visible fails with [`ValidationReason::Required`].
    ///
    /// # Panics
    ///
    /// Panics when `key` is not declared in `schema`.
    pub fn set_field(
        &mut self,
        schema: &SectionSchema,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        let spec = schema.option(key);
        let value = normalize(spec, value.into())
            .map_err(|reason| ValidationError::new(&self.section, key, reason))?;

        if value.is_empty() {
            if visibility::is_required(schema, key, self) {
                return Err(ValidationError::new(&self.section, key, ValidationReason::Required));
            }
            self.clear(spec);
            debug!("Cleared {}.{}", self.section, key);
            return Ok(());
        }

        debug!("Set {}.{} = {}", self.section, key, display_value(spec, &value));
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Clear one field; same rules as setting it to an empty value
    pub fn unset_field(&mut self, schema: &SectionSchema, key: &str) -> Result<(), ValidationError> {
        self.set_field(schema, key, "")
    }

    /// Check every visible field, collecting all failures
    pub fn validate(&self, schema: &SectionSchema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for spec in visibility::active_options(schema, self) {
            let value = self.values.get(spec.key);
            let empty = value.map(Value::is_empty).unwrap_or(true);
            if empty {
                if spec.required {
                    errors.push(ValidationError::new(
                        &self.section,
                        spec.key,
                        ValidationReason::Required,
                    ));
                }
                continue;
            }
            if let Some(value) = value {
                if let Err(reason) = normalize(spec, value.clone()) {
                    errors.push(ValidationError::new(&self.section, spec.key, reason));
                }
            }
        }
        errors
    }

    /// Write the active fields back; hidden fields keep whatever the store holds
    pub fn write(&self, store: &mut dyn ConfigStore, schema: &SectionSchema) -> Result<(), StoreError> {
        for spec in visibility::active_options(schema, self) {
            match self.values.get(spec.key) {
                Some(value) if !value.is_empty() || spec.default.is_some() => {
                    store.set(schema.section_type, &self.section, spec.key, value.clone())?
                }
                _ => store.unset(schema.section_type, &self.section, spec.key)?,
            }
        }
        Ok(())
    }

    /// Options with a default keep an explicit empty value so the default
    /// does not come back on the next load
    fn clear(&mut self, spec: &OptionSpec) {
        if spec.default.is_some() && spec.kind != OptionKind::Flag {
            self.values.insert(spec.key.to_string(), Value::Scalar(String::new()));
        } else {
            self.values.remove(spec.key);
        }
    }
}

/// Bring a raw value into the shape its option stores, checking the datatype
fn normalize(spec: &OptionSpec, value: Value) -> Result<Value, ValidationReason> {
    if spec.kind.is_list() {
        let mut items: Vec<String> = Vec::new();
        for item in value.items() {
            if item.is_empty() {
                continue;
            }
            check(spec.datatype, item)?;
            if spec.kind == OptionKind::Set && items.iter().any(|i| i == item) {
                continue;
            }
            items.push(item.to_string());
        }
        return Ok(Value::List(items));
    }

    let scalar = match value {
        Value::Scalar(s) => s,
        Value::List(mut items) if items.len() <= 1 => items.pop().unwrap_or_default(),
        Value::List(_) => return Err(ValidationReason::NotScalar),
    };
    if scalar.is_empty() {
        return Ok(Value::Scalar(scalar));
    }

    if spec.kind == OptionKind::Flag {
        return normalize_bool(&scalar)
            .map(Value::from)
            .ok_or(ValidationReason::Invalid {
                datatype: Datatype::Bool,
                value: scalar,
            });
    }

    check(spec.datatype, &scalar)?;
    Ok(Value::Scalar(scalar))
}

fn check(datatype: Datatype, value: &str) -> Result<(), ValidationReason> {
    if datatype.accepts(value) {
        Ok(())
    } else {
        Err(ValidationReason::Invalid {
            datatype,
            value: value.to_string(),
        })
    }
}

/// Render a value for logs and listings, masking secrets
pub fn display_value(spec: &OptionSpec, value: &Value) -> String {
    if spec.kind == OptionKind::Secret && !value.is_empty() {
        "******".to_string()
    } else {
        value.to_string()
    }
}
