//! The whole `easytier` package: the global section plus the network entries
use tracing::{info, warn};

use crate::error::{PanelError, ValidationError, ValidationErrors};
use crate::schema::{Cardinality, SectionSchema, GLOBAL, NETWORK};
use crate::store::{ConfigStore, Value};

use super::collection::SectionCollection;
use super::record::Record;

fn named_section(schema: &SectionSchema) -> &'static str {
    match schema.cardinality {
        Cardinality::Named(name) => name,
        Cardinality::Repeated => panic!(
            "section type '{}' has no fixed name",
            schema.section_type
        ),
    }
}

/// Editable view of the daemon configuration
#[derive(Debug, Clone)]
pub struct Panel {
    global: Record,
    networks: SectionCollection,
}

impl Default for Panel {
    fn default() -> Self {
        Panel::new()
    }
}

impl Panel {
    /// A first-time configuration: global defaults and no networks
    pub fn new() -> Self {
        Panel {
            global: Record::with_defaults(&GLOBAL, named_section(&GLOBAL)),
            networks: SectionCollection::new(&NETWORK),
        }
    }

    /// Read the configuration; a missing global section starts from its defaults
    pub fn load(store: &dyn ConfigStore) -> Self {
        let section = named_section(&GLOBAL);
        if !store.has_section(GLOBAL.section_type, section) {
            info!("No {} section yet, using defaults", section);
        }
        Panel {
            global: Record::load(store, &GLOBAL, section),
            networks: SectionCollection::load(store, &NETWORK),
        }
    }

    pub fn global(&self) -> &Record {
        &self.global
    }

    /// Validate and commit one global option
    ///
    /// # Panics
    ///
    /// Panics when `key` is not a global option.
    pub fn set_global(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        self.global.set_field(&GLOBAL, key, value)
    }

    pub fn unset_global(&mut self, key: &str) -> Result<(), ValidationError> {
        self.global.unset_field(&GLOBAL, key)
    }

    pub fn networks(&self) -> &SectionCollection {
        &self.networks
    }

    pub fn networks_mut(&mut self) -> &mut SectionCollection {
        &mut self.networks
    }

    /// Check every visible field of every section
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.global.validate(&GLOBAL);
        errors.extend(self.networks.validate_all());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validate, write active values back and persist.
    ///
    /// Nothing is written when any visible field is invalid.
    pub fn save(&self, store: &mut dyn ConfigStore) -> Result<(), PanelError> {
        if let Err(errors) = self.validate() {
            warn!("Refusing to save, {} invalid field(s): {}", errors.len(), errors);
            return Err(PanelError::Invalid(errors));
        }
        self.global.write(store, &GLOBAL)?;
        self.networks.write(store)?;
        store.save()?;
        info!(
            "Saved global section and {} network(s)",
            self.networks.len()
        );
        Ok(())
    }
}
