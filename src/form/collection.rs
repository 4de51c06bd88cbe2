//! Ordered, repeatable sections such as the `network` entries
use tracing::{debug, info};

use crate::error::{PanelError, StoreError, ValidationError};
use crate::schema::SectionSchema;
use crate::store::{fresh_section_id, ConfigStore, Value};

use super::record::Record;

/// An ordered list of records sharing one section schema.
///
/// Records are addressed by their section id. Values of the `id` option are
/// not checked for uniqueness; two entries may name the same network.
#[derive(Debug, Clone)]
pub struct SectionCollection {
    schema: &'static SectionSchema,
    records: Vec<Record>,
}

impl SectionCollection {
    pub fn new(schema: &'static SectionSchema) -> Self {
        SectionCollection {
            schema,
            records: Vec::new(),
        }
    }

    /// Read every section of the schema's type, in stored order
    pub fn load(store: &dyn ConfigStore, schema: &'static SectionSchema) -> Self {
        let records = store
            .section_ids(schema.section_type)
            .iter()
            .map(|id| Record::load(store, schema, id))
            .collect();
        SectionCollection { schema, records }
    }

    pub fn schema(&self) -> &'static SectionSchema {
        self.schema
    }

    /// Append a record holding the schema defaults under a fresh section id
    pub fn add(&mut self) -> &Record {
        let section = fresh_section_id(|id| self.position(id).is_some());
        info!("Adding {} section {}", self.schema.section_type, section);
        self.records.push(Record::with_defaults(self.schema, section));
        &self.records[self.records.len() - 1]
    }

    /// Remove a record, keeping the order of the others
    pub fn remove(&mut self, section: &str) -> Result<Record, PanelError> {
        let index = self.index_of(section)?;
        info!("Removing {} section {}", self.schema.section_type, section);
        Ok(self.records.remove(index))
    }

    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, section: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.section() == section)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Move a record so that it ends up at `new_index`
    pub fn move_to(&mut self, section: &str, new_index: usize) -> Result<(), PanelError> {
        let len = self.records.len();
        if new_index >= len {
            return Err(PanelError::IndexOutOfRange {
                index: new_index,
                len,
            });
        }
        let index = self.index_of(section)?;
        let record = self.records.remove(index);
        self.records.insert(new_index, record);
        debug!("Moved {} from {} to {}", section, index, new_index);
        Ok(())
    }

    /// Validate and commit one field of one record
    ///
    /// # Panics
    ///
    /// Panics when `key` is not declared in the collection's schema.
    pub fn set_field(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), PanelError> {
        let schema = self.schema;
        let index = self.index_of(section)?;
        self.records[index].set_field(schema, key, value)?;
        Ok(())
    }

    pub fn unset_field(&mut self, section: &str, key: &str) -> Result<(), PanelError> {
        let schema = self.schema;
        let index = self.index_of(section)?;
        self.records[index].unset_field(schema, key)?;
        Ok(())
    }

    /// Every visible-field failure across all records
    pub fn validate_all(&self) -> Vec<ValidationError> {
        self.records
            .iter()
            .flat_map(|r| r.validate(self.schema))
            .collect()
    }

    /// Mirror the collection into the store: drop removed sections, write
    /// active values, then restore the collection's order
    pub fn write(&self, store: &mut dyn ConfigStore) -> Result<(), StoreError> {
        let section_type = self.schema.section_type;
        for stale in store.section_ids(section_type) {
            if self.get(&stale).is_none() {
                debug!("Deleting {} section {}", section_type, stale);
                store.delete_section(section_type, &stale)?;
            }
        }
        for record in &self.records {
            record.write(store, self.schema)?;
        }
        let order: Vec<&str> = self.records.iter().map(Record::section).collect();
        store.reorder(section_type, &order)
    }

    fn position(&self, section: &str) -> Option<usize> {
        self.records.iter().position(|r| r.section() == section)
    }

    fn index_of(&self, section: &str) -> Result<usize, PanelError> {
        self.position(section).ok_or_else(|| PanelError::UnknownSection {
            section_type: self.schema.section_type.to_string(),
            section_id: section.to_string(),
        })
    }
}
