//! Config store collaborator
//!
//! The panel reads and writes options through [`ConfigStore`] only. Sections
//! are addressed by `(section type, section id)`; options hold a [`Value`].
pub mod memory;
pub mod value;

pub use memory::MemoryStore;
pub use value::Value;

use rand::Rng;

use crate::error::StoreError;

/// Key/section/option store holding the daemon configuration
pub trait ConfigStore {
    fn get(&self, section_type: &str, section_id: &str, key: &str) -> Option<Value>;

    /// Set an option, creating the section when it does not exist yet
    fn set(
        &mut self,
        section_type: &str,
        section_id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    fn unset(&mut self, section_type: &str, section_id: &str, key: &str) -> Result<(), StoreError>;

    /// Visit the ids of every section of a type, in stored order
    fn foreach_section(&self, section_type: &str, f: &mut dyn FnMut(&str));

    fn delete_section(&mut self, section_type: &str, section_id: &str) -> Result<(), StoreError>;

    /// Rearrange the sections of a type; ids not listed keep their relative order after the listed ones
    fn reorder(&mut self, section_type: &str, order: &[&str]) -> Result<(), StoreError>;

    /// Persist pending changes
    fn save(&mut self) -> Result<(), StoreError>;

    fn section_ids(&self, section_type: &str) -> Vec<String> {
        let mut ids = Vec::new();
        self.foreach_section(section_type, &mut |id: &str| ids.push(id.to_string()));
        ids
    }

    fn has_section(&self, section_type: &str, section_id: &str) -> bool {
        let mut found = false;
        self.foreach_section(section_type, &mut |id: &str| found |= id == section_id);
        found
    }
}

/// Generate an anonymous section id (`cfg` followed by six hex digits) not rejected by `taken`
pub fn fresh_section_id(taken: impl Fn(&str) -> bool) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let id = format!("cfg{:06x}", rng.gen::<u32>() & 0x00ff_ffff);
        if !taken(&id) {
            return id;
        }
    }
}
