//! Configuration panel core for the EasyTier overlay network daemon.
//!
//! * [`schema`] declares every option of the `easytier` package.
//! * [`form`] edits sections against that schema, deciding which options are
//!   shown and required from the live values of their section.
//! * [`store`] is the key/section/option store the form reads and writes.
//! * [`status`] polls the service supervisor and publishes a running label.
pub mod config;
pub mod error;
pub mod form;
pub mod schema;
pub mod status;
pub mod store;

pub use crate::config::PanelSettings;
pub use error::{PanelError, StatusLookupError, StoreError, ValidationError, ValidationErrors, ValidationReason};
pub use form::{Panel, Record, SectionCollection};
pub use status::{StatusLabel, StatusPoller};
pub use store::{ConfigStore, MemoryStore, Value};
