//! Form model: records, the repeatable section collection and the visibility engine
pub mod collection;
pub mod panel;
pub mod record;
pub mod visibility;

pub use collection::SectionCollection;
pub use panel::Panel;
pub use record::{display_value, Record};
pub use visibility::{active_options, is_required, is_visible};
