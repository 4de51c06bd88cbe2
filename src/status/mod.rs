//! Live running / not-running status of the daemon
pub mod label;
pub mod poller;
pub mod service;

pub use label::StatusLabel;
pub use poller::{PollState, StatusPoller};
pub use service::{running_from, ServiceSupervisor, UbusSupervisor};
