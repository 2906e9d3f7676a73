pub mod controller;
pub mod inspector;
pub mod store;

pub use controller::{AppController, ControlError};
pub use inspector::{Census, InspectionError, ProcessInspector};
pub use store::{ForensicStore, ReportEntry, StoreError};
