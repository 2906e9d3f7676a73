pub mod controller;
pub mod inspector;
pub mod shell;

pub use controller::AdbAppController;
pub use inspector::AdbInspector;
pub use shell::AdbShell;
