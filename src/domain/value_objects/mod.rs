pub mod crash_type;
pub mod retention;

pub use crash_type::CrashType;
pub use retention::RetentionPolicy;
