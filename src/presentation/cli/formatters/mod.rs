pub mod health_fmt;
pub mod stats_fmt;
