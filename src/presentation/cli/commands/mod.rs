pub mod daemon;
pub mod restart;
pub mod stats;
pub mod status;
