pub mod adb;
pub mod persistence;
