//! Warden — watchdog and crash forensics for a single Android application,
//! driven over ADB.
//!
//! Hexagonal layout: `domain` holds entities, value objects and ports;
//! `application` holds configuration and the orchestrating services;
//! `infrastructure` provides the ADB and filesystem adapters;
//! `presentation` is the CLI.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
