//! Configuration for the navigation cache.
//!
//! Backend and thumbnail preferences ([`settings::Config`]) are stored as a
//! TOML file and loaded once, before the cache context is built.

pub mod settings;
