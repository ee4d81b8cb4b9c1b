//! Network endpoints for contract migration and deployment tooling.
//!
//! A [`ConfigStore`] holds the default rpc endpoint and a table of named
//! network profiles. It is built once, either from the built-in literal
//! configuration ([`config::get`]) or from a JSON/TOML file, and is
//! read-only afterwards.

pub mod config;
pub mod error;
pub mod network;
pub mod store;

pub use error::ConfigError;
pub use network::{Endpoint, NetworkId, NetworkProfile, Port};
pub use store::ConfigStore;
