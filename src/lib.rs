#![warn(missing_docs)]
#![deny(unsafe_code)]
//! # envstruct - populate structs from environment variables
//!
//! envstruct fills the fields of a (possibly deeply nested) struct from
//! environment variables. Each field's key is built from per-field tags:
//!
//! - **Prefix** - prepended to every composed key (`APP_...`)
//! - **Tag** - each tagged level contributes one uppercased segment
//!   (`APP_DATABASE_URL`)
//! - **Override** - a comma-separated list of verbatim keys tried in order
//! - **Ignore** - a boolean tag that drops one level's segment
//!
//! Values are handed to a pluggable [`Unmarshal`] implementation ([`Yaml`]
//! by default). Sequences and maps are split first, so `PORTS=80,443` fills a
//! `Vec<u16>` and `LABELS=tier:web,zone:a` fills a `HashMap<String, String>`.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use envstruct::{Envstruct, MockEnv};
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     name: String,
//!     ports: Vec<u16>,
//!     labels: HashMap<String, String>,
//!     database: Database,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Database {
//!     url: String,
//!     pool: Option<u32>,
//! }
//!
//! envstruct::record!(Config {
//!     name => [env = "name"],
//!     ports => [env = "ports"],
//!     labels => [env = "labels"],
//!     database => [env = "database"],
//! });
//!
//! envstruct::record!(Database {
//!     url => [env = "url", override = "DATABASE_URL"],
//!     pool => [env = "pool"],
//! });
//!
//! let envstruct = Envstruct::builder()
//!     .prefix("app")
//!     .override_key("override")
//!     .unmarshaler(envstruct::Yaml)
//!     .source(MockEnv::from_pairs([
//!         ("APP_NAME", "demo"),
//!         ("APP_PORTS", "80, 443"),
//!         ("APP_LABELS", "tier:web,zone:a"),
//!         ("DATABASE_URL", "postgres://localhost/demo"),
//!         ("APP_DATABASE_POOL", "8"),
//!     ]))
//!     .build();
//!
//! let mut config = Config::default();
//! envstruct.fetch(&mut config).unwrap();
//!
//! assert_eq!(config.name, "demo");
//! assert_eq!(config.ports, vec![80, 443]);
//! assert_eq!(config.labels["zone"], "a");
//! assert_eq!(config.database.url, "postgres://localhost/demo");
//! assert_eq!(config.database.pool, Some(8));
//! ```
//!
//! ## Registering types
//!
//! | Macro | Use for |
//! |-------|---------|
//! | [`record!`] | structs whose fields are walked |
//! | [`scalar!`] | your own [`Facet`](facet::Facet) types, unmarshaled whole |
//!
//! Numbers, `bool`, `char`, `String`, `PathBuf`, `Option<T>`, `Vec<T>`,
//! `VecDeque<T>`, `HashMap`, `BTreeMap` and `IndexMap` work out of the box.
//! Nested collections such as `Vec<Vec<T>>` are not split beyond one level.

pub(crate) mod macros;

pub(crate) mod builder;
pub mod coerce;
pub(crate) mod env;
pub(crate) mod error;
pub(crate) mod provenance;
pub(crate) mod reflect;
pub(crate) mod resolver;
pub(crate) mod unmarshal;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use builder::{DEFAULT_DELIMITER, Envstruct, EnvstructBuilder};
pub use coerce::Value;
pub use env::{EnvSource, MockEnv, StdEnv};
pub use error::{Error, ErrorCategory, ErrorKind};
pub use provenance::{FieldKeys, Provenance};
pub use reflect::{Field, Kind, Record, Reflect, Tags, Visitor};
pub use resolver::LookupKeys;
pub use unmarshal::{Json, Unmarshal, UnmarshalError, Yaml};

/// Populate `target` from the process environment, using fields tagged
/// `env` and YAML unmarshaling.
pub fn fetch_env<T: Reflect>(target: &mut T) -> Result<(), Error> {
    Envstruct::new("env").fetch(target)
}
