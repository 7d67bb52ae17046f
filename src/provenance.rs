//! Where populated values came from.
//!
//! [`Envstruct::fetch_with_provenance`](crate::Envstruct::fetch_with_provenance)
//! reports one [`Provenance`] per populated field, and
//! [`Envstruct::lookup_keys`](crate::Envstruct::lookup_keys) reports one
//! [`FieldKeys`] per leaf without reading anything.

use core::fmt;

use crate::reflect::Kind;
use crate::resolver::LookupKeys;

/// The environment key that populated a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Dotted Rust field path, e.g. `database.url`.
    pub field: String,
    /// The environment key whose value was used.
    pub key: String,
    /// The field's declared kind.
    pub kind: Kind,
}

impl Provenance {
    /// Create a provenance record.
    pub fn new(field: impl Into<String>, key: impl Into<String>, kind: Kind) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.field, self.key)
    }
}

/// The keys a leaf field would be looked up under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeys {
    /// Dotted Rust field path.
    pub field: String,
    /// The field's declared kind.
    pub kind: Kind,
    /// Candidate keys, in lookup order.
    pub keys: LookupKeys,
}

impl fmt::Display for FieldKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind, self.keys)
    }
}
