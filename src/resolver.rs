//! Key resolution: deciding which environment keys populate which field.
//!
//! The record is walked depth-first in declaration order. Every field tagged
//! with the configured tag key contributes its uppercased tag value as one
//! segment of the name path; leaves are looked up under the segments joined
//! with `_`. Given a prefix `app` and
//!
//! ```rust
//! #[derive(Default)]
//! struct Config {
//!     port: u16,
//!     smtp: Smtp,
//! }
//!
//! #[derive(Default)]
//! struct Smtp {
//!     host: String,
//!     timeout: u64,
//! }
//!
//! envstruct::record!(Config {
//!     port => [env = "port"],
//!     smtp => [env = "smtp"],
//! });
//! envstruct::record!(Smtp {
//!     host => [env = "host", override = "SMTP_HOST"],
//!     timeout => [env = "timeout"],
//! });
//!
//! let keys: Vec<String> = envstruct::Envstruct::builder()
//!     .prefix("app")
//!     .override_key("override")
//!     .build()
//!     .lookup_keys::<Config>()
//!     .unwrap()
//!     .iter()
//!     .map(|f| f.to_string())
//!     .collect();
//!
//! assert_eq!(
//!     keys,
//!     [
//!         "port (scalar): APP_PORT",
//!         "smtp.host (scalar): SMTP_HOST",
//!         "smtp.timeout (scalar): APP_SMTP_TIMEOUT",
//!     ]
//! );
//! ```
//!
//! Rules:
//! - Untagged fields contribute no segment; untagged records are still walked.
//! - A field whose ignore tag is true contributes no segment, but its
//!   descendants still contribute theirs.
//! - An override tag replaces the composed key with its comma-separated
//!   keys, used verbatim and tried in order. It applies even to ignored
//!   fields.
//! - The first key with a non-empty value wins. No value at all leaves the
//!   field untouched.

use core::fmt;

use crate::builder::{Envstruct, Naming};
use crate::coerce::{Value, coerce};
use crate::env::EnvSource;
use crate::error::{Error, ErrorKind};
use crate::macros::{debug, trace};
use crate::provenance::{FieldKeys, Provenance};
use crate::reflect::{Field, Reflect, Record, Visitor};
use crate::unmarshal::Unmarshal;

/// Candidate environment keys for one leaf field, in lookup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKeys {
    /// The name path joined with `_`. Empty when no segment was contributed.
    Composed(String),
    /// Verbatim keys from the override tag.
    Override(Vec<String>),
}

impl LookupKeys {
    /// Iterate over the candidate keys in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let keys: &[String] = match self {
            LookupKeys::Composed(key) => core::slice::from_ref(key),
            LookupKeys::Override(keys) => keys,
        };
        keys.iter().map(String::as_str)
    }
}

impl fmt::Display for LookupKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKeys::Composed(key) if key.is_empty() => f.write_str("<none>"),
            LookupKeys::Composed(key) => f.write_str(key),
            LookupKeys::Override(keys) => f.write_str(&keys.join(" | ")),
        }
    }
}

/// Uppercased name segments from the root to the current field.
///
/// Extending returns a new path, so siblings never see each other's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NamePath {
    segments: Vec<String>,
}

impl NamePath {
    fn root(prefix: &str) -> Self {
        if prefix.is_empty() {
            Self::default()
        } else {
            Self {
                segments: vec![prefix.to_uppercase()],
            }
        }
    }

    fn with(&self, segment: String) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    fn key(&self) -> String {
        self.segments.join("_")
    }
}

impl<U: Unmarshal> Envstruct<U> {
    /// Populate `target` from the environment.
    ///
    /// Fields with no matching (non-empty) variable keep their current value.
    /// The first error aborts the walk; fields populated before it keep
    /// their new values.
    ///
    /// ```rust
    /// use envstruct::{Envstruct, MockEnv};
    ///
    /// #[derive(Default)]
    /// struct Config {
    ///     name: String,
    ///     ports: Vec<u16>,
    /// }
    ///
    /// envstruct::record!(Config {
    ///     name => [tag = "name"],
    ///     ports => [tag = "ports"],
    /// });
    ///
    /// let envstruct = Envstruct::builder()
    ///     .prefix("app")
    ///     .tag_key("tag")
    ///     .unmarshaler(envstruct::Yaml)
    ///     .source(MockEnv::from_pairs([("APP_NAME", "demo"), ("APP_PORTS", "80, 443")]))
    ///     .build();
    ///
    /// let mut config = Config::default();
    /// envstruct.fetch(&mut config).unwrap();
    /// assert_eq!(config.name, "demo");
    /// assert_eq!(config.ports, vec![80, 443]);
    /// ```
    pub fn fetch<T: Reflect>(&self, target: &mut T) -> Result<(), Error> {
        self.fetch_with_provenance(target).map(|_| ())
    }

    /// Like [`fetch`](Self::fetch), also reporting which key populated which
    /// field, in traversal order.
    pub fn fetch_with_provenance<T: Reflect>(
        &self,
        target: &mut T,
    ) -> Result<Vec<Provenance>, Error> {
        let mut fetch = Fetch {
            source: self.source(),
            delimiter: self.delimiter(),
            unmarshaler: self.unmarshaler(),
            provenance: Vec::new(),
        };
        walk(&self.naming, target, &mut fetch)?;
        debug!(populated = fetch.provenance.len(), "fetch: done");
        Ok(fetch.provenance)
    }
}

impl<U> Envstruct<U> {
    /// Report the lookup keys of every leaf of `T` without reading the
    /// environment.
    ///
    /// Walks `T::default()`. Malformed ignore tags are still reported.
    pub fn lookup_keys<T: Reflect + Default>(&self) -> Result<Vec<FieldKeys>, Error> {
        let mut describe = Describe::default();
        walk(&self.naming, &mut T::default(), &mut describe)?;
        Ok(describe.fields)
    }
}

fn walk<T: Reflect, H: Leaf>(naming: &Naming, target: &mut T, handler: &mut H) -> Result<(), Error> {
    target.accept(&Field::ROOT, &mut Root { naming, handler })
}

/// What happens once a leaf's keys are known.
trait Leaf {
    fn leaf<T: Value>(&mut self, field: &str, keys: &LookupKeys, value: &mut T) -> Result<(), Error>;
}

struct Fetch<'a, U> {
    source: &'a dyn EnvSource,
    delimiter: &'a str,
    unmarshaler: Option<&'a U>,
    provenance: Vec<Provenance>,
}

impl<U: Unmarshal> Leaf for Fetch<'_, U> {
    fn leaf<T: Value>(&mut self, field: &str, keys: &LookupKeys, value: &mut T) -> Result<(), Error> {
        for key in keys.iter() {
            if key.is_empty() {
                continue;
            }
            trace!(field, key, "fetch: looking up");
            let Some(raw) = self.source.get(key).filter(|raw| !raw.is_empty()) else {
                continue;
            };
            debug!(field, key, kind = %T::KIND, "fetch: matched");
            coerce(value, &raw, self.delimiter, self.unmarshaler).map_err(|e| e.with_key(key))?;
            self.provenance.push(Provenance::new(field, key, T::KIND));
            return Ok(());
        }
        trace!(field, "fetch: no value, keeping current");
        Ok(())
    }
}

#[derive(Default)]
struct Describe {
    fields: Vec<FieldKeys>,
}

impl Leaf for Describe {
    fn leaf<T: Value>(&mut self, field: &str, keys: &LookupKeys, _value: &mut T) -> Result<(), Error> {
        self.fields.push(FieldKeys {
            field: field.to_string(),
            kind: T::KIND,
            keys: keys.clone(),
        });
        Ok(())
    }
}

/// Visits the value handed to `fetch`, which has to be a record.
struct Root<'a, H> {
    naming: &'a Naming,
    handler: &'a mut H,
}

impl<H: Leaf> Visitor for Root<'_, H> {
    fn visit_record<R: Record>(&mut self, _field: &Field, record: &mut R) -> Result<(), Error> {
        let mut walker = Walker {
            naming: self.naming,
            handler: &mut *self.handler,
            path: NamePath::root(&self.naming.prefix),
            fields: Vec::new(),
        };
        record.visit_fields(&mut walker)
    }

    fn visit_value<T: Value>(&mut self, _field: &Field, _value: &mut T) -> Result<(), Error> {
        Err(ErrorKind::NotARecord {
            type_name: core::any::type_name::<T>(),
            kind: T::KIND,
        }
        .into())
    }
}

/// Visits the fields of one record, at one name path.
struct Walker<'a, H> {
    naming: &'a Naming,
    handler: &'a mut H,
    path: NamePath,
    /// Rust field names from the root down to this record.
    fields: Vec<&'static str>,
}

impl<H> Walker<'_, H> {
    fn field_path(&self, field: &Field) -> String {
        let mut names = self.fields.clone();
        names.push(field.name);
        names.join(".")
    }

    /// The segment `field` adds to the name path, if any.
    fn segment(&self, field: &Field) -> Result<Option<String>, Error> {
        let Some(tag) = field.tags.lookup(&self.naming.tag_key) else {
            return Ok(None);
        };

        if let Some(ignore_key) = &self.naming.ignore_key
            && let Some(ignore) = field.tags.lookup(ignore_key)
        {
            let ignored = parse_bool(ignore).ok_or_else(|| {
                Error::from(ErrorKind::InvalidIgnoreTag {
                    tag: ignore_key.clone(),
                    value: ignore.to_string(),
                })
                .with_field(self.field_path(field))
            })?;
            if ignored {
                debug!(field = field.name, tag, "resolve: segment ignored");
                return Ok(None);
            }
        }

        let tag = if self.naming.strip_value {
            tag.split_once(',').map_or(tag, |(name, _)| name)
        } else {
            tag
        };
        if tag.is_empty() {
            return Ok(None);
        }
        Ok(Some(tag.to_uppercase()))
    }

    fn child_path(&self, field: &Field) -> Result<NamePath, Error> {
        Ok(match self.segment(field)? {
            Some(segment) => self.path.with(segment),
            None => self.path.clone(),
        })
    }

    fn lookup_keys(&self, field: &Field, path: &NamePath) -> LookupKeys {
        if let Some(override_key) = &self.naming.override_key
            && let Some(keys) = field.tags.lookup(override_key)
        {
            return LookupKeys::Override(keys.split(',').map(|key| key.trim().to_string()).collect());
        }
        LookupKeys::Composed(path.key())
    }
}

impl<H: Leaf> Visitor for Walker<'_, H> {
    fn visit_record<R: Record>(&mut self, field: &Field, record: &mut R) -> Result<(), Error> {
        let path = self.child_path(field)?;
        let mut fields = self.fields.clone();
        fields.push(field.name);
        trace!(field = field.name, path = %path.key(), "resolve: entering record");

        let mut child = Walker {
            naming: self.naming,
            handler: &mut *self.handler,
            path,
            fields,
        };
        record.visit_fields(&mut child)
    }

    fn visit_value<T: Value>(&mut self, field: &Field, value: &mut T) -> Result<(), Error> {
        let path = self.child_path(field)?;
        let keys = self.lookup_keys(field, &path);
        let field_path = self.field_path(field);
        self.handler
            .leaf(&field_path, &keys, value)
            .map_err(|e| e.with_field(field_path))
    }
}

/// Parse a boolean the way flag parsers conventionally do.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
