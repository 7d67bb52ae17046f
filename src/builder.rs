//! Configuration for a fetch run.
//!
//! An [`Envstruct`] is built once with [`EnvstructBuilder`] and is read-only
//! afterwards; the same value can fetch into any number of records.

use crate::env::{EnvSource, StdEnv};
use crate::unmarshal::{Unmarshal, Yaml};

/// Default separator between elements of a collection-valued variable.
pub const DEFAULT_DELIMITER: &str = ",";

/// `delimiter`, or [`DEFAULT_DELIMITER`] when it is empty.
pub(crate) fn delimiter_or_default(delimiter: &str) -> &str {
    if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    }
}

/// Settings that decide which environment keys a field is looked up under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Naming {
    pub(crate) prefix: String,
    pub(crate) tag_key: String,
    pub(crate) override_key: Option<String>,
    pub(crate) ignore_key: Option<String>,
    pub(crate) strip_value: bool,
}

/// Fetches environment variables into records.
///
/// See [`EnvstructBuilder`] for the available options and
/// [`Envstruct::fetch`] for the resolution rules.
pub struct Envstruct<U = Yaml> {
    pub(crate) naming: Naming,
    pub(crate) delimiter: String,
    pub(crate) unmarshaler: Option<U>,
    pub(crate) source: Option<Box<dyn EnvSource>>,
}

impl Envstruct<Yaml> {
    /// Fetch fields tagged with `tag_key`, unmarshaling with [`Yaml`] from the
    /// process environment, without a prefix.
    pub fn new(tag_key: impl Into<String>) -> Self {
        EnvstructBuilder::new()
            .tag_key(tag_key)
            .unmarshaler(Yaml)
            .build()
    }

    /// Start configuring an `Envstruct`.
    pub fn builder() -> EnvstructBuilder<Yaml> {
        EnvstructBuilder::new()
    }
}

impl<U> Envstruct<U> {
    /// The prefix prepended (uppercased) to every composed key.
    pub fn prefix(&self) -> &str {
        &self.naming.prefix
    }

    /// The tag that supplies name segments.
    pub fn tag_key(&self) -> &str {
        &self.naming.tag_key
    }

    /// The tag that supplies verbatim override keys, if configured.
    pub fn override_key(&self) -> Option<&str> {
        self.naming.override_key.as_deref()
    }

    /// The boolean tag that suppresses a field's name segment, if configured.
    pub fn ignore_key(&self) -> Option<&str> {
        self.naming.ignore_key.as_deref()
    }

    /// Whether tag values are cut at their first comma.
    pub fn strip_value(&self) -> bool {
        self.naming.strip_value
    }

    /// Separator between collection elements, falling back to
    /// [`DEFAULT_DELIMITER`] when configured empty.
    pub fn delimiter(&self) -> &str {
        delimiter_or_default(&self.delimiter)
    }

    /// The configured unmarshaler, if any.
    pub fn unmarshaler(&self) -> Option<&U> {
        self.unmarshaler.as_ref()
    }

    /// Get the env source, or StdEnv if none set.
    pub fn source(&self) -> &dyn EnvSource {
        self.source.as_ref().map(|s| s.as_ref()).unwrap_or(&StdEnv)
    }
}

impl<U: core::fmt::Debug> core::fmt::Debug for Envstruct<U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Envstruct")
            .field("prefix", &self.naming.prefix)
            .field("tag_key", &self.naming.tag_key)
            .field("override_key", &self.naming.override_key)
            .field("ignore_key", &self.naming.ignore_key)
            .field("strip_value", &self.naming.strip_value)
            .field("delimiter", &self.delimiter)
            .field("unmarshaler", &self.unmarshaler)
            .field("custom_source", &self.source.is_some())
            .finish()
    }
}

/// Builder for [`Envstruct`].
///
/// No unmarshaler is set initially: call [`unmarshaler`](Self::unmarshaler),
/// otherwise the first value that needs coercion fails with a configuration
/// error.
///
/// ```rust
/// use envstruct::{Envstruct, Json, MockEnv};
///
/// let envstruct = Envstruct::builder()
///     .prefix("app")
///     .tag_key("env")
///     .override_key("override")
///     .ignore_key("ignore")
///     .delimiter(";")
///     .unmarshaler(Json)
///     .source(MockEnv::from_pairs([("APP_PORT", "8080")]))
///     .build();
///
/// assert_eq!(envstruct.prefix(), "app");
/// assert_eq!(envstruct.delimiter(), ";");
/// ```
pub struct EnvstructBuilder<U = Yaml> {
    naming: Naming,
    delimiter: String,
    unmarshaler: Option<U>,
    source: Option<Box<dyn EnvSource>>,
}

impl EnvstructBuilder<Yaml> {
    /// Create a new builder with tag key `env`, no prefix, and the default delimiter.
    pub fn new() -> Self {
        Self {
            naming: Naming {
                tag_key: "env".to_string(),
                ..Naming::default()
            },
            delimiter: DEFAULT_DELIMITER.to_string(),
            unmarshaler: None,
            source: None,
        }
    }
}

impl Default for EnvstructBuilder<Yaml> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> EnvstructBuilder<U> {
    /// Set the prefix. It is uppercased and joined to the composed keys with `_`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming.prefix = prefix.into();
        self
    }

    /// Set the tag whose value supplies a field's name segment.
    pub fn tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.naming.tag_key = tag_key.into();
        self
    }

    /// Set the tag whose comma-separated value lists verbatim lookup keys.
    pub fn override_key(mut self, override_key: impl Into<String>) -> Self {
        self.naming.override_key = Some(override_key.into());
        self
    }

    /// Set the boolean tag that suppresses a field's name segment.
    pub fn ignore_key(mut self, ignore_key: impl Into<String>) -> Self {
        self.naming.ignore_key = Some(ignore_key.into());
        self
    }

    /// Cut tag values at their first comma, so `field,omitempty` names `FIELD`.
    pub fn strip_value(mut self, strip_value: bool) -> Self {
        self.naming.strip_value = strip_value;
        self
    }

    /// Set the separator between collection elements.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the unmarshaler used for scalars and collection elements.
    pub fn unmarshaler<V: Unmarshal>(self, unmarshaler: V) -> EnvstructBuilder<V> {
        EnvstructBuilder {
            naming: self.naming,
            delimiter: self.delimiter,
            unmarshaler: Some(unmarshaler),
            source: self.source,
        }
    }

    /// Use a custom environment source (for testing).
    pub fn source(mut self, source: impl EnvSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Envstruct<U> {
        Envstruct {
            naming: self.naming,
            delimiter: self.delimiter,
            unmarshaler: self.unmarshaler,
            source: self.source,
        }
    }
}
