//! The unmarshal primitive: turning one piece of text into a typed value.
//!
//! envstruct only splits collections; every scalar, element, map key and map
//! value is handed to an [`Unmarshal`] implementation. Two are provided:
//! [`Yaml`] (the default, lenient about unquoted strings) and [`Json`].

use core::fmt;

use facet::Facet;

use crate::macros::trace;

/// Parses text into any [`Facet`] type.
///
/// Implement this to plug in another format:
///
/// ```rust
/// use envstruct::{Unmarshal, UnmarshalError};
/// use facet::Facet;
///
/// /// Accepts JSON, but also bare words as strings.
/// struct Lenient;
///
/// impl Unmarshal for Lenient {
///     fn unmarshal<T: for<'a> Facet<'a>>(&self, raw: &str) -> Result<T, UnmarshalError> {
///         envstruct::Json.unmarshal(raw).or_else(|_| envstruct::Yaml.unmarshal(raw))
///     }
/// }
/// ```
pub trait Unmarshal {
    /// Parse `raw` into a `T`.
    fn unmarshal<T: for<'a> Facet<'a>>(&self, raw: &str) -> Result<T, UnmarshalError>;
}

impl<U: Unmarshal> Unmarshal for &U {
    fn unmarshal<T: for<'a> Facet<'a>>(&self, raw: &str) -> Result<T, UnmarshalError> {
        (**self).unmarshal(raw)
    }
}

/// YAML unmarshaling via `facet-yaml`.
///
/// Bare words parse as strings, so `APP_NAME=demo` fills a `String` field
/// without quoting. Text that YAML would read as something else (`123`,
/// `true`, `~`, the empty string) is retried as a single-quoted scalar, so
/// it still fills string fields verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Unmarshal for Yaml {
    fn unmarshal<T: for<'a> Facet<'a>>(&self, raw: &str) -> Result<T, UnmarshalError> {
        facet_yaml::from_str::<T>(raw).or_else(|e| {
            trace!(raw, "yaml: retrying as a quoted scalar");
            facet_yaml::from_str::<T>(&single_quoted(raw))
                .map_err(|_| UnmarshalError::new(raw, T::SHAPE.type_identifier, e.to_string()))
        })
    }
}

/// `raw` as a YAML single-quoted scalar, where `'` is the only escape.
fn single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

/// JSON unmarshaling via `facet-json`.
///
/// Strings must be quoted: `APP_NAME="demo"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Unmarshal for Json {
    fn unmarshal<T: for<'a> Facet<'a>>(&self, raw: &str) -> Result<T, UnmarshalError> {
        facet_json::from_str::<T>(raw)
            .map_err(|e| UnmarshalError::new(raw, T::SHAPE.type_identifier, e.to_string()))
    }
}

/// Error returned by an [`Unmarshal`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmarshalError {
    /// The text that failed to parse.
    pub input: String,
    /// Name of the target type.
    pub target: &'static str,
    /// What the parser reported.
    pub message: String,
}

impl UnmarshalError {
    /// Create a new unmarshal error.
    pub fn new(input: impl Into<String>, target: &'static str, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            target,
            message: message.into(),
        }
    }
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot unmarshal {:?} into `{}`: {}",
            self.input, self.target, self.message
        )
    }
}

impl core::error::Error for UnmarshalError {}
