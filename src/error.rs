use core::fmt;

use crate::reflect::Kind;
use crate::unmarshal::UnmarshalError;

/// An error raised while fetching environment values into a record.
///
/// Carries the dotted path of the field being populated and the
/// environment key whose value was being coerced, when known.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The specific error that occurred.
    pub kind: ErrorKind,

    /// Dotted Rust field path, e.g. `database.pool`.
    pub field: Option<String>,

    /// Environment key whose value was being coerced.
    pub key: Option<String>,
}

/// The specific thing that went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The value handed to `fetch` is not a record.
    NotARecord {
        /// Rust type name of the value.
        type_name: &'static str,
        /// Its declared kind.
        kind: Kind,
    },

    /// A value needed coercion but no unmarshaler was configured.
    MissingUnmarshaler,

    /// An ignore tag whose value is not a boolean.
    InvalidIgnoreTag {
        /// The ignore tag name.
        tag: String,
        /// The offending value.
        value: String,
    },

    /// A map entry without exactly one `:`.
    MalformedMapPair {
        /// The offending pair, as split from the environment value.
        pair: String,
    },

    /// The unmarshaler rejected a value or element.
    Unmarshal(UnmarshalError),
}

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The top-level argument is not a record.
    Structural,
    /// The [`Envstruct`](crate::Envstruct) is missing something it needs.
    Configuration,
    /// A tag value could not be interpreted.
    TagFormat,
    /// An environment value could not be coerced.
    ValueFormat,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            field: None,
            key: None,
        }
    }

    pub(crate) fn with_field(mut self, field: impl Into<String>) -> Self {
        if self.field.is_none() {
            self.field = Some(field.into());
        }
        self
    }

    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        if self.key.is_none() {
            self.key = Some(key.into());
        }
        self
    }

    /// The broad category of this error.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl ErrorKind {
    /// The broad category of this error kind.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::NotARecord { .. } => ErrorCategory::Structural,
            ErrorKind::MissingUnmarshaler => ErrorCategory::Configuration,
            ErrorKind::InvalidIgnoreTag { .. } => ErrorCategory::TagFormat,
            ErrorKind::MalformedMapPair { .. } | ErrorKind::Unmarshal(_) => {
                ErrorCategory::ValueFormat
            }
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<UnmarshalError> for Error {
    fn from(err: UnmarshalError) -> Self {
        Self::new(ErrorKind::Unmarshal(err))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotARecord { type_name, kind } => {
                write!(f, "expected a record, got {kind} `{type_name}`")
            }
            ErrorKind::MissingUnmarshaler => f.write_str("no unmarshaler set for parser"),
            ErrorKind::InvalidIgnoreTag { tag, value } => {
                write!(f, "tag `{tag}` must be a boolean, got {value:?}")
            }
            ErrorKind::MalformedMapPair { pair } => {
                write!(f, "failed to parse map value {pair:?}: expected exactly one `:`")
            }
            ErrorKind::Unmarshal(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, &self.key) {
            (Some(field), Some(key)) => write!(f, "field `{field}` (from {key}): ")?,
            (Some(field), None) => write!(f, "field `{field}`: ")?,
            (None, Some(key)) => write!(f, "{key}: ")?,
            (None, None) => {}
        }
        fmt::Display::fmt(&self.kind, f)
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Unmarshal(err) => Some(err),
            _ => None,
        }
    }
}
