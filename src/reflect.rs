//! Field enumeration for records.
//!
//! Rust has no runtime reflection over struct fields, so records register
//! their fields with [`record!`](crate::record), which emits a [`Record`]
//! impl that hands every field, together with its static tag metadata, to a
//! [`Visitor`]. Leaf types implement [`Value`](crate::Value) and report
//! their [`Kind`], which is what the resolver and the coercer dispatch on.
//!
//! ```rust
//! #[derive(Debug, Default)]
//! struct Database {
//!     url: String,
//!     pool: u32,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     name: String,
//!     database: Database,
//! }
//!
//! envstruct::record!(Database {
//!     url => [env = "url", alias = "DATABASE_URL"],
//!     pool => [env = "pool"],
//! });
//!
//! envstruct::record!(Config {
//!     name => [env = "name"],
//!     database => [env = "db"],
//! });
//! ```

use core::fmt;

use crate::error::Error;
use crate::Value;

/// The declared kind of a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Anything handed to the unmarshaler as a whole.
    Scalar,
    /// A delimited list of elements.
    Sequence,
    /// A delimited list of `key:value` pairs.
    Map,
    /// A nested record, traversed rather than looked up.
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Map => "map",
            Kind::Record => "record",
        };
        f.write_str(name)
    }
}

/// Tag metadata attached to one field: an ordered tag-name to tag-value lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tags(&'static [(&'static str, &'static str)]);

impl Tags {
    /// No tags at all.
    pub const EMPTY: Tags = Tags(&[]);

    /// Wrap a static list of `(name, value)` pairs.
    pub const fn new(tags: &'static [(&'static str, &'static str)]) -> Self {
        Self(tags)
    }

    /// Value of the first tag called `name`, if the field carries it.
    ///
    /// A present-but-empty tag returns `Some("")`.
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(tag, _)| *tag == name)
            .map(|(_, value)| *value)
    }

    /// Iterate over all tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }

    /// Whether the field carries no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The Rust field name.
    pub name: &'static str,
    /// The field's tags.
    pub tags: Tags,
}

impl Field {
    /// Describes the value handed to [`Envstruct::fetch`](crate::Envstruct::fetch) itself.
    pub const ROOT: Field = Field::new("", Tags::EMPTY);

    /// Create a field descriptor.
    pub const fn new(name: &'static str, tags: Tags) -> Self {
        Self { name, tags }
    }
}

/// A type whose values can be walked by a [`Visitor`].
///
/// Records dispatch to [`Visitor::visit_record`], everything else to
/// [`Visitor::visit_value`]. Implemented by [`record!`](crate::record) for
/// records, by [`scalar!`](crate::scalar) for scalar types, and by this
/// crate for std collections.
pub trait Reflect {
    /// The declared kind of this type.
    const KIND: Kind;

    /// Hand `self`, described by `field`, to the matching visitor method.
    fn accept<V: Visitor>(&mut self, field: &Field, visitor: &mut V) -> Result<(), Error>;
}

/// A nested record: a type whose fields are visited one by one.
pub trait Record: Reflect {
    /// Visit every field in declaration order, stopping at the first error.
    fn visit_fields<V: Visitor>(&mut self, visitor: &mut V) -> Result<(), Error>;
}

/// Receives the fields of a record during traversal.
pub trait Visitor {
    /// Called for fields whose type is itself a record.
    fn visit_record<R: Record>(&mut self, field: &Field, record: &mut R) -> Result<(), Error>;

    /// Called for leaf fields.
    fn visit_value<T: Value>(&mut self, field: &Field, value: &mut T) -> Result<(), Error>;
}

/// Register a struct as a record.
///
/// Every field is listed in declaration order, optionally followed by
/// `=> [name = "value", ...]` tags. Tag names are free-form; which ones
/// matter is decided by the [`EnvstructBuilder`](crate::EnvstructBuilder)
/// configuration. A field written `=> skip` is left alone.
///
/// ```rust
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     internal: bool,
/// }
///
/// envstruct::record!(Server {
///     host => [env = "host", override = "HOSTNAME, SERVER_HOST"],
///     port => [env = "port"],
///     internal => skip,
/// });
/// ```
///
/// Leaving a field out is a compile error:
///
/// ```compile_fail
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     internal: bool,
/// }
///
/// envstruct::record!(Server { host => [env = "host"] });
/// ```
#[macro_export]
macro_rules! record {
    (@fields $record:ty; [$($visit:tt)*] [$($all:ident)*]; $field:ident => skip $(, $($rest:tt)*)?) => {
        $crate::record!(@fields $record; [$($visit)*] [$($all)* $field]; $($($rest)*)?);
    };
    (@fields $record:ty; [$($visit:tt)*] [$($all:ident)*];
        $field:ident => [ $( $tag:ident = $value:literal ),* $(,)? ] $(, $($rest:tt)*)?) => {
        $crate::record!(
            @fields $record;
            [$($visit)* ($field [$( ($tag $value) )*])]
            [$($all)* $field];
            $($($rest)*)?
        );
    };
    (@fields $record:ty; [$($visit:tt)*] [$($all:ident)*]; $field:ident $(, $($rest:tt)*)?) => {
        $crate::record!(@fields $record; [$($visit)* ($field [])] [$($all)* $field]; $($($rest)*)?);
    };
    (@fields $record:ty; [$( ($field:ident [$( ($tag:ident $value:literal) )*]) )*] [$($all:ident)*];) => {
        impl $crate::Reflect for $record {
            const KIND: $crate::Kind = $crate::Kind::Record;

            fn accept<V: $crate::Visitor>(
                &mut self,
                field: &$crate::Field,
                visitor: &mut V,
            ) -> ::core::result::Result<(), $crate::Error> {
                visitor.visit_record(field, self)
            }
        }

        impl $crate::Record for $record {
            #[allow(unused_variables)]
            fn visit_fields<V: $crate::Visitor>(
                &mut self,
                visitor: &mut V,
            ) -> ::core::result::Result<(), $crate::Error> {
                // Exhaustive: every field must be listed.
                let Self { $( $all: _ ),* } = self;
                $(
                    {
                        const FIELD: $crate::Field = $crate::Field::new(
                            ::core::stringify!($field),
                            $crate::Tags::new(&[ $( (::core::stringify!($tag), $value) ),* ]),
                        );
                        $crate::Reflect::accept(&mut self.$field, &FIELD, visitor)?;
                    }
                )*
                ::core::result::Result::Ok(())
            }
        }
    };
    ($record:ty { $($fields:tt)* }) => {
        $crate::record!(@fields $record; [] []; $($fields)*);
    };
}

/// Register types that are handed to the unmarshaler whole.
///
/// Use this for your own types that implement [`Facet`](facet::Facet) and
/// that the configured [`Unmarshal`](crate::Unmarshal) can parse, such as
/// structs written as YAML flow mappings.
///
/// ```rust
/// use envstruct::{Envstruct, MockEnv};
/// use facet::Facet;
///
/// #[derive(Facet, Debug, Default, PartialEq)]
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// envstruct::scalar!(Endpoint);
///
/// #[derive(Default)]
/// struct Config {
///     db: Endpoint,
/// }
///
/// envstruct::record!(Config { db => [env = "db"] });
///
/// let envstruct = Envstruct::builder()
///     .unmarshaler(envstruct::Yaml)
///     .source(MockEnv::from_pairs([("DB", "{host: localhost, port: 5432}")]))
///     .build();
///
/// let mut config = Config::default();
/// envstruct.fetch(&mut config).unwrap();
/// assert_eq!(config.db.port, 5432);
/// ```
#[macro_export]
macro_rules! scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                const KIND: $crate::Kind = $crate::Kind::Scalar;

                fn accept<V: $crate::Visitor>(
                    &mut self,
                    field: &$crate::Field,
                    visitor: &mut V,
                ) -> ::core::result::Result<(), $crate::Error> {
                    visitor.visit_value(field, self)
                }
            }

            impl $crate::Value for $ty {
                fn coerce_from<U: $crate::Unmarshal>(
                    &mut self,
                    raw: &str,
                    _delimiter: &str,
                    unmarshaler: &U,
                ) -> ::core::result::Result<(), $crate::Error> {
                    *self = $crate::coerce::scalar::<Self, U>(raw, unmarshaler)?;
                    ::core::result::Result::Ok(())
                }
            }
        )+
    };
}
