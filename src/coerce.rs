//! Coercion of raw environment values into typed fields.
//!
//! Only collections are taken apart here: a sequence is split on the
//! delimiter, a map is split on the delimiter and then on `:`. Every piece
//! (or the whole value, for scalars) goes through the injected
//! [`Unmarshal`] implementation.
//!
//! Collections are built completely before the target is assigned, so a
//! failing element leaves the field as it was.
//!
//! Nested collections (`Vec<Vec<T>>`, maps of maps) are not split further:
//! each inner piece is handed to the unmarshaler whole, which may or may not
//! make sense of it.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;

use facet::Facet;
use indexmap::IndexMap;

use crate::builder::delimiter_or_default;
use crate::error::{Error, ErrorKind};
use crate::macros::{debug, trace};
use crate::reflect::{Field, Kind, Reflect, Visitor};
use crate::unmarshal::Unmarshal;

/// A leaf type that can be populated from one environment value.
pub trait Value: Reflect {
    /// Replace `self` with the value parsed from `raw`.
    ///
    /// `delimiter` separates collection elements; scalars ignore it.
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error>;
}

/// Coerce `raw` into `target`.
///
/// Fails with a configuration error when no unmarshaler is given, before
/// looking at `raw` at all.
///
/// ```rust
/// use envstruct::{coerce::coerce, Yaml};
///
/// let mut ports: Vec<u16> = vec![1];
/// coerce(&mut ports, " 80 , 443", ",", Some(&Yaml)).unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub fn coerce<T: Value, U: Unmarshal>(
    target: &mut T,
    raw: &str,
    delimiter: &str,
    unmarshaler: Option<&U>,
) -> Result<(), Error> {
    let Some(unmarshaler) = unmarshaler else {
        return Err(ErrorKind::MissingUnmarshaler.into());
    };
    let delimiter = delimiter_or_default(delimiter);
    trace!(kind = %T::KIND, raw, delimiter, "coerce: entering");
    target.coerce_from(raw, delimiter, unmarshaler)
}

/// Unmarshal `raw` as-is, without trimming.
pub fn scalar<T: for<'a> Facet<'a>, U: Unmarshal>(raw: &str, unmarshaler: &U) -> Result<T, Error> {
    Ok(unmarshaler.unmarshal::<T>(raw)?)
}

/// Split `raw` on `delimiter` and unmarshal each trimmed element, in order.
pub fn sequence<T, C, U>(raw: &str, delimiter: &str, unmarshaler: &U) -> Result<C, Error>
where
    T: for<'a> Facet<'a>,
    C: FromIterator<T>,
    U: Unmarshal,
{
    debug!(
        elements = raw.split(delimiter).count(),
        "coerce: splitting sequence"
    );
    raw.split(delimiter)
        .map(|element| {
            let element = element.trim();
            trace!(element, "coerce: sequence element");
            unmarshaler.unmarshal::<T>(element).map_err(Error::from)
        })
        .collect()
}

/// Split `raw` into `key:value` pairs and unmarshal both halves of each.
///
/// Pairs are yielded in split order, so collecting into a map lets later
/// duplicates overwrite earlier ones.
pub fn map<K, V, C, U>(raw: &str, delimiter: &str, unmarshaler: &U) -> Result<C, Error>
where
    K: for<'a> Facet<'a>,
    V: for<'a> Facet<'a>,
    C: FromIterator<(K, V)>,
    U: Unmarshal,
{
    debug!(
        pairs = raw.split(delimiter).count(),
        "coerce: splitting map"
    );
    raw.split(delimiter)
        .map(|pair| -> Result<(K, V), Error> {
            let (key, value) = split_pair(pair)?;
            trace!(key, value, "coerce: map pair");
            let key = unmarshaler.unmarshal::<K>(key)?;
            let value = unmarshaler.unmarshal::<V>(value)?;
            Ok((key, value))
        })
        .collect()
}

/// Split one map entry on its only `:`, trimming both halves.
fn split_pair(pair: &str) -> Result<(&str, &str), Error> {
    let mut parts = pair.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key.trim(), value.trim())),
        _ => Err(ErrorKind::MalformedMapPair {
            pair: pair.to_string(),
        }
        .into()),
    }
}

macro_rules! impl_leaf_reflect {
    ($kind:expr) => {
        const KIND: Kind = $kind;

        fn accept<W: Visitor>(&mut self, field: &Field, visitor: &mut W) -> Result<(), Error> {
            visitor.visit_value(field, self)
        }
    };
}

crate::scalar!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, PathBuf,
);

impl<T: for<'a> Facet<'a>> Reflect for Option<T> {
    impl_leaf_reflect!(Kind::Scalar);
}

impl<T: for<'a> Facet<'a>> Value for Option<T> {
    fn coerce_from<U: Unmarshal>(&mut self, raw: &str, _: &str, unmarshaler: &U) -> Result<(), Error> {
        *self = scalar::<Self, U>(raw, unmarshaler)?;
        Ok(())
    }
}

impl<T: for<'a> Facet<'a>> Reflect for Vec<T> {
    impl_leaf_reflect!(Kind::Sequence);
}

impl<T: for<'a> Facet<'a>> Value for Vec<T> {
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error> {
        *self = sequence::<T, _, U>(raw, delimiter, unmarshaler)?;
        Ok(())
    }
}

impl<T: for<'a> Facet<'a>> Reflect for VecDeque<T> {
    impl_leaf_reflect!(Kind::Sequence);
}

impl<T: for<'a> Facet<'a>> Value for VecDeque<T> {
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error> {
        *self = sequence::<T, _, U>(raw, delimiter, unmarshaler)?;
        Ok(())
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: for<'a> Facet<'a> + Eq + Hash,
    V: for<'a> Facet<'a>,
    S: BuildHasher + Default,
{
    impl_leaf_reflect!(Kind::Map);
}

impl<K, V, S> Value for HashMap<K, V, S>
where
    K: for<'a> Facet<'a> + Eq + Hash,
    V: for<'a> Facet<'a>,
    S: BuildHasher + Default,
{
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error> {
        *self = map::<K, V, _, U>(raw, delimiter, unmarshaler)?;
        Ok(())
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: for<'a> Facet<'a> + Ord,
    V: for<'a> Facet<'a>,
{
    impl_leaf_reflect!(Kind::Map);
}

impl<K, V> Value for BTreeMap<K, V>
where
    K: for<'a> Facet<'a> + Ord,
    V: for<'a> Facet<'a>,
{
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error> {
        *self = map::<K, V, _, U>(raw, delimiter, unmarshaler)?;
        Ok(())
    }
}

impl<K, V, S> Reflect for IndexMap<K, V, S>
where
    K: for<'a> Facet<'a> + Eq + Hash,
    V: for<'a> Facet<'a>,
    S: BuildHasher + Default,
{
    impl_leaf_reflect!(Kind::Map);
}

impl<K, V, S> Value for IndexMap<K, V, S>
where
    K: for<'a> Facet<'a> + Eq + Hash,
    V: for<'a> Facet<'a>,
    S: BuildHasher + Default,
{
    fn coerce_from<U: Unmarshal>(
        &mut self,
        raw: &str,
        delimiter: &str,
        unmarshaler: &U,
    ) -> Result<(), Error> {
        *self = map::<K, V, _, U>(raw, delimiter, unmarshaler)?;
        Ok(())
    }
}
