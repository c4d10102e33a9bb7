//! Sort descriptors and stable multi-key ordering.
//!
//! Provides [`Dir`] for sort direction and [`SortDescriptor`] for field-based
//! ordering.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Config, ErrorPolicy};
use crate::error::{Error, Result};
use crate::eval::same_kind;
use crate::field::Field;
use crate::operator::Operator;
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// The keyword used in the canonical format.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordering clause: a field and a direction.
pub struct SortDescriptor<T> {
    field: Field<T>,
    dir: Dir,
}

impl<T> SortDescriptor<T> {
    /// Creates a descriptor; `ascending: false` sorts descending.
    pub fn new(field: Field<T>, ascending: bool) -> Self {
        let dir = if ascending { Dir::Asc } else { Dir::Desc };
        SortDescriptor { field, dir }
    }

    /// Creates an ascending descriptor for the given field.
    pub fn asc(field: Field<T>) -> Self {
        SortDescriptor {
            field,
            dir: Dir::Asc,
        }
    }

    /// Creates a descending descriptor for the given field.
    pub fn desc(field: Field<T>) -> Self {
        SortDescriptor {
            field,
            dir: Dir::Desc,
        }
    }

    /// Creates a descriptor for a field resolved by name.
    pub fn named(name: &str, ascending: bool) -> Result<Self>
    where
        T: Record,
    {
        Ok(SortDescriptor::new(T::lookup(name)?, ascending))
    }

    pub fn field(&self) -> Field<T> {
        self.field
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn ascending(&self) -> bool {
        self.dir.is_asc()
    }

    /// The canonical format of this descriptor (`name ASC`).
    pub fn format(&self) -> String {
        self.to_string()
    }
}

/// Shorthand for [`SortDescriptor::new`].
pub fn sorted_by<T>(field: Field<T>, ascending: bool) -> SortDescriptor<T> {
    SortDescriptor::new(field, ascending)
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SortDescriptor<T> {}

impl<T> PartialEq for SortDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.field.name() == other.field.name() && self.dir == other.dir
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("field", &self.field)
            .field("dir", &self.dir)
            .finish()
    }
}

impl<T> fmt::Display for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.name(), self.dir)
    }
}

/// Compares two sort keys of the same kind.
///
/// Missing values sort after present ones regardless of direction. NaN is
/// ordered with `f64::total_cmp` so the sort stays total.
fn compare_keys(a: &Value<'_>, b: &Value<'_>, dir: Dir) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,
        (Value::String(a), Value::String(b)) => dir.apply(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => dir.apply(a.total_cmp(*b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => dir.apply(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => dir.apply(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => dir.apply(a.cmp(b)),
        _ => Ordering::Equal,
    }
}

/// Checks that every present key in one column shares a single orderable
/// kind.
fn check_column<'v, T>(
    descriptor: &SortDescriptor<T>,
    column: impl Iterator<Item = Value<'v>>,
) -> Result<()> {
    let mut first: Option<Value<'v>> = None;
    for value in column {
        if value.is_none() {
            continue;
        }
        match &first {
            None if value.is_list() => return Err(incomparable(descriptor, &value, &value)),
            None => first = Some(value),
            Some(seen) if same_kind(seen, &value) => {}
            Some(seen) => return Err(incomparable(descriptor, seen, &value)),
        }
    }
    Ok(())
}

fn incomparable<T>(descriptor: &SortDescriptor<T>, left: &Value<'_>, right: &Value<'_>) -> Error {
    Error::IncomparableTypes {
        field: descriptor.field.name(),
        operator: Operator::LessThan,
        left: left.kind(),
        right: right.kind(),
    }
}

/// Sorts records by the descriptors, first descriptor as primary key.
///
/// The sort is stable: records whose keys all compare equal keep their input
/// order. Fails on the first unorderable key.
pub fn sort_records<'a, T>(records: &mut Vec<&'a T>, order: &[SortDescriptor<T>]) -> Result<()> {
    sort_records_with(records, order, &Config::default())
}

/// Like [`sort_records`], honoring the config's error policy.
///
/// Under [`ErrorPolicy::Skip`] a record whose key is a list is dropped with a
/// warning. Present keys of different kinds within one column still fail,
/// since no single record is at fault.
pub fn sort_records_with<'a, T>(
    records: &mut Vec<&'a T>,
    order: &[SortDescriptor<T>],
    config: &Config,
) -> Result<()> {
    if order.is_empty() || records.is_empty() {
        return Ok(());
    }

    let mut keyed: Vec<(Vec<Value<'a>>, &'a T)> = records
        .iter()
        .map(|record| {
            let keys = order.iter().map(|d| d.field.value(*record)).collect();
            (keys, *record)
        })
        .collect();

    if config.on_error == ErrorPolicy::Skip {
        let mut index = 0usize;
        keyed.retain(|(keys, _)| {
            let list_key = order.iter().zip(keys).find(|(_, key)| key.is_list());
            if let Some((descriptor, key)) = list_key {
                let err = incomparable(descriptor, key, key);
                tracing::warn!(index, error = %err, "skipping record with unorderable sort key");
            }
            index += 1;
            list_key.is_none()
        });
    }

    for (i, descriptor) in order.iter().enumerate() {
        check_column(descriptor, keyed.iter().map(|(keys, _)| keys[i].clone()))?;
    }
    tracing::trace!(
        records = keyed.len(),
        keys = order.len(),
        "sorting records"
    );

    keyed.sort_by(|(a, _), (b, _)| {
        order
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(descriptor, (a, b))| compare_keys(a, b, descriptor.dir))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    records.clear();
    records.extend(keyed.into_iter().map(|(_, record)| record));
    Ok(())
}
