//! Query value objects and in-memory execution.
//!
//! A [`Query`] bundles an optional filter [`Predicate`], an ordered list of
//! [`SortDescriptor`]s and optional offset/limit. It never changes after it is
//! built: the builder methods consume the query and return a new one.
//!
//! # Example
//!
//! ```
//! use sift::{Field, Number, Query, Value};
//!
//! struct Person { name: String, age: u32 }
//!
//! const NAME: Field<Person> = Field::new("name", |p| Value::String(&p.name));
//! const AGE: Field<Person> = Field::new("age", |p| Value::Number(Number::from(p.age)));
//!
//! let people = vec![
//!     Person { name: "Ann".into(), age: 34 },
//!     Person { name: "Bob".into(), age: 12 },
//!     Person { name: "Cid".into(), age: 51 },
//! ];
//!
//! let query = Query::filtered(AGE.greater_than(18))
//!     .ordered_by([NAME.desc()])
//!     .limit(1);
//!
//! assert_eq!(query.to_string(), "FROM Person WHERE age > 18 ORDER BY name DESC LIMIT 1");
//! let adults = query.apply(&people).unwrap();
//! assert_eq!(adults.len(), 1);
//! assert_eq!(adults[0].name, "Cid");
//! ```

use std::fmt;

use crate::config::{Config, ErrorPolicy};
use crate::error::Result;
use crate::predicate::{self, Predicate};
use crate::record::type_name;
use crate::sort::{sort_records_with, SortDescriptor};

/// A filter, an ordering and a window over records of type `T`.
pub struct Query<T> {
    predicate: Option<Predicate<T>>,
    order: Vec<SortDescriptor<T>>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<T> Query<T> {
    /// Creates a query from its parts.
    ///
    /// Without a predicate every record matches; without descriptors records
    /// keep their input order.
    pub fn new(predicate: Option<Predicate<T>>, order: Vec<SortDescriptor<T>>) -> Self {
        Query {
            predicate,
            order,
            limit: None,
            offset: None,
        }
    }

    /// A query matching every record, unsorted.
    pub fn all() -> Self {
        Query::new(None, Vec::new())
    }

    /// A query with the given filter and no ordering.
    pub fn filtered(predicate: impl Into<Predicate<T>>) -> Self {
        Query::new(Some(predicate.into()), Vec::new())
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a filter. An existing filter is combined with the new one by AND.
    pub fn filter(self, predicate: impl Into<Predicate<T>>) -> Self {
        let predicate = match self.predicate {
            Some(existing) => predicate::and([existing, predicate.into()]),
            None => predicate.into(),
        };
        Query {
            predicate: Some(predicate),
            ..self
        }
    }

    /// Appends sort descriptors after any existing ones.
    pub fn ordered_by(mut self, order: impl IntoIterator<Item = SortDescriptor<T>>) -> Self {
        self.order.extend(order);
        self
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    pub fn order(&self) -> &[SortDescriptor<T>] {
        &self.order
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// The canonical format of this query.
    pub fn format(&self) -> String {
        self.to_string()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests a single record against the filter. No filter matches everything.
    pub fn matches(&self, record: &T) -> Result<bool> {
        match &self.predicate {
            Some(predicate) => predicate.evaluate(record),
            None => Ok(true),
        }
    }

    /// Filters, sorts, then applies offset and limit. The input is untouched.
    ///
    /// Fails with the first evaluation error; see [`apply_with`](Self::apply_with)
    /// to skip failing records instead.
    pub fn apply<'a>(&self, records: &'a [T]) -> Result<Vec<&'a T>> {
        self.apply_with(records, &Config::default())
    }

    /// Like [`apply`](Self::apply), honoring the config's error policy.
    pub fn apply_with<'a>(&self, records: &'a [T], config: &Config) -> Result<Vec<&'a T>> {
        let mut results = self.filter_records(records, config)?;
        let matched = results.len();

        sort_records_with(&mut results, &self.order, config)?;
        self.window(&mut results);

        tracing::debug!(
            query = %self,
            scanned = records.len(),
            matched,
            returned = results.len(),
            "applied query"
        );
        Ok(results)
    }

    /// Like [`apply`](Self::apply), cloning the selected records.
    pub fn apply_cloned(&self, records: &[T]) -> Result<Vec<T>>
    where
        T: Clone,
    {
        Ok(self.apply(records)?.into_iter().cloned().collect())
    }

    /// Number of records [`apply`](Self::apply) would return, failing
    /// wherever it would.
    pub fn count(&self, records: &[T]) -> Result<usize> {
        Ok(self.apply(records)?.len())
    }

    /// First record [`apply`](Self::apply) would return.
    pub fn first<'a>(&self, records: &'a [T]) -> Result<Option<&'a T>> {
        Ok(self.apply(records)?.into_iter().next())
    }

    fn filter_records<'a>(&self, records: &'a [T], config: &Config) -> Result<Vec<&'a T>> {
        let Some(predicate) = &self.predicate else {
            return Ok(records.iter().collect());
        };

        let mut matched = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match predicate.evaluate(record) {
                Ok(true) => matched.push(record),
                Ok(false) => {}
                Err(err) if config.on_error == ErrorPolicy::Skip => {
                    tracing::warn!(index, error = %err, "skipping record that failed evaluation");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(matched)
    }

    fn window<'a>(&self, results: &mut Vec<&'a T>) {
        let offset = self.offset.unwrap_or(0);
        if offset > 0 {
            results.drain(..offset.min(results.len()));
        }
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Query::all()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            predicate: self.predicate.clone(),
            order: self.order.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&self.to_string()).finish()
    }
}

impl<T> fmt::Display for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FROM {}", type_name::<T>())?;
        if let Some(predicate) = &self.predicate {
            write!(f, " WHERE {predicate}")?;
        }
        for (i, descriptor) in self.order.iter().enumerate() {
            f.write_str(if i == 0 { " ORDER BY " } else { ", " })?;
            write!(f, "{descriptor}")?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}
