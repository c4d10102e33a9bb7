//! Backend adapters: something that can run a [`Query`] and return records.
//!
//! The in-memory adapters here evaluate queries directly. An adapter for an
//! external store walks the public [`Predicate`](crate::Predicate) tree instead,
//! translates each node into its native filter language and reports what it
//! cannot express as [`Error::UnsupportedOperator`](crate::Error::UnsupportedOperator).

use crate::config::Config;
use crate::error::Result;
use crate::query::Query;

/// Executes queries against a record source.
pub trait Backend<T> {
    /// Returns the records selected by `query`, filtered, sorted and windowed.
    fn execute(&self, query: &Query<T>) -> Result<Vec<T>>;
}

/// An owned in-memory record store.
///
/// ```
/// use sift::{Backend, Config, Field, MemoryBackend, Query, Value};
///
/// #[derive(Clone)]
/// struct Song { title: String }
///
/// const TITLE: Field<Song> = Field::new("title", |s| Value::String(&s.title));
///
/// let store = MemoryBackend::new(vec![
///     Song { title: "Blue".into() },
///     Song { title: "Black".into() },
/// ])
/// .with_config(Config::lenient());
///
/// let found = store.execute(&Query::filtered(TITLE.like("Bl*e"))).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend<T> {
    records: Vec<T>,
    config: Config,
}

impl<T> MemoryBackend<T> {
    pub fn new(records: Vec<T>) -> Self {
        MemoryBackend {
            records,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn insert(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T> Default for MemoryBackend<T> {
    fn default() -> Self {
        MemoryBackend::new(Vec::new())
    }
}

impl<T> FromIterator<T> for MemoryBackend<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        MemoryBackend::new(iter.into_iter().collect())
    }
}

impl<T: Clone> Backend<T> for MemoryBackend<T> {
    fn execute(&self, query: &Query<T>) -> Result<Vec<T>> {
        let selected = query.apply_with(&self.records, &self.config)?;
        tracing::debug!(
            backend = "memory",
            stored = self.records.len(),
            returned = selected.len(),
            "executed query"
        );
        Ok(selected.into_iter().cloned().collect())
    }
}

impl<T: Clone> Backend<T> for [T] {
    fn execute(&self, query: &Query<T>) -> Result<Vec<T>> {
        query.apply_cloned(self)
    }
}

impl<T: Clone> Backend<T> for Vec<T> {
    fn execute(&self, query: &Query<T>) -> Result<Vec<T>> {
        query.apply_cloned(self)
    }
}
