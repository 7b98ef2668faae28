use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ContextError, Result};

/// What `get` does for a key bound to a setter only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Fail with [`ContextError::UnsupportedAccess`].
    #[default]
    Reject,
    /// Report the key as absent (`Ok(None)`).
    Absent,
}

/// Per-instance knobs for property-backed contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextOptions {
    pub write_only_reads: ReadPolicy,
}

impl ContextOptions {
    /// Parse options from a JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ContextError::Config(e.to_string()))
    }

    pub fn with_write_only_reads(mut self, policy: ReadPolicy) -> Self {
        self.write_only_reads = policy;
        self
    }
}

/// A string-keyed mapping of dynamic values.
///
/// Implementations are not internally synchronized. Callers sharing one
/// instance between threads must guard every call with a single lock.
pub trait Context {
    /// Current value for `key`, or `None` if the key holds nothing.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    fn contains_key(&self, key: &str) -> bool;

    /// Remove `key`, returning whatever it held.
    fn remove(&mut self, key: &str) -> Result<Option<Value>>;

    /// Every key, in iteration order. Calling again restarts the sequence.
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every key paired with the result of `get` for it, evaluated lazily.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, Result<Option<Value>>)> + '_> {
        Box::new(self.keys().map(move |key| (key, self.get(key))))
    }

    /// True if some readable entry currently equals `value`.
    fn contains_value(&self, value: &Value) -> bool {
        self.entries()
            .any(|(_, current)| matches!(current, Ok(Some(ref v)) if v == value))
    }

    /// Apply `put` for each pair in order, stopping at the first failure.
    /// Writes before the failing one remain applied.
    fn put_all<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
        Self: Sized,
    {
        for (key, value) in entries {
            self.put(&key, value)?;
        }
        Ok(())
    }

    /// Typed lookup: deserialize the current value of `key` into `T`.
    fn retrieve<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        match self.get(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ContextError::invalid(key, e)),
            None => Ok(None),
        }
    }
}
