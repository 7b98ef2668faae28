use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::errors::Result;

/// A context with no bound keys: every entry lives in an insertion-ordered
/// store and every operation succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapContext {
    entries: IndexMap<String, Value>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Context for MapContext {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.shift_remove(key))
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.entries.keys().map(String::as_str))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, Value)> for MapContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl Extend<(String, Value)> for MapContext {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
