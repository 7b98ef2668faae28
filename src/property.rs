//! A context whose entries are partly backed by accessors on a host object.
//!
//! Keys registered through [`Properties::bindings`] are delegated to the
//! host on every call; nothing is cached, so the map always reflects what
//! the accessors return right now. Every other key lives in an ordinary
//! insertion-ordered store.
//!
//! Accessors run synchronously inside the triggering call. An accessor that
//! blocks forever blocks its caller forever.

use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::binding::{Access, BindingTable, Properties};
use crate::context::{Context, ContextOptions, ReadPolicy};
use crate::errors::{ContextError, Operation, Result};

pub struct PropertyContext<H> {
    host: H,
    bindings: BindingTable<H>,
    store: IndexMap<String, Value>,
    options: ContextOptions,
}

impl<H: Properties> PropertyContext<H> {
    pub fn new(host: H) -> Result<Self> {
        Self::with_options(host, ContextOptions::default())
    }

    /// Build the binding table for `H` and wrap `host`.
    ///
    /// Fails with [`ContextError::DuplicateBinding`] if `H` registers a key
    /// more than once.
    pub fn with_options(host: H, options: ContextOptions) -> Result<Self> {
        let bindings = H::bindings().into_table()?;
        debug!(bound = bindings.len(), "property context created");
        Ok(Self { host, bindings, store: IndexMap::new(), options })
    }
}

impl<H> PropertyContext<H> {
    pub fn access(&self, key: &str) -> Access {
        self.bindings.access(key)
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// The hosting object, for state the map interface does not expose.
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Drop every stored entry. Bound keys are unaffected.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Snapshot of every readable entry as a JSON object.
    ///
    /// Write-only keys are left out. Fails if a getter fails.
    pub fn to_json(&self) -> Result<Value> {
        let mut out = Map::new();
        for key in self.keys().filter(|key| self.access(key).is_readable()) {
            if let Some(value) = self.get(key)? {
                out.insert(key.to_owned(), value);
            }
        }
        Ok(Value::Object(out))
    }
}

impl<H> Context for PropertyContext<H> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(binding) = self.bindings.get(key) else {
            return Ok(self.store.get(key).cloned());
        };
        match binding.getter() {
            Some(get) => {
                trace!(key, "delegating read to getter");
                get(&self.host, key).map(Some)
            }
            None => match self.options.write_only_reads {
                ReadPolicy::Absent => Ok(None),
                ReadPolicy::Reject => {
                    debug!(key, "rejected read of write-only property");
                    Err(ContextError::unsupported(key, Operation::Read))
                }
            },
        }
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        let Some(binding) = self.bindings.get(key) else {
            self.store.insert(key.to_owned(), value);
            return Ok(());
        };
        match binding.setter() {
            Some(set) => {
                trace!(key, "delegating write to setter");
                set(&mut self.host, key, value)
            }
            None => {
                debug!(key, "rejected write to read-only property");
                Err(ContextError::unsupported(key, Operation::Write))
            }
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.access(key).is_bound() || self.store.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        if self.access(key).is_bound() {
            debug!(key, "rejected removal of bound property");
            return Err(ContextError::unsupported(key, Operation::Remove));
        }
        Ok(self.store.shift_remove(key))
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.bindings.keys().chain(self.store.keys().map(String::as_str)))
    }

    fn len(&self) -> usize {
        self.bindings.len() + self.store.len()
    }
}

impl<H> fmt::Debug for PropertyContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.keys().map(|k| format!("{k}: {}", self.access(k))).join(", ");
        write!(f, "PropertyContext {{ {keys} }}")
    }
}
