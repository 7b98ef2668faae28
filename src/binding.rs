use std::convert::Infallible;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{ContextError, Result};

/// Reads a property off the host, already converted to a `Value`.
pub(crate) type Getter<H> = Box<dyn Fn(&H, &str) -> Result<Value> + Send + Sync>;
/// Converts a `Value` to the property's type and writes it to the host.
pub(crate) type Setter<H> = Box<dyn Fn(&mut H, &str, Value) -> Result<()> + Send + Sync>;

/// How a key is backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Unbound,
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn is_bound(self) -> bool {
        self != Access::Unbound
    }

    pub fn is_readable(self) -> bool {
        matches!(self, Access::Unbound | Access::ReadOnly | Access::ReadWrite)
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Unbound => "unbound",
            Access::ReadOnly => "read-only",
            Access::WriteOnly => "write-only",
            Access::ReadWrite => "read-write",
        })
    }
}

/// Accessors for one bound key.
pub(crate) enum Binding<H> {
    ReadOnly(Getter<H>),
    WriteOnly(Setter<H>),
    ReadWrite(Getter<H>, Setter<H>),
}

impl<H> Binding<H> {
    pub fn access(&self) -> Access {
        match self {
            Binding::ReadOnly(_) => Access::ReadOnly,
            Binding::WriteOnly(_) => Access::WriteOnly,
            Binding::ReadWrite(..) => Access::ReadWrite,
        }
    }

    pub(crate) fn getter(&self) -> Option<&Getter<H>> {
        match self {
            Binding::ReadOnly(get) | Binding::ReadWrite(get, _) => Some(get),
            Binding::WriteOnly(_) => None,
        }
    }

    pub(crate) fn setter(&self) -> Option<&Setter<H>> {
        match self {
            Binding::WriteOnly(set) | Binding::ReadWrite(_, set) => Some(set),
            Binding::ReadOnly(_) => None,
        }
    }
}

impl<H> fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({})", self.access())
    }
}

/// Implemented by host types to declare which keys their accessors back.
///
/// ```
/// use property_context::{Bindings, Properties};
///
/// #[derive(Default)]
/// struct Job {
///     name: String,
///     retries: u32,
/// }
///
/// impl Properties for Job {
///     fn bindings() -> Bindings<Self> {
///         Bindings::new()
///             .read_only("name", |job: &Job| job.name.clone())
///             .read_write("retries", |job: &Job| job.retries, |job: &mut Job, n| job.retries = n)
///     }
/// }
/// ```
pub trait Properties: Sized + 'static {
    fn bindings() -> Bindings<Self>;
}

/// Builder for a host type's binding table.
///
/// Getters may return any `Serialize` type and setters accept any
/// `DeserializeOwned` type; conversion to and from `Value` happens at the
/// boundary, before the setter runs.
pub struct Bindings<H> {
    entries: Vec<(String, Binding<H>)>,
}

impl<H: 'static> Default for Bindings<H> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<H: 'static> Bindings<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only<V, G>(self, key: impl Into<String>, get: G) -> Self
    where
        V: Serialize,
        G: Fn(&H) -> V + Send + Sync + 'static,
    {
        self.bind(key, Binding::ReadOnly(getter(get)))
    }

    pub fn write_only<V, S>(self, key: impl Into<String>, set: S) -> Self
    where
        V: DeserializeOwned,
        S: Fn(&mut H, V) + Send + Sync + 'static,
    {
        self.try_write_only(key, infallible(set))
    }

    pub fn read_write<V, W, G, S>(self, key: impl Into<String>, get: G, set: S) -> Self
    where
        V: Serialize,
        W: DeserializeOwned,
        G: Fn(&H) -> V + Send + Sync + 'static,
        S: Fn(&mut H, W) + Send + Sync + 'static,
    {
        self.try_read_write(key, get, infallible(set))
    }

    /// Like [`write_only`](Self::write_only) with a setter that may refuse
    /// the value; a refusal surfaces as `InvalidValue`.
    pub fn try_write_only<V, E, S>(self, key: impl Into<String>, set: S) -> Self
    where
        V: DeserializeOwned,
        E: Display,
        S: Fn(&mut H, V) -> std::result::Result<(), E> + Send + Sync + 'static,
    {
        self.bind(key, Binding::WriteOnly(setter(set)))
    }

    pub fn try_read_write<V, W, E, G, S>(self, key: impl Into<String>, get: G, set: S) -> Self
    where
        V: Serialize,
        W: DeserializeOwned,
        E: Display,
        G: Fn(&H) -> V + Send + Sync + 'static,
        S: Fn(&mut H, W) -> std::result::Result<(), E> + Send + Sync + 'static,
    {
        self.bind(key, Binding::ReadWrite(getter(get), setter(set)))
    }

    fn bind(mut self, key: impl Into<String>, binding: Binding<H>) -> Self {
        self.entries.push((key.into(), binding));
        self
    }

    /// Freeze into a lookup table, refusing repeated keys.
    pub(crate) fn into_table(self) -> Result<BindingTable<H>> {
        if let Some(dup) = self.entries.iter().map(|(key, _)| key).duplicates().next() {
            return Err(ContextError::DuplicateBinding(dup.clone()));
        }
        Ok(BindingTable { inner: self.entries.into_iter().collect() })
    }
}

impl<H> fmt::Debug for Bindings<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, b)| (k, b.access())))
            .finish()
    }
}

/// Immutable key → binding lookup, in registration order.
pub(crate) struct BindingTable<H> {
    inner: IndexMap<String, Binding<H>>,
}

impl<H> BindingTable<H> {
    pub fn get(&self, key: &str) -> Option<&Binding<H>> {
        self.inner.get(key)
    }

    pub fn access(&self, key: &str) -> Access {
        self.get(key).map_or(Access::Unbound, Binding::access)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

fn getter<H, V, G>(get: G) -> Getter<H>
where
    V: Serialize,
    G: Fn(&H) -> V + Send + Sync + 'static,
{
    Box::new(move |host: &H, key: &str| {
        serde_json::to_value(get(host)).map_err(|e| ContextError::invalid(key, e))
    })
}

fn setter<H, V, E, S>(set: S) -> Setter<H>
where
    V: DeserializeOwned,
    E: Display,
    S: Fn(&mut H, V) -> std::result::Result<(), E> + Send + Sync + 'static,
{
    Box::new(move |host: &mut H, key: &str, value: Value| {
        // Convert first: a mismatch must not reach the host.
        let typed: V = serde_json::from_value(value).map_err(|e| ContextError::invalid(key, e))?;
        set(host, typed).map_err(|e| ContextError::invalid(key, e))
    })
}

fn infallible<H, V, S>(set: S) -> impl Fn(&mut H, V) -> std::result::Result<(), Infallible> + Send + Sync + 'static
where
    S: Fn(&mut H, V) + Send + Sync + 'static,
{
    move |host: &mut H, value: V| {
        set(host, value);
        Ok(())
    }
}
