//! String-keyed contexts whose entries may be backed by typed accessors.
//!
//! [`PropertyContext`] presents one map interface over two kinds of keys:
//! bound keys, whose reads and writes go straight to accessor functions on a
//! host object, and ordinary keys held in an internal store. A host declares
//! its bound keys once by implementing [`Properties`].
//!
//! ```
//! use property_context::{Bindings, Context, ContextError, Properties, PropertyContext};
//! use serde_json::json;
//!
//! struct Build {
//!     target: String,
//!     jobs: u32,
//! }
//!
//! impl Properties for Build {
//!     fn bindings() -> Bindings<Self> {
//!         Bindings::new()
//!             .read_only("target", |b: &Build| b.target.clone())
//!             .read_write("jobs", |b: &Build| b.jobs, |b: &mut Build, n| b.jobs = n)
//!     }
//! }
//!
//! let mut ctx = PropertyContext::new(Build { target: "x86_64".into(), jobs: 1 }).unwrap();
//! ctx.put("jobs", json!(8)).unwrap();
//! ctx.put("note", json!("nightly")).unwrap();
//!
//! assert_eq!(ctx.host().jobs, 8);
//! assert_eq!(ctx.get("note").unwrap(), Some(json!("nightly")));
//! assert!(matches!(
//!     ctx.put("target", json!("arm")),
//!     Err(ContextError::UnsupportedAccess { .. })
//! ));
//! ```
//!
//! Contexts are not internally synchronized; share one across threads only
//! behind a lock.

pub mod errors;
pub mod context;
pub mod binding;
mod map;
mod property;

pub use binding::{Access, Bindings, Properties};
pub use context::{Context, ContextOptions, ReadPolicy};
pub use errors::{ContextError, Operation, Result};
pub use map::MapContext;
pub use property::PropertyContext;
