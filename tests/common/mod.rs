#![allow(dead_code)]

use property_context::{Bindings, Properties, PropertyContext};

/// Host with one property of each access kind.
pub struct Sample {
    read_only: String,
    read_write: String,
    write_only: String,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            read_only: "readOnly".into(),
            read_write: "readWrite".into(),
            write_only: "writeOnly".into(),
        }
    }
}

impl Sample {
    /// Exposes the write-only property for verification only.
    pub fn return_write_only(&self) -> &str {
        &self.write_only
    }
}

impl Properties for Sample {
    fn bindings() -> Bindings<Self> {
        Bindings::new()
            .read_only("readOnly", |s: &Sample| s.read_only.clone())
            .read_write(
                "readWrite",
                |s: &Sample| s.read_write.clone(),
                |s: &mut Sample, v| s.read_write = v,
            )
            .write_only("writeOnly", |s: &mut Sample, v| s.write_only = v)
    }
}

pub fn sample_context() -> PropertyContext<Sample> {
    init_tracing();
    PropertyContext::new(Sample::default()).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
