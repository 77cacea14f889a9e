//! Graph configurations for per-field plugins.
//!
//! A graph configuration is a Munin `config` response annotated with the location of each
//! field's value in the registry:
//!
//! ```text
//! graph_title Heap usage
//! graph_vlabel bytes
//! used.label used
//! used.jmxObjectName java.lang:type=Memory
//! used.jmxAttributeName HeapMemoryUsage
//! used.jmxAttributeKey used
//! ```
//!
//! [`GraphConfig::report`] prints the file back without the `jmx*` keys, which is the answer
//! to `jmx2munin config`. [`fetch_fields`] reads the value of every field.

mod config;
mod fetch;

pub use config::{FieldProperties, GraphConfig};
pub use fetch::fetch_fields;
