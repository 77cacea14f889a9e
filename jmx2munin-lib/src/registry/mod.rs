//! Access to a remote attribute registry.
//!
//! A registry holds object instances, each identified by an [`ObjectName`] and exposing a
//! set of named attributes. [`AttributeSource`] is the narrow interface the rest of the crate
//! talks to; [`connect`] picks an implementation from a [`Locator`]:
//!
//! - [`JolokiaSource`] talks to a Jolokia agent attached to a running JVM
//! - [`SnapshotSource`] reads a recorded JSON snapshot from disk
//!
//! Values cross this boundary as [`AttributeValue`], a closed set of shapes that the
//! flattener matches on exhaustively. [`poll`] and [`run_query`] drive a single poll over
//! every instance matching a pattern.

mod attribute_value;
mod jolokia;
mod object_name;
mod query;
mod snapshot;
mod source;

pub use attribute_value::{AttributeValue, Number};
pub use jolokia::JolokiaSource;
pub use object_name::{ObjectName, ObjectNamePattern};
pub use query::{PollStats, poll, run_query};
pub use snapshot::SnapshotSource;
pub use source::{AttributeInfo, AttributeSource, Credentials, Locator, connect};
