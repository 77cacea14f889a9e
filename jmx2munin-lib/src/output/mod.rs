//! Rendering of flattened attribute values in the Munin plugin protocol.
//!
//! # Implementation Model
//!
//! Every attribute value read during a poll is handed to an [`Output`]. Both implementations
//! run the value through [`flatten`](crate::metrics::flatten) and act on the leaves:
//!
//! - [`ListOutput`] prints a `[key]` section header for each distinct enum key it sees, which
//!   is a convenient starting point for writing an enum rule file
//! - [`MuninOutput`] prints one `field.value number` line per leaf, resolving text leaves
//!   through the enum rules and printing `U` when they cannot be resolved
//!
//! Each output owns its writer, so concurrent polls simply use separate outputs.

mod format;
mod list;
mod munin;

pub use format::{UNKNOWN, format_number};
pub use list::ListOutput;
pub use munin::MuninOutput;

use crate::Result;
use crate::registry::{AttributeValue, ObjectName};

/// Receives the value of every polled attribute.
pub trait Output {
    /// Render one attribute value.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn output(&mut self, name: &ObjectName, attribute: &str, value: &AttributeValue) -> Result<()>;
}
