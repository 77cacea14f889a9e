//! Turning attribute values into named Munin fields.
//!
//! A single attribute may hold a scalar, a collection, or a nested structure. [`flatten`]
//! walks such a value and reports every scalar it finds under a path derived from the
//! attribute name, such as `peers[0]` or `entries.size`. [`field_name`] then combines the
//! instance and the path into the identifier Munin sees, while [`enum_key`] selects the
//! section of the [`Enums`] table that maps textual leaves to numbers.
//!
//! [`AttributeFilter`] narrows the top-level attributes that are read at all.

mod enums;
mod filter;
mod flatten;
mod naming;

pub use enums::Enums;
pub use filter::AttributeFilter;
pub use flatten::{Listener, MAX_DEPTH, flatten};
pub use naming::{enum_key, field_name};
