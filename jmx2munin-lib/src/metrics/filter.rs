use super::field_name;
use crate::registry::ObjectName;
use std::collections::HashSet;

const SIZE_SUFFIX: &str = "_size";

/// Selects which top-level attributes are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttributeFilter {
    /// Every readable attribute.
    #[default]
    All,

    /// Only attributes whose field name is in the set.
    Named(HashSet<String>),
}

impl AttributeFilter {
    /// Build a filter from field names as typed by the user.
    ///
    /// Entries are trimmed and lowercased, and a trailing `_size` is removed once so that a
    /// collection's size field selects the whole collection. Blank entries are dropped; if
    /// nothing remains the filter accepts everything.
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref().trim().to_ascii_lowercase();
                match name.strip_suffix(SIZE_SUFFIX) {
                    Some(stripped) => stripped.to_string(),
                    None => name,
                }
            })
            .filter(|name| !name.is_empty())
            .collect();

        if set.is_empty() { Self::All } else { Self::Named(set) }
    }

    #[must_use]
    pub fn include(&self, name: &ObjectName, attribute: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(set) => set.contains(&field_name(name, attribute)),
        }
    }
}
