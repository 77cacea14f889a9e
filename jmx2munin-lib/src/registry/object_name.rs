use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use regex::Regex;
use std::collections::BTreeMap;

/// Identity of one object instance in an attribute registry.
///
/// An object name is a domain plus a non-empty set of `key=value` properties. Two names are
/// equal when their domains and full property sets are equal, regardless of the order in
/// which the properties were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    domain: Box<str>,
    properties: BTreeMap<Box<str>, Box<str>>,
}

impl ObjectName {
    /// Build an object name from a domain and its properties.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no properties, if a key is empty, or if a key appears twice.
    pub fn new<K, V>(domain: impl Into<Box<str>>, properties: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<Box<str>>,
        V: Into<Box<str>>,
    {
        let domain = domain.into();
        let mut map = BTreeMap::new();

        for (key, value) in properties {
            let key = key.into();
            if key.is_empty() {
                bail!("empty property key in object name for domain '{domain}'");
            }

            if map.insert(Box::clone(&key), value.into()).is_some() {
                bail!("duplicate property key '{key}' in object name for domain '{domain}'");
            }
        }

        if map.is_empty() {
            bail!("object name for domain '{domain}' has no properties");
        }

        Ok(Self { domain, properties: map })
    }

    /// Parse the `domain:key=value,key=value` string form.
    ///
    /// Values may be quoted; quoted values keep their quotes and may contain `,`, `=` and `:`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid, non-pattern object name.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((domain, key_list)) = s.split_once(':') else {
            bail!("invalid object name '{s}': missing ':' after the domain");
        };

        if domain.contains(['*', '?']) {
            bail!("invalid object name '{s}': wildcards are only allowed in query expressions");
        }

        let mut properties = Vec::new();
        for entry in split_key_list(key_list) {
            let Some((key, value)) = entry.split_once('=') else {
                bail!("invalid object name '{s}': property '{entry}' has no '='");
            };
            properties.push((key, value));
        }

        Self::new(domain, properties)
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of the property named `key`, if present.
    #[must_use]
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(AsRef::as_ref)
    }

    /// Properties in lexicographic key order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// The property list as `key=value` pairs joined with `,`, in key order.
    #[must_use]
    pub fn key_list(&self) -> String {
        self.properties().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(",")
    }

    /// `domain:key_list`, with properties in key order.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        self.to_string()
    }
}

impl Display for ObjectName {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// A selector expression matching a set of object names.
///
/// Uses the object name syntax with `*` and `?` wildcards in the domain and in property values.
/// A `*` entry in the property list allows properties beyond the ones listed.
#[derive(Debug, Clone)]
pub struct ObjectNamePattern {
    text: Box<str>,
    domain: Regex,
    properties: Vec<(Box<str>, Regex)>,
    allows_other_properties: bool,
}

impl ObjectNamePattern {
    /// Parse a selector expression such as `java.lang:type=*` or `*:*`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((domain, key_list)) = s.split_once(':') else {
            bail!("invalid query expression '{s}': missing ':' after the domain");
        };

        let mut properties: Vec<(Box<str>, Regex)> = Vec::new();
        let mut allows_other_properties = false;

        for entry in split_key_list(key_list) {
            if entry == "*" {
                allows_other_properties = true;
                continue;
            }

            let Some((key, value)) = entry.split_once('=') else {
                bail!("invalid query expression '{s}': property '{entry}' has no '='");
            };

            if key.is_empty() {
                bail!("invalid query expression '{s}': empty property key");
            }

            if properties.iter().any(|(k, _)| k.as_ref() == key) {
                bail!("invalid query expression '{s}': duplicate property key '{key}'");
            }

            properties.push((Box::from(key), glob_regex(value)?));
        }

        if properties.is_empty() && !allows_other_properties {
            bail!("invalid query expression '{s}': no properties");
        }

        Ok(Self {
            text: Box::from(s),
            domain: glob_regex(domain)?,
            properties,
            allows_other_properties,
        })
    }

    /// The expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn matches(&self, name: &ObjectName) -> bool {
        if !self.domain.is_match(name.domain()) {
            return false;
        }

        if !self.allows_other_properties && name.properties.len() != self.properties.len() {
            return false;
        }

        self.properties
            .iter()
            .all(|(key, value)| name.key_property(key).is_some_and(|v| value.is_match(v)))
    }
}

impl Display for ObjectNamePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split a property list on `,`, ignoring commas inside quoted values.
#[expect(clippy::string_slice, reason = "slice bounds come from char_indices")]
fn split_key_list(key_list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in key_list.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&key_list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(&key_list[start..]);
    parts
}

fn glob_regex(glob: &str) -> Result<Regex> {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');

    Regex::new(&pattern).into_app_err_with(|| format!("invalid wildcard pattern '{glob}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let name = ObjectName::parse("java.lang:type=Memory").unwrap();
        assert_eq!(name.domain(), "java.lang");
        assert_eq!(name.key_property("type"), Some("Memory"));
        assert_eq!(name.key_property("name"), None);
    }

    #[test]
    fn test_equality_ignores_property_order() {
        let a = ObjectName::parse("app:type=Cache,name=users,scope=local").unwrap();
        let b = ObjectName::parse("app:scope=local,type=Cache,name=users").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical_name(), b.canonical_name());
    }

    #[test]
    fn test_different_property_sets_are_distinct() {
        let a = ObjectName::parse("app:type=Cache").unwrap();
        let b = ObjectName::parse("app:type=Cache,name=users").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_canonical_name_sorts_keys() {
        let name = ObjectName::new("app", [("type", "Cache"), ("name", "users")]).unwrap();
        assert_eq!(name.canonical_name(), "app:name=users,type=Cache");
        assert_eq!(name.to_string(), "app:name=users,type=Cache");
    }

    #[test]
    fn test_quoted_value_keeps_commas() {
        let name = ObjectName::parse(r#"app:type=Pool,name="a,b=c""#).unwrap();
        assert_eq!(name.key_property("name"), Some(r#""a,b=c""#));
        assert_eq!(name.key_property("type"), Some("Pool"));
    }

    #[test]
    fn test_empty_value_is_accepted() {
        let name = ObjectName::parse("app:type=").unwrap();
        assert_eq!(name.key_property("type"), Some(""));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ObjectName::parse("no-colon").is_err());
        assert!(ObjectName::parse("app:").is_err());
        assert!(ObjectName::parse("app:type").is_err());
        assert!(ObjectName::parse("app:type=a,type=b").is_err());
        assert!(ObjectName::parse("app:=x").is_err());
        assert!(ObjectName::parse("a*:type=x").is_err());
    }

    #[test]
    fn test_pattern_match_all() {
        let pattern = ObjectNamePattern::parse("*:*").unwrap();
        assert!(pattern.matches(&ObjectName::parse("app:type=Cache").unwrap()));
        assert!(pattern.matches(&ObjectName::parse("java.lang:type=Memory,name=x").unwrap()));
    }

    #[test]
    fn test_pattern_exact_requires_same_property_count() {
        let pattern = ObjectNamePattern::parse("app:type=Cache").unwrap();
        assert!(pattern.matches(&ObjectName::parse("app:type=Cache").unwrap()));
        assert!(!pattern.matches(&ObjectName::parse("app:type=Cache,name=x").unwrap()));
        assert!(!pattern.matches(&ObjectName::parse("other:type=Cache").unwrap()));
    }

    #[test]
    fn test_pattern_property_list_wildcard() {
        let pattern = ObjectNamePattern::parse("app:type=Cache,*").unwrap();
        assert!(pattern.matches(&ObjectName::parse("app:type=Cache").unwrap()));
        assert!(pattern.matches(&ObjectName::parse("app:type=Cache,name=x").unwrap()));
        assert!(!pattern.matches(&ObjectName::parse("app:type=Pool,name=x").unwrap()));
    }

    #[test]
    fn test_pattern_value_and_domain_wildcards() {
        let pattern = ObjectNamePattern::parse("a?p:type=Ca*").unwrap();
        assert!(pattern.matches(&ObjectName::parse("app:type=Cache").unwrap()));
        assert!(pattern.matches(&ObjectName::parse("amp:type=Cat").unwrap()));
        assert!(!pattern.matches(&ObjectName::parse("apps:type=Cache").unwrap()));
    }

    #[test]
    fn test_pattern_escapes_regex_characters() {
        let pattern = ObjectNamePattern::parse("java.lang:type=Memory").unwrap();
        assert!(!pattern.matches(&ObjectName::parse("javaXlang:type=Memory").unwrap()));
        assert_eq!(pattern.as_str(), "java.lang:type=Memory");
    }

    #[test]
    fn test_pattern_errors() {
        assert!(ObjectNamePattern::parse("app").is_err());
        assert!(ObjectNamePattern::parse("app:").is_err());
        assert!(ObjectNamePattern::parse("app:type").is_err());
        assert!(ObjectNamePattern::parse("app:type=a,type=b").is_err());
    }
}
