//! Attribute source backed by a JSON snapshot of a registry.
//!
//! The file lists every instance with its attributes and their values:
//!
//! ```json
//! {
//!   "beans": [
//!     {
//!       "name": "app:type=Cache",
//!       "attributes": [
//!         { "name": "hitRate", "value": 0.957 },
//!         { "name": "regions", "value": ["eu", "us"], "set": true },
//!         { "name": "password", "value": "x", "readable": false }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! JSON has no set type, so an array attribute marked `"set": true` is delivered as
//! [`AttributeValue::Set`] holding the string form of each element.

use super::{AttributeInfo, AttributeSource, AttributeValue, ObjectName, ObjectNamePattern};
use crate::Result;
use camino::Utf8Path;
use ohno::{EnrichableExt, IntoAppError, bail};
use serde::Deserialize;
use std::fs;

const LOG_TARGET: &str = "  snapshot";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    beans: Vec<SnapshotBean>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotBean {
    name: String,
    #[serde(default)]
    attributes: Vec<SnapshotAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotAttribute {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default = "default_readable")]
    readable: bool,
    #[serde(default)]
    set: bool,
}

const fn default_readable() -> bool {
    true
}

#[derive(Debug)]
struct Bean {
    name: ObjectName,
    attributes: Vec<SnapshotAttribute>,
}

#[derive(Debug)]
pub struct SnapshotSource {
    beans: Vec<Bean>,
}

impl SnapshotSource {
    /// Read a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading snapshot file '{path}'"))?;
        Self::parse(&text).map_err(|e| e.enrich_with(|| format!("loading snapshot file '{path}'")))
    }

    /// Parse snapshot JSON.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, invalid object names, or duplicate instances.
    pub fn parse(text: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(text).into_app_err("parsing snapshot JSON")?;

        let mut beans: Vec<Bean> = Vec::with_capacity(file.beans.len());
        for bean in file.beans {
            let name = ObjectName::parse(&bean.name)?;
            if beans.iter().any(|b| b.name == name) {
                bail!("instance '{name}' appears more than once in the snapshot");
            }

            beans.push(Bean {
                name,
                attributes: bean.attributes,
            });
        }

        log::debug!(target: LOG_TARGET, "Loaded snapshot with {} instance(s)", beans.len());
        Ok(Self { beans })
    }

    fn bean(&self, name: &ObjectName) -> Result<&Bean> {
        match self.beans.iter().find(|b| &b.name == name) {
            Some(bean) => Ok(bean),
            None => bail!("instance '{name}' not found"),
        }
    }
}

impl AttributeSource for SnapshotSource {
    fn query_instances(&mut self, pattern: &ObjectNamePattern) -> Result<Vec<ObjectName>> {
        Ok(self
            .beans
            .iter()
            .filter(|b| pattern.matches(&b.name))
            .map(|b| b.name.clone())
            .collect())
    }

    fn attribute_info(&mut self, name: &ObjectName) -> Result<Vec<AttributeInfo>> {
        Ok(self
            .bean(name)?
            .attributes
            .iter()
            .map(|a| AttributeInfo {
                name: a.name.clone(),
                readable: a.readable,
            })
            .collect())
    }

    fn attribute_value(&mut self, name: &ObjectName, attribute: &str) -> Result<AttributeValue> {
        let Some(attr) = self.bean(name)?.attributes.iter().find(|a| a.name == attribute) else {
            bail!("attribute '{attribute}' not found on '{name}'");
        };

        if !attr.readable {
            bail!("attribute '{attribute}' of '{name}' is not readable");
        }

        match &attr.value {
            serde_json::Value::Array(elements) if attr.set => Ok(AttributeValue::set_from_json(elements)),
            value => Ok(AttributeValue::from(value.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Number;

    const SNAPSHOT: &str = r#"{
        "beans": [
            {
                "name": "app:type=Cache",
                "attributes": [
                    { "name": "hitRate", "value": 0.957 },
                    { "name": "state", "value": "DEGRADED" },
                    { "name": "secret", "value": "x", "readable": false },
                    { "name": "regions", "value": ["eu", 7], "set": true }
                ]
            },
            { "name": "app:type=Pool,name=db", "attributes": [ { "name": "active", "value": 4 } ] },
            { "name": "other:type=Cache" }
        ]
    }"#;

    #[test]
    fn test_query_instances_filters_by_pattern() {
        let mut source = SnapshotSource::parse(SNAPSHOT).unwrap();

        let all = source.query_instances(&ObjectNamePattern::parse("*:*").unwrap()).unwrap();
        assert_eq!(all.len(), 3);

        let app = source.query_instances(&ObjectNamePattern::parse("app:*").unwrap()).unwrap();
        assert_eq!(app.len(), 2);

        let caches = source.query_instances(&ObjectNamePattern::parse("*:type=Cache").unwrap()).unwrap();
        assert_eq!(caches.len(), 2);
    }

    #[test]
    fn test_attribute_info_reports_readability() {
        let mut source = SnapshotSource::parse(SNAPSHOT).unwrap();
        let info = source.attribute_info(&ObjectName::parse("app:type=Cache").unwrap()).unwrap();

        assert_eq!(info.len(), 4);
        assert!(info[0].readable);
        assert_eq!(info[2], AttributeInfo { name: "secret".into(), readable: false });
    }

    #[test]
    fn test_attribute_value() {
        let mut source = SnapshotSource::parse(SNAPSHOT).unwrap();
        let name = ObjectName::parse("app:type=Cache").unwrap();

        assert_eq!(
            source.attribute_value(&name, "hitRate").unwrap(),
            AttributeValue::Number(Number::Float(0.957))
        );
        assert!(source.attribute_value(&name, "secret").is_err());
        assert!(source.attribute_value(&name, "missing").is_err());
    }

    #[test]
    fn test_set_attribute() {
        let mut source = SnapshotSource::parse(SNAPSHOT).unwrap();
        let name = ObjectName::parse("app:type=Cache").unwrap();

        assert_eq!(
            source.attribute_value(&name, "regions").unwrap(),
            AttributeValue::Set(vec!["eu".into(), "7".into()])
        );
    }

    #[test]
    fn test_unknown_instance_is_an_error() {
        let mut source = SnapshotSource::parse(SNAPSHOT).unwrap();
        let name = ObjectName::parse("nope:type=Nothing").unwrap();
        assert!(source.attribute_info(&name).is_err());
    }

    #[test]
    fn test_duplicate_instances_rejected() {
        let text = r#"{ "beans": [ { "name": "a:type=X" }, { "name": "a:type=X" } ] }"#;
        assert!(SnapshotSource::parse(text).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(SnapshotSource::parse("{").is_err());
        assert!(SnapshotSource::parse(r#"{ "beans": [ { "name": "no-colon" } ] }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::try_from(dir.path().join("snapshot.json")).unwrap();
        fs::write(&path, SNAPSHOT).unwrap();

        let source = SnapshotSource::load(&path).unwrap();
        assert_eq!(source.beans.len(), 3);
    }
}
