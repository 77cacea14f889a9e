use crate::Result;
use crate::registry::ObjectName;
use camino::Utf8Path;
use ohno::{EnrichableExt, IntoAppError, bail};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     graph";

const OBJECT_NAME_KEY: &str = "jmxObjectName";
const ATTRIBUTE_NAME_KEY: &str = "jmxAttributeName";
const ATTRIBUTE_KEY_KEY: &str = "jmxAttributeKey";

/// Shortest line that can carry a property.
const MIN_LINE_LEN: usize = 6;

/// Parsed graph configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphConfig {
    graph_properties: Vec<(String, String)>,
    fields: Vec<FieldProperties>,
}

/// Properties of one field, plus where its value lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProperties {
    name: String,
    object_name: Option<ObjectName>,
    attribute_name: Option<String>,
    attribute_key: Option<String>,
    properties: Vec<(String, String)>,
}

impl GraphConfig {
    /// Load a graph configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading graph configuration '{path}'"))?;
        let config = Self::parse(&text).map_err(|e| e.enrich_with(|| format!("parsing graph configuration '{path}'")))?;
        log::debug!(target: LOG_TARGET, "Loaded {} field(s) from '{path}'", config.fields.len());
        Ok(config)
    }

    /// Parse graph configuration text.
    ///
    /// Lines starting with `%` or a space, and lines shorter than six characters, are ignored.
    /// Every other line is `name value`. A name with a `.` past its first character belongs to
    /// the field named by everything before its last `.`; other names are graph properties.
    ///
    /// # Errors
    ///
    /// Returns an error if a field sets one of its `jmx*` keys twice or names an invalid object.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, line) in text.lines().enumerate() {
            if line.starts_with('%') || line.starts_with(' ') || line.chars().count() < MIN_LINE_LEN {
                continue;
            }

            let (name, value) = line.split_once(' ').unwrap_or((line, ""));

            match name.rsplit_once('.') {
                Some((field, key)) if !name.starts_with('.') => config
                    .field_mut(field)
                    .set(key, value)
                    .map_err(|e| e.enrich_with(|| format!("line {}", index + 1)))?,
                _ => put(&mut config.graph_properties, name, value),
            }
        }

        Ok(config)
    }

    #[must_use]
    pub fn graph_properties(&self) -> &[(String, String)] {
        &self.graph_properties
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldProperties] {
        &self.fields
    }

    /// Print graph properties, then each field's properties, in the order they first appeared.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn report<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (name, value) in &self.graph_properties {
            writeln!(writer, "{name} {value}").into_app_err("writing graph configuration")?;
        }

        for field in &self.fields {
            field.report(writer)?;
        }

        Ok(())
    }

    fn field_mut(&mut self, name: &str) -> &mut FieldProperties {
        let index = match self.fields.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.fields.push(FieldProperties::new(name));
                self.fields.len() - 1
            }
        };

        &mut self.fields[index]
    }
}

impl FieldProperties {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            object_name: None,
            attribute_name: None,
            attribute_key: None,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn object_name(&self) -> Option<&ObjectName> {
        self.object_name.as_ref()
    }

    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute_name.as_deref()
    }

    /// Entry to select when the attribute holds a composite value.
    #[must_use]
    pub fn attribute_key(&self) -> Option<&str> {
        self.attribute_key.as_deref()
    }

    /// Free-form properties, echoed by [`GraphConfig::report`].
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            OBJECT_NAME_KEY => {
                if self.object_name.is_some() {
                    bail!("{OBJECT_NAME_KEY} already set for field '{}'", self.name);
                }
                self.object_name = Some(ObjectName::parse(value)?);
            }
            ATTRIBUTE_NAME_KEY => {
                if self.attribute_name.is_some() {
                    bail!("{ATTRIBUTE_NAME_KEY} already set for field '{}'", self.name);
                }
                self.attribute_name = Some(value.to_string());
            }
            ATTRIBUTE_KEY_KEY => {
                if self.attribute_key.is_some() {
                    bail!("{ATTRIBUTE_KEY_KEY} already set for field '{}'", self.name);
                }
                self.attribute_key = Some(value.to_string());
            }
            _ => put(&mut self.properties, key, value),
        }

        Ok(())
    }

    fn report<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (key, value) in &self.properties {
            writeln!(writer, "{}.{key} {value}", self.name).into_app_err("writing graph configuration")?;
        }
        Ok(())
    }
}

/// Insert or overwrite `key`, keeping the position of its first appearance.
fn put(properties: &mut Vec<(String, String)>, key: &str, value: &str) {
    match properties.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => value.clone_into(existing),
        None => properties.push((key.to_string(), value.to_string())),
    }
}
