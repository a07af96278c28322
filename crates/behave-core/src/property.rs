//! Typed, release-scoped named settings.
//!
//! Values are stored as text and validated against the declared type when
//! they are written (`update`, typed setters) and when they are read through
//! a typed getter. The dictionary round-trips through a small XML file
//! format: entries are written sorted by name with their release range.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::definition::{
    Attributes, DefinitionError, DefinitionErrorKind, DefinitionHandler, parse_bool,
    parse_definition,
};
use crate::release::ReleaseRange;

/// Declared type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Boolean,
    Integer,
    Real,
    Color,
    String,
}

impl PropertyType {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "boolean" => Some(PropertyType::Boolean),
            "integer" => Some(PropertyType::Integer),
            "real" => Some(PropertyType::Real),
            "color" => Some(PropertyType::Color),
            "string" => Some(PropertyType::String),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Boolean => "boolean",
            PropertyType::Integer => "integer",
            PropertyType::Real => "real",
            PropertyType::Color => "color",
            PropertyType::String => "string",
        }
    }

    /// Whether `text` is a valid encoding of a value of this type.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            PropertyType::Boolean => parse_bool(text).is_some(),
            PropertyType::Integer => text.trim().parse::<i64>().is_ok(),
            PropertyType::Real => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
            PropertyType::Color => is_color(text),
            PropertyType::String => true,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `#rrggbb` or a plain color name such as `black`.
fn is_color(text: &str) -> bool {
    match text.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

/// Errors from property access.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("property not found: {0}")]
    NotFound(String),
    #[error("property '{name}' is {actual}, not {expected}")]
    WrongType {
        name: String,
        expected: PropertyType,
        actual: PropertyType,
    },
    #[error("'{value}' is not a valid {kind} value for property '{name}'")]
    InvalidValue {
        name: String,
        kind: PropertyType,
        value: String,
    },
    #[error("property already exists: {0}")]
    Duplicate(String),
    #[error("property file error: {0}")]
    File(#[from] DefinitionError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named, typed setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyType,
    value: String,
    pub release: ReleaseRange,
}

impl Property {
    /// Build a property, validating `value` against `kind`.
    pub fn new(
        name: &str,
        kind: PropertyType,
        value: &str,
        release: ReleaseRange,
    ) -> Result<Self, PropertyError> {
        if !kind.accepts(value) {
            return Err(PropertyError::InvalidValue {
                name: name.to_string(),
                kind,
                value: value.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            value: value.trim().to_string(),
            release,
        })
    }

    /// The string-encoded value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_current(&self, release: u32) -> bool {
        self.release.contains(release)
    }
}

/// Name-keyed dictionary of properties. Owns its entries.
#[derive(Debug, Clone, Default)]
pub struct PropertyDict {
    entries: HashMap<String, Property>,
}

impl PropertyDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Add a new property. Names must be unique.
    pub fn add(&mut self, property: Property) -> Result<(), PropertyError> {
        if self.entries.contains_key(&property.name) {
            return Err(PropertyError::Duplicate(property.name));
        }
        self.entries.insert(property.name.clone(), property);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Property names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn typed(&self, name: &str, expected: PropertyType) -> Result<&Property, PropertyError> {
        let prop = self
            .entries
            .get(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
        if prop.kind != expected {
            return Err(PropertyError::WrongType {
                name: name.to_string(),
                expected,
                actual: prop.kind,
            });
        }
        Ok(prop)
    }

    fn invalid(prop: &Property) -> PropertyError {
        PropertyError::InvalidValue {
            name: prop.name.clone(),
            kind: prop.kind,
            value: prop.value.clone(),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, PropertyError> {
        let prop = self.typed(name, PropertyType::Boolean)?;
        parse_bool(&prop.value).ok_or_else(|| Self::invalid(prop))
    }

    pub fn integer(&self, name: &str) -> Result<i64, PropertyError> {
        let prop = self.typed(name, PropertyType::Integer)?;
        prop.value.parse().map_err(|_| Self::invalid(prop))
    }

    pub fn real(&self, name: &str) -> Result<f64, PropertyError> {
        let prop = self.typed(name, PropertyType::Real)?;
        prop.value.parse().map_err(|_| Self::invalid(prop))
    }

    pub fn color(&self, name: &str) -> Result<&str, PropertyError> {
        Ok(self.typed(name, PropertyType::Color)?.value())
    }

    pub fn string(&self, name: &str) -> Result<&str, PropertyError> {
        Ok(self.typed(name, PropertyType::String)?.value())
    }

    /// Replace a value from its text encoding, validating against the
    /// declared type. On failure the stored value is unchanged.
    pub fn update(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        let prop = self
            .entries
            .get_mut(name)
            .ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
        if !prop.kind.accepts(value) {
            return Err(PropertyError::InvalidValue {
                name: name.to_string(),
                kind: prop.kind,
                value: value.to_string(),
            });
        }
        prop.value = value.trim().to_string();
        Ok(())
    }

    fn set_typed(
        &mut self,
        name: &str,
        expected: PropertyType,
        value: String,
    ) -> Result<(), PropertyError> {
        self.typed(name, expected)?;
        self.update(name, &value)
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> Result<(), PropertyError> {
        self.set_typed(name, PropertyType::Boolean, value.to_string())
    }

    pub fn set_integer(&mut self, name: &str, value: i64) -> Result<(), PropertyError> {
        self.set_typed(name, PropertyType::Integer, value.to_string())
    }

    pub fn set_real(&mut self, name: &str, value: f64) -> Result<(), PropertyError> {
        self.set_typed(name, PropertyType::Real, value.to_string())
    }

    pub fn set_color(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        self.set_typed(name, PropertyType::Color, value.to_string())
    }

    pub fn set_string(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        self.set_typed(name, PropertyType::String, value.to_string())
    }

    // -----------------------------------------------------------------------
    // XML round trip
    // -----------------------------------------------------------------------

    /// Serialize every property current for `release`, sorted by name.
    pub fn write_xml(&self, release: u32) -> Result<String, PropertyError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let release_text = release.to_string();
        let mut root = BytesStart::new("properties");
        root.push_attribute(("release", release_text.as_str()));
        writer.write_event(Event::Start(root))?;

        for name in self.names() {
            let prop = &self.entries[name];
            if !prop.is_current(release) {
                continue;
            }
            let from = prop.release.from.to_string();
            let thru = prop.release.thru.to_string();
            let mut elem = BytesStart::new("property");
            elem.push_attribute(("name", prop.name.as_str()));
            elem.push_attribute(("type", prop.kind.as_str()));
            elem.push_attribute(("value", prop.value.as_str()));
            elem.push_attribute(("releaseFrom", from.as_str()));
            elem.push_attribute(("releaseThru", thru.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("properties")))?;
        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write_xml_file(&self, path: &Path, release: u32) -> Result<(), PropertyError> {
        let xml = self.write_xml(release)?;
        std::fs::write(path, xml)?;
        Ok(())
    }

    /// Read properties current for `release` from property-file XML.
    ///
    /// Existing entries are updated (their type must match); unknown names are
    /// added. Returns the number of entries read.
    pub fn read_xml(&mut self, text: &str, release: u32) -> Result<usize, PropertyError> {
        let mut handler = PropertyFileHandler {
            release,
            parsed: Vec::new(),
            depth: 0,
        };
        parse_definition(text, &mut handler)?;

        // Validate everything before touching the dictionary.
        for prop in &handler.parsed {
            if let Some(existing) = self.entries.get(&prop.name) {
                if existing.kind != prop.kind {
                    return Err(PropertyError::WrongType {
                        name: prop.name.clone(),
                        expected: existing.kind,
                        actual: prop.kind,
                    });
                }
            }
        }
        let count = handler.parsed.len();
        for prop in handler.parsed {
            match self.entries.get_mut(&prop.name) {
                Some(existing) => existing.value = prop.value,
                None => {
                    self.entries.insert(prop.name.clone(), prop);
                }
            }
        }
        Ok(count)
    }

    pub fn read_xml_file(&mut self, path: &Path, release: u32) -> Result<usize, PropertyError> {
        let text = std::fs::read_to_string(path)?;
        self.read_xml(&text, release)
    }
}

struct PropertyFileHandler {
    release: u32,
    parsed: Vec<Property>,
    depth: usize,
}

impl DefinitionHandler for PropertyFileHandler {
    fn start(
        &mut self,
        element: &str,
        attributes: &Attributes,
        _line: usize,
    ) -> Result<(), DefinitionErrorKind> {
        self.depth += 1;
        match (self.depth, element) {
            (1, "properties") => Ok(()),
            (1, other) => Err(DefinitionErrorKind::WrongRoot {
                expected: "properties",
                found: other.to_string(),
            }),
            (2, "property") => {
                let name = attributes.required("name")?;
                let raw_type = attributes.required("type")?;
                let kind = PropertyType::parse(raw_type)
                    .ok_or_else(|| attributes.invalid("type", raw_type, "a property type"))?;
                let value = attributes.required("value")?;
                let release = ReleaseRange::new(
                    attributes.required_u32("releaseFrom")?,
                    attributes.required_u32("releaseThru")?,
                );
                if !release.contains(self.release) {
                    return Ok(());
                }
                let prop = Property::new(name, kind, value, release)
                    .map_err(|_| attributes.invalid("value", value, "a value of the declared type"))?;
                self.parsed.push(prop);
                Ok(())
            }
            (_, other) => Err(DefinitionErrorKind::UnknownElement(other.to_string())),
        }
    }

    fn end(&mut self, _element: &str) -> Result<(), DefinitionErrorKind> {
        self.depth -= 1;
        Ok(())
    }
}
