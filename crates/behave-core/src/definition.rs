//! Streaming element/attribute reader for definition documents.
//!
//! [`parse_definition`] walks the document with `quick-xml` and calls a
//! [`DefinitionHandler`] once when each element opens (`start`) and once when
//! it closes (`end`), so handlers can keep a push/pop stack to validate
//! nesting. Attributes are delivered in document order and may repeat, which
//! is how a function lists several `input=` and `output=` variables.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::domain::DomainError;
use crate::units::UnitError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// What went wrong while building a registry from a definition document.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionErrorKind {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("document has no root element")]
    EmptyDocument,
    #[error("root element must be '{expected}', found '{found}'")]
    WrongRoot { expected: &'static str, found: String },
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    #[error("element '{element}' is not allowed inside '{parent}'")]
    MisplacedElement { element: String, parent: String },
    #[error("element '{element}' is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },
    #[error("attribute '{attribute}' of '{element}' has value '{value}', expected {expected}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        expected: &'static str,
    },
    #[error("release {0} was never declared")]
    UnknownRelease(u32),
    #[error("release {0} is declared twice")]
    DuplicateRelease(u32),
    #[error("release range {from}..{thru} is inverted")]
    InvertedReleaseRange { from: u32, thru: u32 },
    #[error("language '{0}' was never declared")]
    UnknownLanguage(String),
    #[error("function '{function}' references undeclared variable '{variable}'")]
    UnknownVariable { function: String, variable: String },
    #[error("variable '{variable}' references undeclared item list '{list}'")]
    UnknownItemList { variable: String, list: String },
    #[error("function '{function}' references undeclared module '{module}'")]
    UnknownModule { function: String, module: String },
    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },
    #[error("more {kind} elements than the scan counted ({capacity})")]
    CapacityExceeded { kind: &'static str, capacity: usize },
    #[error("{role} slots of variable '{variable}' overflowed")]
    SlotOverflow { variable: String, role: &'static str },
    #[error("{role} slots of variable '{variable}' were left unfilled")]
    UnfilledSlots { variable: String, role: &'static str },
    #[error("variable '{variable}' has inconvertible units: {source}")]
    Units { variable: String, source: UnitError },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A fatal construction error, with the document line when one applies.
#[derive(Debug, thiserror::Error)]
#[error("{}{kind}", line_prefix(.line))]
pub struct DefinitionError {
    pub line: Option<usize>,
    #[source]
    pub kind: DefinitionErrorKind,
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("line {line}: "),
        None => String::new(),
    }
}

impl DefinitionError {
    pub fn at(line: usize, kind: DefinitionErrorKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }

    pub fn unlocated(kind: DefinitionErrorKind) -> Self {
        Self { line: None, kind }
    }
}

impl From<DefinitionErrorKind> for DefinitionError {
    fn from(kind: DefinitionErrorKind) -> Self {
        Self::unlocated(kind)
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Attributes of one element, in document order. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    element: String,
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            pairs: Vec::new(),
        }
    }

    /// Builder-style insert, used by tests and by callers that synthesize
    /// elements.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.pairs.push((name.to_string(), value.to_string()));
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated attribute, in document order.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn required(&self, name: &str) -> Result<&str, DefinitionErrorKind> {
        self.get(name)
            .ok_or_else(|| DefinitionErrorKind::MissingAttribute {
                element: self.element.clone(),
                attribute: name.to_string(),
            })
    }

    pub fn optional_str(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn required_u32(&self, name: &str) -> Result<u32, DefinitionErrorKind> {
        let raw = self.required(name)?;
        self.parse_as(name, raw, "an unsigned integer")
    }

    pub fn optional_u32(&self, name: &str, default: u32) -> Result<u32, DefinitionErrorKind> {
        match self.get(name) {
            Some(raw) => self.parse_as(name, raw, "an unsigned integer"),
            None => Ok(default),
        }
    }

    pub fn optional_f64(&self, name: &str, default: f64) -> Result<f64, DefinitionErrorKind> {
        match self.get(name) {
            Some(raw) => self.parse_as(name, raw, "a real number"),
            None => Ok(default),
        }
    }

    pub fn optional_bool(&self, name: &str, default: bool) -> Result<bool, DefinitionErrorKind> {
        match self.get(name) {
            Some(raw) => parse_bool(raw).ok_or_else(|| self.invalid(name, raw, "true or false")),
            None => Ok(default),
        }
    }

    fn parse_as<T: std::str::FromStr>(
        &self,
        name: &str,
        raw: &str,
        expected: &'static str,
    ) -> Result<T, DefinitionErrorKind> {
        raw.trim()
            .parse()
            .map_err(|_| self.invalid(name, raw, expected))
    }

    pub fn invalid(&self, name: &str, raw: &str, expected: &'static str) -> DefinitionErrorKind {
        DefinitionErrorKind::InvalidAttribute {
            element: self.element.clone(),
            attribute: name.to_string(),
            value: raw.to_string(),
            expected,
        }
    }
}

/// Accepted spellings of boolean attribute values.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Attributes, DefinitionErrorKind> {
    let element = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| DefinitionErrorKind::Xml(e.to_string()))?
        .to_string();
    let mut attrs = Attributes::new(&element);
    // Repeated attribute names are part of the format.
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| DefinitionErrorKind::Xml(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| DefinitionErrorKind::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| DefinitionErrorKind::Xml(e.to_string()))?;
        attrs.push(key, &value);
    }
    Ok(attrs)
}

/// Parse a single element fragment such as one line of a record file.
/// Returns `None` when the text holds no start or empty element.
pub fn parse_element(text: &str) -> Result<Option<Attributes>, DefinitionErrorKind> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return read_attributes(&e).map(Some),
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(DefinitionErrorKind::Xml(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Handler contract and driver
// ---------------------------------------------------------------------------

/// Receives element callbacks from [`parse_definition`].
pub trait DefinitionHandler {
    /// An element opened. `line` is the 1-based line of its start tag.
    fn start(
        &mut self,
        element: &str,
        attributes: &Attributes,
        line: usize,
    ) -> Result<(), DefinitionErrorKind>;

    /// An element closed. Empty elements close immediately after opening.
    fn end(&mut self, element: &str) -> Result<(), DefinitionErrorKind> {
        let _ = element;
        Ok(())
    }
}

/// Tracks the line number of the reader position without rescanning.
struct LineTracker<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
        }
    }

    fn advance_to(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        if offset > self.offset {
            self.line += self.text.as_bytes()[self.offset..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = offset;
        }
        self.line
    }
}

/// Stream `text` through `handler`.
pub fn parse_definition<H: DefinitionHandler>(
    text: &str,
    handler: &mut H,
) -> Result<(), DefinitionError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut lines = LineTracker::new(text);
    let mut saw_element = false;

    loop {
        // Position of the next event's first byte, skipping leading whitespace.
        let raw_pos = reader.buffer_position() as usize;
        let skipped = text
            .get(raw_pos..)
            .map(|rest| rest.len() - rest.trim_start().len())
            .unwrap_or(0);
        let line = lines.advance_to(raw_pos + skipped);

        let event = reader
            .read_event()
            .map_err(|e| DefinitionError::at(line, DefinitionErrorKind::Xml(e.to_string())))?;
        match event {
            Event::Start(e) => {
                saw_element = true;
                let attrs = read_attributes(&e).map_err(|k| DefinitionError::at(line, k))?;
                handler
                    .start(attrs.element(), &attrs, line)
                    .map_err(|k| DefinitionError::at(line, k))?;
            }
            Event::Empty(e) => {
                saw_element = true;
                let attrs = read_attributes(&e).map_err(|k| DefinitionError::at(line, k))?;
                handler
                    .start(attrs.element(), &attrs, line)
                    .map_err(|k| DefinitionError::at(line, k))?;
                handler
                    .end(attrs.element())
                    .map_err(|k| DefinitionError::at(line, k))?;
            }
            Event::End(e) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .map_err(|err| {
                        DefinitionError::at(line, DefinitionErrorKind::Xml(err.to_string()))
                    })?
                    .to_string();
                handler
                    .end(&name)
                    .map_err(|k| DefinitionError::at(line, k))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_element {
        return Err(DefinitionError::unlocated(
            DefinitionErrorKind::EmptyDocument,
        ));
    }
    Ok(())
}
