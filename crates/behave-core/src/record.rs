//! Line-oriented domain record files (`.bpf` fuel models, `.bpm` moisture
//! scenarios).
//!
//! Every line containing `name="` is one field element, parsed on its own:
//!
//! ```text
//! <property name="vSurfaceFuelBedDepth" value="1.5" units="ft" />
//! ```
//!
//! `value` holds the raw value and `units` the unit it is expressed in.
//! Numeric fields are converted to their native unit while the record is
//! read, so a stored record is always in native units. Lines without
//! `name="` (the XML declaration, the root element) are ignored, as are
//! fields the record type does not know.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::escape::escape;

use crate::definition::{DefinitionErrorKind, parse_element};
use crate::units::{UnitConverter, UnitError};

/// Field holding the free-text description of a record.
pub const DESCRIPTION_FIELD: &str = "appDescription";

/// Errors from reading a record file. The registry is never changed by a
/// record that fails to load.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        source: DefinitionErrorKind,
    },
    #[error("line {line}: field '{field}' has no value")]
    MissingValue { line: usize, field: String },
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
    #[error("field '{field}' value '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("field '{field}' has no units")]
    MissingUnits { field: &'static str },
    #[error("field '{field}': {source}")]
    Units {
        field: &'static str,
        source: UnitError,
    },
    #[error("field '{field}' value '{value}' is not one of {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("record has no code")]
    NoCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawField {
    value: String,
    units: Option<String>,
}

/// Fields of a record file, still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, RawField>,
}

impl RawRecord {
    /// Split `text` into fields. Later lines override earlier ones.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let mut fields = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            if !line.contains("name=\"") {
                continue;
            }
            let line_no = i + 1;
            let attrs = parse_element(line)
                .map_err(|source| RecordError::Malformed {
                    line: line_no,
                    source,
                })?
                .ok_or_else(|| RecordError::Malformed {
                    line: line_no,
                    source: DefinitionErrorKind::EmptyDocument,
                })?;
            let name = attrs.required("name").map_err(|source| RecordError::Malformed {
                line: line_no,
                source,
            })?;
            let value = attrs.get("value").ok_or_else(|| RecordError::MissingValue {
                line: line_no,
                field: name.to_string(),
            })?;
            fields.insert(
                name.to_string(),
                RawField {
                    value: value.to_string(),
                    units: attrs.get("units").map(str::to_string),
                },
            );
        }
        Ok(Self { fields })
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw text of a field, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|f| f.value.as_str())
    }

    pub fn description(&self) -> String {
        self.text(DESCRIPTION_FIELD).unwrap_or_default().to_string()
    }

    /// A required numeric field converted to `native` units.
    pub fn number(
        &self,
        field: &'static str,
        native: &str,
        units: &dyn UnitConverter,
    ) -> Result<f64, RecordError> {
        self.optional_number(field, native, units)?
            .ok_or(RecordError::MissingField(field))
    }

    /// An optional numeric field converted to `native` units.
    pub fn optional_number(
        &self,
        field: &'static str,
        native: &str,
        units: &dyn UnitConverter,
    ) -> Result<Option<f64>, RecordError> {
        let Some(raw) = self.fields.get(field) else {
            return Ok(None);
        };
        let value: f64 = raw
            .value
            .trim()
            .parse()
            .map_err(|_| RecordError::NotANumber {
                field,
                value: raw.value.clone(),
            })?;
        let from = raw
            .units
            .as_deref()
            .ok_or(RecordError::MissingUnits { field })?;
        let converted = units
            .convert(value, from, native)
            .map_err(|source| RecordError::Units { field, source })?;
        Ok(Some(converted))
    }

    /// A unitless non-negative integer field.
    pub fn optional_u32(&self, field: &'static str) -> Result<Option<u32>, RecordError> {
        self.text(field)
            .map(|raw| {
                raw.trim().parse().map_err(|_| RecordError::NotANumber {
                    field,
                    value: raw.to_string(),
                })
            })
            .transpose()
    }
}

/// Code of a record: the code field if present and non-empty, else the
/// default (usually the file stem).
pub fn record_code(
    raw: &RawRecord,
    code_field: &str,
    default_code: &str,
) -> Result<String, RecordError> {
    let code = raw
        .text(code_field)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_code.trim());
    if code.is_empty() {
        return Err(RecordError::NoCode);
    }
    Ok(code.to_string())
}

/// Default record code for a file: its stem.
pub fn code_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builds record text in the format [`RawRecord::parse`] reads.
#[derive(Debug)]
pub struct RecordWriter {
    out: String,
}

impl RecordWriter {
    /// Start a record of the given document type.
    pub fn new(doc_type: &str) -> Self {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        out.push_str(&format!("<BehavePlus type=\"{}\">\n", escape(doc_type)));
        Self { out }
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.out.push_str(&format!(
            "  <property name=\"{}\" value=\"{}\" />\n",
            escape(name),
            escape(value)
        ));
        self
    }

    pub fn number(&mut self, name: &str, value: f64, units: &str) -> &mut Self {
        self.out.push_str(&format!(
            "  <property name=\"{}\" value=\"{}\" units=\"{}\" />\n",
            escape(name),
            value,
            escape(units)
        ));
        self
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</BehavePlus>\n");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::StandardUnits;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<BehavePlus type="FuelModel">
  <property name="appDescription" value="Short grass &amp; litter" />
  <property name="vSurfaceFuelBedDepth" value="12" units="in" />
  <property name="vSurfaceFuelLoadDead1" value="1.0" units="tons/ac" />
  <property name="vSurfaceFuelBedModelNumber" value="14" />
  <property name="vUnknownField" value="ignored" />
</BehavePlus>
"#;

    #[test]
    fn parses_fields_and_description() {
        let raw = RawRecord::parse(SAMPLE).unwrap();
        assert_eq!(raw.len(), 5);
        assert_eq!(raw.description(), "Short grass & litter");
        assert!(raw.contains("vUnknownField"));
    }

    #[test]
    fn numbers_convert_to_native_units() {
        let units = StandardUnits::new();
        let raw = RawRecord::parse(SAMPLE).unwrap();
        let depth = raw.number("vSurfaceFuelBedDepth", "ft", &units).unwrap();
        assert!((depth - 1.0).abs() < 1e-12);
        let load = raw.number("vSurfaceFuelLoadDead1", "lb/ft2", &units).unwrap();
        assert!((load - 2000.0 / 43560.0).abs() < 1e-12);
        assert_eq!(raw.optional_u32("vSurfaceFuelBedModelNumber").unwrap(), Some(14));
    }

    #[test]
    fn missing_and_bad_fields() {
        let units = StandardUnits::new();
        let raw = RawRecord::parse(SAMPLE).unwrap();
        assert!(matches!(
            raw.number("vSurfaceFuelSavrDead1", "ft2/ft3", &units),
            Err(RecordError::MissingField("vSurfaceFuelSavrDead1"))
        ));
        assert!(matches!(
            raw.number("vSurfaceFuelBedDepth", "ft2/ft3", &units),
            Err(RecordError::Units { .. })
        ));

        let raw = RawRecord::parse(r#"<property name="x" value="abc" units="ft" />"#).unwrap();
        assert!(matches!(
            raw.number("x", "ft", &units),
            Err(RecordError::NotANumber { .. })
        ));
        let raw = RawRecord::parse(r#"<property name="x" value="3" />"#).unwrap();
        assert!(matches!(
            raw.number("x", "ft", &units),
            Err(RecordError::MissingUnits { .. })
        ));
    }

    #[test]
    fn field_without_value_is_rejected_with_line() {
        let err = RawRecord::parse("<BehavePlus>\n<property name=\"x\" />\n").unwrap_err();
        assert!(matches!(err, RecordError::MissingValue { line: 2, .. }));
    }

    #[test]
    fn code_prefers_code_field_over_default() {
        let raw = RawRecord::parse(r#"<property name="code" value=" GR9 " />"#).unwrap();
        assert_eq!(record_code(&raw, "code", "file").unwrap(), "GR9");
        let raw = RawRecord::parse(r#"<property name="code" value="" />"#).unwrap();
        assert_eq!(record_code(&raw, "code", "file").unwrap(), "file");
        assert!(matches!(
            record_code(&raw, "code", ""),
            Err(RecordError::NoCode)
        ));
        assert_eq!(code_from_path(Path::new("/a/b/Custom14.bpf")), "Custom14");
    }

    #[test]
    fn writer_output_reads_back() {
        let mut w = RecordWriter::new("FuelModel");
        w.text(DESCRIPTION_FIELD, "a < b")
            .number("vSurfaceFuelBedDepth", 2.5, "ft");
        let text = w.finish();
        let raw = RawRecord::parse(&text).unwrap();
        assert_eq!(raw.description(), "a < b");
        assert_eq!(
            raw.number("vSurfaceFuelBedDepth", "ft", &StandardUnits::new())
                .unwrap(),
            2.5
        );
    }
}
