//! Field placement schema and built-in defaults
//!
//! Placements arrive from the position editor as JSON. Attribute values are
//! kept verbatim as strings; the editor variously sends numbers, numeric
//! strings, and CSS-flavored values with a `px` suffix, so numeric access
//! goes through parsing accessors instead of typed fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CertError, Result};

/// The closed set of placeable certificate fields, in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertField {
    /// Recipient name (drawn underlined)
    Name,

    /// Certificate identifier
    CertificateId,

    /// Course duration text
    CourseDuration,
}

impl CertField {
    /// All fields in drawing order
    pub const ALL: [CertField; 3] = [
        CertField::Name,
        CertField::CertificateId,
        CertField::CourseDuration,
    ];

    /// The field's key in stored position JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            CertField::Name => "name",
            CertField::CertificateId => "certificate_id",
            CertField::CourseDuration => "course_duration",
        }
    }
}

/// One field's stored placement, values kept as the editor sent them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    /// Distance from the top of the reference canvas
    #[serde(default = "default_offset")]
    #[serde(deserialize_with = "de_dimension")]
    pub top: String,

    /// Distance from the left of the reference canvas
    #[serde(default = "default_offset")]
    #[serde(deserialize_with = "de_dimension")]
    pub left: String,

    /// Font size in points
    #[serde(rename = "fontSize")]
    #[serde(default = "default_font_size")]
    #[serde(deserialize_with = "de_dimension")]
    pub font_size: String,

    /// Font style name as authored in the editor
    #[serde(rename = "fontStyle")]
    #[serde(default = "default_font_style")]
    pub font_style: String,
}

fn default_offset() -> String {
    "0".to_string()
}

fn default_font_size() -> String {
    "16".to_string()
}

fn default_font_style() -> String {
    "CooperBlkBT-Italic".to_string()
}

/// Accept a dimension as either a JSON string or a JSON number
fn de_dimension<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Dimension {
        Text(String),
        Number(f64),
    }

    Ok(match Dimension::deserialize(deserializer)? {
        Dimension::Text(s) => s,
        Dimension::Number(n) => n.to_string(),
    })
}

fn strip_px(value: &str) -> String {
    value.trim().trim_end_matches("px").trim().to_string()
}

fn parse_dimension(attr: &str, value: &str) -> Result<f64> {
    strip_px(value).parse::<f64>().map_err(|_| {
        CertError::InvalidPlacement(format!("{attr} value {value:?} is not numeric"))
    })
}

impl Placement {
    /// Parsed top offset in reference-canvas units
    pub fn top_px(&self) -> Result<f64> {
        parse_dimension("top", &self.top)
    }

    /// Parsed left offset in reference-canvas units
    pub fn left_px(&self) -> Result<f64> {
        parse_dimension("left", &self.left)
    }

    /// Parsed font size in points
    pub fn font_size_pt(&self) -> Result<f32> {
        Ok(parse_dimension("fontSize", &self.font_size)? as f32)
    }

    /// Copy with unit suffixes stripped from all numeric attributes
    pub fn normalized(&self) -> Placement {
        Placement {
            top: strip_px(&self.top),
            left: strip_px(&self.left),
            font_size: strip_px(&self.font_size),
            font_style: self.font_style.clone(),
        }
    }
}

/// Stored placements for all fields, keyed by field name
///
/// Keys outside the `CertField` set are preserved untouched through load
/// and save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PositionSet(HashMap<String, Placement>);

impl PositionSet {
    /// Empty set
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// The built-in editor defaults for all three fields
    pub fn defaults() -> Self {
        let mut set = Self::new();
        set.set(
            CertField::Name,
            Placement {
                top: "280".to_string(),
                left: "442".to_string(),
                font_size: "46".to_string(),
                font_style: "CooperBlkBT-Italic".to_string(),
            },
        );
        set.set(
            CertField::CertificateId,
            Placement {
                top: "600".to_string(),
                left: "160".to_string(),
                font_size: "16".to_string(),
                font_style: "CooperBlkBT-Italic".to_string(),
            },
        );
        set.set(
            CertField::CourseDuration,
            Placement {
                top: "600".to_string(),
                left: "850".to_string(),
                font_size: "16".to_string(),
                font_style: "CooperLtBT-Italic".to_string(),
            },
        );
        set
    }

    /// Placement for a field, if stored
    pub fn get(&self, field: CertField) -> Option<&Placement> {
        self.0.get(field.as_str())
    }

    /// Insert or replace a field's placement
    pub fn set(&mut self, field: CertField, placement: Placement) {
        self.0.insert(field.as_str().to_string(), placement);
    }

    /// Copy with every placement normalized (unit suffixes stripped)
    pub fn normalized(&self) -> PositionSet {
        PositionSet(
            self.0
                .iter()
                .map(|(key, placement)| (key.clone(), placement.normalized()))
                .collect(),
        )
    }

    /// Strip unit suffixes from every fontSize, leaving other attributes
    /// as stored
    pub fn strip_font_size_units(&mut self) {
        for placement in self.0.values_mut() {
            placement.font_size = strip_px(&placement.font_size);
        }
    }
}

/// Input values for one certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateRequest {
    /// Recipient name
    pub user_name: String,

    /// Certificate identifier
    pub certificate_id: String,

    /// Course duration text
    pub course_duration: String,
}

impl CertificateRequest {
    /// The text drawn for a given field
    pub fn field_value(&self, field: CertField) -> &str {
        match field {
            CertField::Name => &self.user_name,
            CertField::CertificateId => &self.certificate_id,
            CertField::CourseDuration => &self.course_duration,
        }
    }
}
