//! Font registry with aliasing and a universal fallback

use std::collections::{HashMap, HashSet};
use std::path::Path;

use pdf_core::{BuiltinFont, FontData};

use crate::{CertError, Result};

/// Fixed manifest of custom font assets, logical name to filename
pub const FONT_MANIFEST: [(&str, &str); 7] = [
    ("CooperBlkBT-Italic", "CooperBlkBT-Italic.ttf"),
    ("CooperBlkBT-Regular", "CooperBlkBT-Regular.ttf"),
    ("CooperLtBT-Bold", "CooperLtBT-Bold.ttf"),
    ("CooperLtBT-BoldItalic", "CooperLtBT-BoldItalic.ttf"),
    ("CooperLtBT-Italic", "CooperLtBT-Italic.ttf"),
    ("CooperLtBT-Regular", "CooperLtBT-Regular.ttf"),
    ("CooperMdBT-Regular", "CooperMdBT-Regular.ttf"),
];

/// Browser family names served by built-in standard fonts
const FONT_ALIASES: [(&str, BuiltinFont); 2] = [
    ("Arial", BuiltinFont::Helvetica),
    ("Times New Roman", BuiltinFont::TimesRoman),
];

/// The font every failed or unknown resolution lands on
pub const DEFAULT_FONT: BuiltinFont = BuiltinFont::Helvetica;

/// A font resolution result
///
/// Either a built-in standard font (metrics compiled in, no asset needed)
/// or a custom font borrowed from the registry.
#[derive(Debug, Clone, Copy)]
pub enum FontHandle<'a> {
    Builtin(BuiltinFont),
    Custom(&'a FontData),
}

impl FontHandle<'_> {
    /// The name the handle is registered and drawn under
    pub fn name(&self) -> &str {
        match self {
            FontHandle::Builtin(builtin) => builtin.postscript_name(),
            FontHandle::Custom(font) => &font.name,
        }
    }

    /// Text width in points at the given size
    pub fn text_width(&self, text: &str, size: f32) -> f64 {
        match self {
            FontHandle::Builtin(builtin) => builtin.text_width(text, size) as f64,
            FontHandle::Custom(font) => font.text_width_points(text, size) as f64,
        }
    }
}

/// A handle plus whether fallback degraded the resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFont<'a> {
    pub font: FontHandle<'a>,
    pub degraded: bool,
}

/// Custom font store, immutable once constructed
pub struct FontRegistry {
    /// Successfully loaded custom fonts by logical name
    fonts: HashMap<String, FontData>,
    /// Every name the manifest declares, loaded or not
    declared: HashSet<String>,
}

impl FontRegistry {
    /// Load the full manifest from a font directory
    ///
    /// A missing or unparsable asset is logged and skipped; construction
    /// never fails.
    pub fn load<P: AsRef<Path>>(font_dir: P) -> Self {
        Self::from_manifest(font_dir, &FONT_MANIFEST)
    }

    /// Load a caller-supplied manifest
    ///
    /// Test registries use a reduced or empty manifest so no font assets
    /// are required.
    pub fn from_manifest<P: AsRef<Path>>(font_dir: P, manifest: &[(&str, &str)]) -> Self {
        let font_dir = font_dir.as_ref();
        let mut fonts = HashMap::new();
        let mut declared = HashSet::new();

        for &(name, filename) in manifest {
            declared.insert(name.to_string());

            let path = font_dir.join(filename);
            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        font = name,
                        path = %path.display(),
                        error = %e,
                        "font asset unavailable, skipping"
                    );
                    continue;
                }
            };

            match FontData::from_ttf(name, &data) {
                Ok(font) => {
                    tracing::debug!(font = name, "font registered");
                    fonts.insert(name.to_string(), font);
                }
                Err(e) => {
                    tracing::warn!(font = name, error = %e, "font asset unparsable, skipping");
                }
            }
        }

        Self { fonts, declared }
    }

    /// Number of successfully loaded custom fonts
    pub fn loaded_count(&self) -> usize {
        self.fonts.len()
    }

    /// Resolve a style name to a drawable font
    ///
    /// Surrounding quotes and whitespace are stripped first. The single
    /// failure mode is a manifest-declared font whose asset never loaded;
    /// aliases map to built-ins and every unknown name resolves to the
    /// default font.
    pub fn resolve(&self, style: &str) -> Result<FontHandle<'_>> {
        let name = style.trim().trim_matches(|c| c == '\'' || c == '"').trim();

        for &(alias, builtin) in &FONT_ALIASES {
            if name == alias {
                return Ok(FontHandle::Builtin(builtin));
            }
        }

        if let Some(font) = self.fonts.get(name) {
            return Ok(FontHandle::Custom(font));
        }

        if self.declared.contains(name) {
            return Err(CertError::FontResolution(name.to_string()));
        }

        Ok(FontHandle::Builtin(DEFAULT_FONT))
    }

    /// Resolve, degrading to the default font instead of failing
    pub fn resolve_with_fallback(&self, style: &str) -> ResolvedFont<'_> {
        match self.resolve(style) {
            Ok(font) => ResolvedFont {
                font,
                degraded: false,
            },
            Err(_) => ResolvedFont {
                font: FontHandle::Builtin(DEFAULT_FONT),
                degraded: true,
            },
        }
    }
}
