//! Embedded TrueType font handling
//!
//! A `FontData` owns the raw font program and a parsed face, tracks which
//! characters were drawn with it, and at save time turns into the object
//! chain a Type0 font needs: CIDFontType2 descendant with Identity-H
//! encoding, per-used-glyph widths, the FontFile2 stream and a ToUnicode
//! CMap. The whole font program is embedded; there is no subsetting.

use crate::{PdfError, Result};
use lopdf::{dictionary, Dictionary, Object, Stream};
use std::collections::HashSet;

/// An embedded TrueType font
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters drawn with this font (drives the widths array and ToUnicode)
    pub used_chars: HashSet<char>,
    /// Parsed font face
    face: Option<ttf_parser::Face<'static>>,
}

/// PDF objects generated for font embedding
///
/// The dictionaries come back unlinked; the document wires the references
/// between them once each object has an id.
pub struct FontObjects {
    pub type0_font: Dictionary,
    pub cid_font: Dictionary,
    pub font_descriptor: Dictionary,
    pub font_file_stream: Stream,
    pub tounicode_stream: Stream,
}

impl FontData {
    /// Parse TTF bytes into font data
    ///
    /// The parsed face borrows the bytes for `'static`, so a copy of the
    /// buffer is leaked. Fonts are loaded once per process through the
    /// registry and shared from there, never loaded per document.
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let leaked: &'static [u8] = Box::leak(ttf_data.to_vec().into_boxed_slice());
        let face = ttf_parser::Face::parse(leaked, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: ttf_data.to_vec(),
            used_chars: HashSet::new(),
            face: Some(face),
        })
    }

    /// Record characters drawn with this font
    pub fn add_chars(&mut self, text: &str) {
        for c in text.chars() {
            self.used_chars.insert(c);
        }
    }

    /// Glyph id for a character, if the face maps it
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face
            .as_ref()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Design units per em, 1000 when no face is available
    pub fn units_per_em(&self) -> u16 {
        self.face.as_ref().map(|face| face.units_per_em()).unwrap_or(1000)
    }

    /// Typographic ascender in font units
    pub fn ascender(&self) -> i16 {
        self.face.as_ref().map(|face| face.ascender()).unwrap_or(800)
    }

    /// Typographic descender in font units
    pub fn descender(&self) -> i16 {
        self.face.as_ref().map(|face| face.descender()).unwrap_or(-200)
    }

    /// Text advance width in font units
    ///
    /// Characters without a glyph contribute nothing; without a parsed
    /// face the width is zero.
    pub fn text_width(&self, text: &str) -> u32 {
        let Some(face) = &self.face else {
            return 0;
        };

        text.chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|id| face.glyph_hor_advance(id))
            .map(u32::from)
            .sum()
    }

    /// Text advance width in points at the given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text);
        (width as f32 / self.units_per_em() as f32) * font_size
    }

    /// Encode text as hex-coded glyph ids for the `Tj` operator
    ///
    /// Identity-H maps each 16-bit code directly to a glyph id. Characters
    /// the face does not map encode as glyph 0 (.notdef).
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::from("<");
        for c in text.chars() {
            let gid = self.glyph_id(c).unwrap_or(0);
            result.push_str(&format!("{gid:04X}"));
        }
        result.push('>');
        result
    }

    /// Generate the PDF object chain for embedding this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        // CIDFontType2 metrics are expressed in a fixed 1000-unit glyph
        // space, not in the face's own design units
        let scale = 1000.0 / self.units_per_em() as f32;
        let to_glyph_space = |v: i32| -> i32 { (v as f32 * scale).round() as i32 };

        let ascent = to_glyph_space(self.ascender() as i32);
        let descent = to_glyph_space(self.descender() as i32);

        let bbox = match &self.face {
            Some(face) => {
                let r = face.global_bounding_box();
                vec![
                    to_glyph_space(r.x_min as i32).into(),
                    to_glyph_space(r.y_min as i32).into(),
                    to_glyph_space(r.x_max as i32).into(),
                    to_glyph_space(r.y_max as i32).into(),
                ]
            }
            None => vec![0.into(), descent.into(), 1000.into(), ascent.into()],
        };

        let font_file_stream = Stream::new(
            dictionary! {
                "Length1" => self.ttf_data.len() as i32,
            },
            self.ttf_data.clone(),
        );

        let font_descriptor = dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.name.clone().into_bytes()),
            "Flags" => 4,
            "FontBBox" => bbox,
            "ItalicAngle" => 0,
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => ascent,
            "StemV" => 80,
            // FontFile2 reference is wired at embed time
        };

        let cid_font = dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.name.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "CIDToGIDMap" => "Identity",
            "DW" => 1000,
            "W" => self.generate_widths_array(),
            // FontDescriptor reference is wired at embed time
        };

        let type0_font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.name.clone().into_bytes()),
            "Encoding" => "Identity-H",
            // DescendantFonts and ToUnicode references are wired at embed time
        };

        let tounicode_stream = Stream::new(
            dictionary! {
                "Type" => "CMap",
                "CMapName" => "Adobe-Identity-UCS",
            },
            self.generate_tounicode_cmap().into_bytes(),
        );

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// W array entries for every glyph drawn with this font
    ///
    /// Advances are scaled into 1000-unit glyph space and consecutive
    /// glyph id runs are grouped into `start [w ...]` entries.
    fn generate_widths_array(&self) -> Vec<Object> {
        let Some(face) = &self.face else {
            return Vec::new();
        };

        let scale = 1000.0 / self.units_per_em() as f32;

        let mut pairs: Vec<(u16, i32)> = self
            .used_chars
            .iter()
            .filter_map(|&c| face.glyph_index(c))
            .map(|id| {
                let advance = face.glyph_hor_advance(id).unwrap_or(0);
                (id.0, (advance as f32 * scale).round() as i32)
            })
            .collect();
        pairs.sort_by_key(|&(gid, _)| gid);
        pairs.dedup_by_key(|&mut (gid, _)| gid);

        group_consecutive_widths(&pairs)
    }

    /// ToUnicode CMap stream content for text extraction
    fn generate_tounicode_cmap(&self) -> String {
        let mut mappings: Vec<(u16, u32)> = self
            .used_chars
            .iter()
            .map(|&c| (self.glyph_id(c).unwrap_or(0), c as u32))
            .collect();
        mappings.sort_unstable();

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        // bfchar sections are capped at 100 entries
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, unicode) in chunk {
                cmap.push_str(&format!("<{gid:04X}> <{unicode:04X}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");
        cmap
    }
}

/// Group (glyph id, advance) pairs into W array entries
///
/// Pairs must be sorted by glyph id and free of duplicates. Each run of
/// consecutive ids becomes one `start [w ...]` entry.
fn group_consecutive_widths(pairs: &[(u16, i32)]) -> Vec<Object> {
    let mut entries: Vec<Object> = Vec::new();
    let mut i = 0;

    while i < pairs.len() {
        let start = pairs[i].0;
        let mut widths = vec![Object::Integer(pairs[i].1 as i64)];

        while i + 1 < pairs.len() && pairs[i + 1].0 == pairs[i].0 + 1 {
            i += 1;
            widths.push(Object::Integer(pairs[i].1 as i64));
        }

        entries.push(Object::Integer(start as i64));
        entries.push(Object::Array(widths));
        i += 1;
    }

    entries
}
