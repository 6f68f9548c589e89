//! Low-level PDF composition on top of existing documents
//!
//! Templates are opened as-is; text runs and line strokes are drawn over
//! the existing page content at absolute positions. Fonts are either the
//! fourteen built-in standard fonts (referenced by name, with bundled
//! metrics for measurement) or TrueType fonts embedded whole as
//! Type0/CIDFontType2. A document can also be trimmed down to its first
//! page before saving.
//!
//! Coordinates are PDF user space: origin at the bottom-left of the page,
//! y growing upward, units in points.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, BuiltinFont, PdfDocument};
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! doc.add_builtin_font(BuiltinFont::Helvetica);
//! doc.set_font("Helvetica", 46.0)?;
//! doc.insert_text("Jane Doe", 1, 396.0, 397.5, Align::Center)?;
//! doc.keep_first_page()?;
//! doc.save("certificate.pdf")?;
//! ```

mod base14;
mod document;
mod font;
mod text;

pub use base14::BuiltinFont;
pub use document::PdfDocument;
pub use font::FontData;
pub use text::{
    encode_text_literal, generate_line_operators, generate_text_operators, TextRenderContext,
};

use thiserror::Error;

/// Errors from opening, editing or saving a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Could not open PDF: {0}")]
    OpenError(String),

    #[error("Could not save PDF: {0}")]
    SaveError(String),

    #[error("No font registered as '{0}'")]
    FontNotFound(String),

    #[error("A font is already registered as '{0}'")]
    FontAlreadyExists(String),

    #[error("Could not parse font: {0}")]
    FontParseError(String),

    #[error("Page {0} does not exist (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Malformed PDF structure: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Placement of a text run relative to its anchor x coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }
}
