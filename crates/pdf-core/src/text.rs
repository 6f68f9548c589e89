//! Content stream operator generation

use crate::Align;

/// Everything needed to lay out one text run
pub struct TextRenderContext {
    /// Font resource name on the page (e.g., "F1")
    pub font_name: String,
    /// Size in points
    pub font_size: f32,
    /// Measured run width in points, used for alignment
    pub text_width: f64,
}

/// Operators for one text run (BT, Tf, Td, Tj, ET)
///
/// `text` is the already encoded payload: a hex string (`<0041>`) for
/// embedded fonts, an escaped literal (`(Hello)`) for built-ins. Center
/// and right alignment shift the start position left by half the run
/// width or the full run width.
pub fn generate_text_operators(
    text: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };
    let final_x = x + x_offset;

    format!(
        "BT\n/{} {} Tf\n{} {} Td\n{} Tj\nET\n",
        ctx.font_name, ctx.font_size, final_x, y, text
    )
    .into_bytes()
}

/// Operators for a straight line stroke between two points
pub fn generate_line_operators(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<u8> {
    format!("{x1} {y1} m\n{x2} {y2} l\nS\n").into_bytes()
}

/// Encode text as an escaped literal string for the Tj operator
///
/// Built-in fonts use single-byte WinAnsi-style encoding: characters up to
/// U+00FF map to their byte, a handful of common typographic characters map
/// to their Windows-1252 byte, anything else becomes `?`. Bytes outside the
/// printable ASCII range are written as octal escapes.
pub fn encode_text_literal(text: &str) -> String {
    let mut result = String::from("(");
    for c in text.chars() {
        let byte = match c {
            '\u{20ac}' => Some(0x80), // euro sign
            '\u{2018}' => Some(0x91), // left single quote
            '\u{2019}' => Some(0x92), // right single quote
            '\u{201c}' => Some(0x93), // left double quote
            '\u{201d}' => Some(0x94), // right double quote
            '\u{2013}' => Some(0x96), // en dash
            '\u{2014}' => Some(0x97), // em dash
            _ if (c as u32) <= 0xFF => Some(c as u32 as u8),
            _ => None,
        };
        match byte {
            Some(b @ (b'(' | b')' | b'\\')) => {
                result.push('\\');
                result.push(b as char);
            }
            Some(b @ 0x20..=0x7E) => result.push(b as char),
            Some(b) => result.push_str(&format!("\\{b:03o}")),
            None => result.push('?'),
        }
    }
    result.push(')');
    result
}
