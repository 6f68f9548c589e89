//! Built-in standard fonts
//!
//! The fourteen Type1 fonts every PDF consumer provides without embedding.
//! Widths are the Adobe AFM values in millesimal units (1/1000 em), so a
//! character width in points is `width * size / 1000`. Oblique and italic
//! variants share their upright face's table; Courier is monospace.

use lopdf::{dictionary, Dictionary};

/// One of the fourteen standard PDF fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 14] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::HelveticaBoldOblique,
        BuiltinFont::TimesRoman,
        BuiltinFont::TimesBold,
        BuiltinFont::TimesItalic,
        BuiltinFont::TimesBoldItalic,
        BuiltinFont::Courier,
        BuiltinFont::CourierBold,
        BuiltinFont::CourierOblique,
        BuiltinFont::CourierBoldOblique,
        BuiltinFont::Symbol,
        BuiltinFont::ZapfDingbats,
    ];

    /// PostScript name used as both BaseFont and registration key
    pub fn postscript_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
            BuiltinFont::Symbol => "Symbol",
            BuiltinFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Look up a font by its exact PostScript name
    pub fn from_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .iter()
            .copied()
            .find(|f| f.postscript_name() == name)
    }

    /// Width of one character in millesimal units (unknown characters 500)
    pub fn char_width(self, c: char) -> f32 {
        match self {
            BuiltinFont::Courier
            | BuiltinFont::CourierBold
            | BuiltinFont::CourierOblique
            | BuiltinFont::CourierBoldOblique
            | BuiltinFont::Symbol
            | BuiltinFont::ZapfDingbats => 600.0,
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => helvetica_width(c),
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                helvetica_bold_width(c)
            }
            BuiltinFont::TimesRoman | BuiltinFont::TimesItalic => times_roman_width(c),
            BuiltinFont::TimesBold | BuiltinFont::TimesBoldItalic => times_bold_width(c),
        }
    }

    /// Width of a string at the given size, in points
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * size / 1000.0
    }

    /// Font dictionary referencing the standard font without a font program
    ///
    /// Text fonts get WinAnsiEncoding; Symbol and ZapfDingbats use their
    /// built-in encodings.
    pub fn font_dictionary(self) -> Dictionary {
        match self {
            BuiltinFont::Symbol | BuiltinFont::ZapfDingbats => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => self.postscript_name(),
            },
            _ => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => self.postscript_name(),
                "Encoding" => "WinAnsiEncoding",
            },
        }
    }
}

fn helvetica_width(c: char) -> f32 {
    match c {
        '\'' => 191.0,
        'i' | 'j' | 'l' => 222.0,
        '|' => 260.0,
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | '\\' | ']' | 'f' | 't' => 278.0,
        '(' | ')' | '-' | '`' | 'r' => 333.0,
        '{' | '}' => 334.0,
        '"' => 355.0,
        '*' => 389.0,
        '^' => 469.0,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        '#' | '$' | '0'..='9' | '?' | 'L' | '_' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n'
        | 'o' | 'p' | 'q' | 'u' => 556.0,
        '+' | '<' | '=' | '>' | '~' => 584.0,
        'F' | 'T' | 'Z' => 611.0,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722.0,
        'G' | 'O' | 'Q' => 778.0,
        'M' | 'm' => 833.0,
        '%' => 889.0,
        'W' => 944.0,
        '@' => 1015.0,
        _ => 500.0,
    }
}

fn helvetica_bold_width(c: char) -> f32 {
    match c {
        '\'' => 238.0,
        ' ' | ',' | '.' | '/' | '\\' | 'I' | 'i' | 'j' | 'l' => 278.0,
        '|' => 280.0,
        '!' | '(' | ')' | '-' | ':' | ';' | '[' | ']' | '`' | 'f' | 't' => 333.0,
        '*' | '{' | '}' | 'r' => 389.0,
        '"' => 474.0,
        'z' => 500.0,
        '#' | '$' | '0'..='9' | 'J' | '_' | 'a' | 'c' | 'e' | 'k' | 's' | 'v' | 'x' | 'y' => 556.0,
        '+' | '<' | '=' | '>' | '^' | '~' => 584.0,
        '?' | 'F' | 'L' | 'T' | 'Z' | 'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 611.0,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        '&' | 'A' | 'B' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722.0,
        'G' | 'O' | 'Q' | 'w' => 778.0,
        'M' => 833.0,
        '%' | 'm' => 889.0,
        'W' => 944.0,
        '@' => 975.0,
        _ => 500.0,
    }
}

fn times_roman_width(c: char) -> f32 {
    match c {
        '\'' => 180.0,
        '|' => 200.0,
        ' ' | ',' | '.' => 250.0,
        '/' | ':' | ';' | '\\' | 'i' | 'j' | 'l' | 't' => 278.0,
        '!' | '(' | ')' | '-' | 'I' | '[' | ']' | '`' | 'f' | 'r' => 333.0,
        'J' | 's' => 389.0,
        '"' => 408.0,
        '?' | 'a' | 'c' | 'e' | 'z' => 444.0,
        '^' => 469.0,
        '{' | '}' => 480.0,
        '#' | '$' | '*' | '0'..='9' | '_' | 'b' | 'd' | 'g' | 'h' | 'k' | 'n' | 'o' | 'p'
        | 'q' | 'v' | 'x' | 'y' => 500.0,
        '~' => 541.0,
        'P' | 'S' => 556.0,
        '+' | '<' | '=' | '>' => 564.0,
        'E' | 'L' | 'T' | 'Z' => 611.0,
        'B' | 'C' | 'R' => 667.0,
        'A' | 'D' | 'G' | 'H' | 'K' | 'N' | 'Q' | 'U' | 'V' | 'X' | 'Y' | 'w' => 722.0,
        '&' | 'm' => 778.0,
        '%' => 833.0,
        'M' => 889.0,
        '@' => 921.0,
        'W' => 944.0,
        _ => 500.0,
    }
}

fn times_bold_width(c: char) -> f32 {
    match c {
        '|' => 220.0,
        ' ' | ',' | '.' => 250.0,
        '\'' | '/' | '\\' | 'i' | 'l' => 278.0,
        '!' | '(' | ')' | '-' | ':' | ';' | '[' | ']' | '`' | 'f' | 'j' | 't' => 333.0,
        'I' | 's' => 389.0,
        '{' | '}' => 394.0,
        'c' | 'e' | 'r' | 'z' => 444.0,
        '#' | '$' | '*' | '0'..='9' | '?' | 'J' | '_' | 'a' | 'g' | 'o' | 'v' | 'x' | 'y' => 500.0,
        '~' => 520.0,
        '"' => 555.0,
        'S' | 'b' | 'd' | 'h' | 'k' | 'n' | 'p' | 'q' | 'u' => 556.0,
        '+' | '<' | '=' | '>' => 570.0,
        '^' => 581.0,
        'F' | 'P' => 611.0,
        'B' | 'E' | 'L' | 'T' | 'Z' => 667.0,
        'A' | 'C' | 'D' | 'N' | 'R' | 'U' | 'V' | 'X' | 'Y' | 'w' => 722.0,
        'G' | 'H' | 'K' | 'O' | 'Q' => 778.0,
        '&' | 'm' => 833.0,
        '@' => 930.0,
        'M' => 944.0,
        '%' | 'W' => 1000.0,
        _ => 500.0,
    }
}
