//! Reference-canvas to PDF page coordinate mapping
//!
//! Placements are authored in the editor against a fixed-size canvas with
//! the origin at the top-left and y growing downward. PDF user space puts
//! the origin at the bottom-left with y growing upward, so the vertical
//! axis flips during mapping.

/// Editor reference canvas width in canvas units
pub const REFERENCE_WIDTH: f64 = 1084.0;

/// Editor reference canvas height in canvas units
pub const REFERENCE_HEIGHT: f64 = 799.0;

/// Landscape US letter page width in points
pub const LETTER_LANDSCAPE_WIDTH: f64 = 792.0;

/// Landscape US letter page height in points
pub const LETTER_LANDSCAPE_HEIGHT: f64 = 612.0;

/// Map a reference-canvas point into PDF page coordinates
///
/// Scales each axis proportionally and flips y. The mapping is linear with
/// no clamping; points outside the canvas map outside the page.
pub fn map_to_page(
    ref_x: f64,
    ref_y: f64,
    ref_w: f64,
    ref_h: f64,
    page_w: f64,
    page_h: f64,
) -> (f64, f64) {
    let page_x = (ref_x / ref_w) * page_w;
    let page_y = page_h - (ref_y / ref_h) * page_h;
    (page_x, page_y)
}
