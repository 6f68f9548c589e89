//! Certificate composition
//!
//! Overlays per-recipient text onto the first page of the certificate
//! template. Each placed field is mapped from editor coordinates into PDF
//! user space, centered horizontally on its anchor, and drawn in its
//! resolved font; the recipient name additionally gets an underline.

use std::path::Path;

use pdf_core::{Align, PdfDocument};

use crate::coords::{
    map_to_page, LETTER_LANDSCAPE_HEIGHT, LETTER_LANDSCAPE_WIDTH, REFERENCE_HEIGHT,
    REFERENCE_WIDTH,
};
use crate::placement::{CertField, CertificateRequest, Placement, PositionSet};
use crate::registry::{FontHandle, FontRegistry};
use crate::{CertError, Result};

/// Composes positioned text over the certificate template
pub struct Compositor<'a> {
    /// Resolves placement font styles
    registry: &'a FontRegistry,
    /// Field placements to draw
    positions: &'a PositionSet,
}

impl<'a> Compositor<'a> {
    pub fn new(registry: &'a FontRegistry, positions: &'a PositionSet) -> Self {
        Self {
            registry,
            positions,
        }
    }

    /// Compose a certificate from a template file
    ///
    /// # Arguments
    /// * `template` - Path to the template PDF
    /// * `request` - Values to draw
    ///
    /// # Returns
    /// The finished single-page PDF as bytes
    pub fn compose<P: AsRef<Path>>(
        &self,
        template: P,
        request: &CertificateRequest,
    ) -> Result<Vec<u8>> {
        let template = template.as_ref();
        let bytes = std::fs::read(template)
            .map_err(|_| CertError::AssetNotFound(template.display().to_string()))?;
        self.compose_from_bytes(&bytes, request)
    }

    /// Compose a certificate from template bytes
    pub fn compose_from_bytes(
        &self,
        template: &[u8],
        request: &CertificateRequest,
    ) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::open_from_bytes(template)
            .map_err(|e| CertError::AssetNotFound(format!("certificate template: {e}")))?;

        // The overlay targets the first page; the rest of the template is
        // dropped so the output always has exactly one page
        doc.keep_first_page()?;

        for field in CertField::ALL {
            let Some(placement) = self.positions.get(field) else {
                continue;
            };
            self.draw_field(&mut doc, field, placement, request)?;
        }

        tracing::debug!(certificate_id = %request.certificate_id, "certificate composed");
        Ok(doc.to_bytes()?)
    }

    /// Compose a certificate and write it to a file
    pub fn compose_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        template: P,
        request: &CertificateRequest,
        output: Q,
    ) -> Result<()> {
        let bytes = self.compose(template, request)?;
        std::fs::write(output, bytes)?;
        Ok(())
    }

    /// Draw one field onto the first page
    fn draw_field(
        &self,
        doc: &mut PdfDocument,
        field: CertField,
        placement: &Placement,
        request: &CertificateRequest,
    ) -> Result<()> {
        let left = placement.left_px()?;
        let top = placement.top_px()?;
        let font_size = placement.font_size_pt()?;
        let text = request.field_value(field);

        let (x, y) = map_to_page(
            left,
            top,
            REFERENCE_WIDTH,
            REFERENCE_HEIGHT,
            LETTER_LANDSCAPE_WIDTH,
            LETTER_LANDSCAPE_HEIGHT,
        );

        let resolved = self.registry.resolve_with_fallback(&placement.font_style);
        self.ensure_font(doc, &resolved.font)?;
        doc.set_font(resolved.font.name(), font_size)?;

        if resolved.degraded {
            // Degraded rendering: default font at the uncentered mapped
            // point, no underline, and the certificate still completes
            tracing::warn!(
                field = field.as_str(),
                style = %placement.font_style,
                "font unavailable, rendering with default font"
            );
            doc.insert_text(text, 1, x, y, Align::Left)?;
            return Ok(());
        }

        let width = doc.get_text_width(text)?;
        let draw_x = x - width / 2.0;
        doc.insert_text(text, 1, draw_x, y, Align::Left)?;

        // Only the recipient name is underlined, spanning the measured width
        if field == CertField::Name {
            doc.draw_line(1, draw_x, y - 2.0, draw_x + width, y - 2.0)?;
        }

        Ok(())
    }

    /// Register the resolved font with the document if not yet present
    fn ensure_font(&self, doc: &mut PdfDocument, font: &FontHandle<'_>) -> Result<()> {
        match font {
            FontHandle::Builtin(builtin) => doc.add_builtin_font(*builtin),
            FontHandle::Custom(font_data) => {
                if !doc.has_font(&font_data.name) {
                    doc.add_font_data((*font_data).clone())?;
                }
            }
        }
        Ok(())
    }
}
