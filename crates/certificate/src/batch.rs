//! Batch certificate generation

use std::io::{Cursor, Write};
use std::path::Path;

use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::compose::Compositor;
use crate::placement::CertificateRequest;
use crate::{CertError, Result};

/// Generate one certificate per row and package them into a zip archive
///
/// The template is read once and shared read-only by every row. The first
/// failing row aborts the whole batch; no partial archive is returned.
///
/// # Arguments
/// * `rows` - One request per certificate
/// * `compositor` - Shared registry and positions
/// * `template` - Path to the template PDF
///
/// # Returns
/// The zip archive as bytes, one `certificate_<uuid>.pdf` entry per row
pub fn generate_batch<P: AsRef<Path>>(
    rows: &[CertificateRequest],
    compositor: &Compositor<'_>,
    template: P,
) -> Result<Vec<u8>> {
    let template = template.as_ref();
    let template_bytes = std::fs::read(template)
        .map_err(|_| CertError::AssetNotFound(template.display().to_string()))?;

    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = SimpleFileOptions::default().unix_permissions(0o644);

        for (row, request) in rows.iter().enumerate() {
            let pdf = compositor
                .compose_from_bytes(&template_bytes, request)
                .map_err(|e| CertError::BatchRow {
                    row,
                    source: Box::new(e),
                })?;

            // Random entry names cannot collide across rows or batches
            let entry_name = format!("certificate_{}.pdf", Uuid::new_v4());
            zip.start_file(entry_name, options)?;
            zip.write_all(&pdf)?;
        }

        zip.finish()?;
    }

    tracing::debug!(rows = rows.len(), "batch archive assembled");
    Ok(zip_data)
}
