//! Environment-based configuration

use std::path::PathBuf;

/// The certificate template PDF asset name
pub const TEMPLATE_PDF: &str = "certificate-template.pdf";

/// The position editor's preview image asset name
pub const TEMPLATE_PREVIEW: &str = "certificate-template.jpg";

/// Runtime configuration, read from the environment with defaults
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the template assets
    pub template_dir: PathBuf,
    /// Directory holding the custom font assets
    pub font_dir: PathBuf,
    /// Path of the positions JSON file
    pub positions_path: PathBuf,
}

impl Config {
    /// Read configuration from the environment
    ///
    /// Every variable has a default; nothing is required.
    pub fn from_env() -> Self {
        Self {
            template_dir: std::env::var("CERT_TEMPLATE_DIR")
                .unwrap_or_else(|_| "static/templates".to_string())
                .into(),
            font_dir: std::env::var("CERT_FONT_DIR")
                .unwrap_or_else(|_| "static/fonts".to_string())
                .into(),
            positions_path: std::env::var("CERT_POSITIONS_FILE")
                .unwrap_or_else(|_| "positions.json".to_string())
                .into(),
        }
    }

    /// Full path of the template PDF
    pub fn template_pdf_path(&self) -> PathBuf {
        self.template_dir.join(TEMPLATE_PDF)
    }

    /// Full path of the template preview image
    pub fn template_preview_path(&self) -> PathBuf {
        self.template_dir.join(TEMPLATE_PREVIEW)
    }
}
