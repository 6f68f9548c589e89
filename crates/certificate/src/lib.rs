//! Certificate composition - positioned text over a PDF template
//!
//! This crate provides:
//! - Font registry with aliasing and a universal fallback
//! - Reference-canvas to PDF page coordinate mapping
//! - Field placement storage (JSON, editor wire format)
//! - Single certificate composition
//! - Batch generation into a zip archive
//!
//! # Example
//!
//! ```ignore
//! use certificate::{
//!     load_or_default, CertificateRequest, Compositor, Config, FontRegistry, JsonFileStore,
//! };
//!
//! let config = Config::from_env();
//! let registry = FontRegistry::load(&config.font_dir);
//! let store = JsonFileStore::new(&config.positions_path);
//! let positions = load_or_default(&store)?;
//!
//! let compositor = Compositor::new(&registry, &positions);
//! let request = CertificateRequest {
//!     user_name: "Jane Doe".to_string(),
//!     certificate_id: "CERT-0042".to_string(),
//!     course_duration: "40 hours".to_string(),
//! };
//! let pdf_bytes = compositor.compose(config.template_pdf_path(), &request)?;
//! ```

pub mod batch;
pub mod compose;
pub mod config;
pub mod coords;
pub mod placement;
pub mod registry;
pub mod store;

pub use batch::generate_batch;
pub use compose::Compositor;
pub use config::Config;
pub use coords::map_to_page;
pub use placement::{CertField, CertificateRequest, Placement, PositionSet};
pub use registry::{FontHandle, FontRegistry, ResolvedFont};
pub use store::{load_or_default, save_positions, JsonFileStore, MemoryStore, PositionStore};

use thiserror::Error;

/// Errors that can occur during certificate generation
#[derive(Debug, Error)]
pub enum CertError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Font not available: {0}")]
    FontResolution(String),

    #[error("Batch row {row} failed: {source}")]
    BatchRow {
        row: usize,
        #[source]
        source: Box<CertError>,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type for certificate operations
pub type Result<T> = std::result::Result<T, CertError>;
