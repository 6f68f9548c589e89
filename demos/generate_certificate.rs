//! Generate a single certificate from the configured template
//! Run with: cargo run --example generate_certificate

use certificate::{
    load_or_default, CertificateRequest, Compositor, Config, FontRegistry, JsonFileStore,
};
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Certificate Generation ===\n");

    let config = Config::from_env();

    let registry = FontRegistry::load(&config.font_dir);
    println!("1. Custom fonts loaded: {}", registry.loaded_count());

    let store = JsonFileStore::new(&config.positions_path);
    let positions = load_or_default(&store)?;
    println!("2. Positions ready: {}", store.path().display());

    let request = CertificateRequest {
        user_name: "Jane Doe".to_string(),
        certificate_id: "CERT-0042".to_string(),
        course_duration: "40 hours".to_string(),
    };

    let compositor = Compositor::new(&registry, &positions);
    fs::create_dir_all("output")?;
    compositor.compose_to_file(
        config.template_pdf_path(),
        &request,
        "output/certificate.pdf",
    )?;
    println!("3. Wrote output/certificate.pdf");

    Ok(())
}
