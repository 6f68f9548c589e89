//! Generate a batch of certificates into a zip archive
//! Run with: cargo run --example generate_batch

use certificate::{
    generate_batch, load_or_default, CertificateRequest, Compositor, Config, FontRegistry,
    JsonFileStore,
};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Batch Certificate Generation ===\n");

    let config = Config::from_env();

    let registry = FontRegistry::load(&config.font_dir);
    println!("1. Custom fonts loaded: {}", registry.loaded_count());

    let store = JsonFileStore::new(&config.positions_path);
    let positions = load_or_default(&store)?;
    println!("2. Positions ready");

    let rows: Vec<CertificateRequest> = (1..=5)
        .map(|i| CertificateRequest {
            user_name: format!("Recipient {i}"),
            certificate_id: format!("CERT-{i:04}"),
            course_duration: "40 hours".to_string(),
        })
        .collect();

    let compositor = Compositor::new(&registry, &positions);
    let archive = generate_batch(&rows, &compositor, config.template_pdf_path())?;
    println!("3. Archive: {} bytes for {} rows", archive.len(), rows.len());

    fs::create_dir_all("output")?;
    fs::write("output/certificates.zip", &archive)?;
    println!("4. Wrote output/certificates.zip");

    Ok(())
}
