//! Integration tests for certificate composition and batch generation
//!
//! Template fixtures are built in memory with lopdf and registries run
//! against an empty or nonexistent font directory, so no binary assets
//! are required.

use std::io::{Cursor, Read};

use lopdf::{dictionary, Object, Stream};
use pdf_core::BuiltinFont;
use pretty_assertions::assert_eq;

use certificate::coords::{
    LETTER_LANDSCAPE_HEIGHT, LETTER_LANDSCAPE_WIDTH, REFERENCE_HEIGHT, REFERENCE_WIDTH,
};
use certificate::{
    generate_batch, map_to_page, CertError, CertField, CertificateRequest, Compositor,
    FontRegistry, Placement, PositionSet,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Build a landscape letter template PDF with the given page count
fn create_template_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Count" => page_count as i32,
        "Kids" => vec![], // Will be updated below
    }));

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, vec![])));

        let page_id = doc.add_object(Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 792.0.into(), 612.0.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        }));
        page_ids.push(page_id);
    }

    let mut pages_dict = doc.get_object(pages_id).unwrap().as_dict().unwrap().clone();
    pages_dict.set(
        "Kids",
        Object::Array(page_ids.into_iter().map(|id| id.into()).collect()),
    );
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Registry with an empty manifest: every style resolves to the default font
fn permissive_registry() -> FontRegistry {
    FontRegistry::from_manifest("/nonexistent", &[])
}

/// Registry with the full manifest but no assets: manifest styles degrade
fn degraded_registry() -> FontRegistry {
    FontRegistry::load("/nonexistent")
}

fn request() -> CertificateRequest {
    CertificateRequest {
        user_name: "Jane Doe".to_string(),
        certificate_id: "CERT-0042".to_string(),
        course_duration: "40 hours".to_string(),
    }
}

/// Decoded first-page content stream of a saved PDF
fn first_page_content(pdf_data: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(pdf_data).expect("Failed to parse output PDF");
    let pages = doc.get_pages();
    let page_id = *pages.get(&1).expect("Output has no first page");
    let content = doc
        .get_page_content(page_id)
        .expect("Failed to read page content");
    String::from_utf8_lossy(&content).into_owned()
}

fn page_count(pdf_data: &[u8]) -> usize {
    let doc = lopdf::Document::load_mem(pdf_data).expect("Failed to parse output PDF");
    doc.get_pages().len()
}

#[test]
fn test_compose_output_is_single_page() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Failed to compose");
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn test_multi_page_template_is_trimmed() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(4), &request())
        .expect("Failed to compose");
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn test_fields_centered_on_mapped_anchor() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Failed to compose");
    let content = first_page_content(&pdf);

    // The name placement defaults to left 442, top 280, 46 pt; with an
    // empty manifest its style resolves to the default font
    let (x, y) = map_to_page(
        442.0,
        280.0,
        REFERENCE_WIDTH,
        REFERENCE_HEIGHT,
        LETTER_LANDSCAPE_WIDTH,
        LETTER_LANDSCAPE_HEIGHT,
    );
    let width = BuiltinFont::Helvetica.text_width("Jane Doe", 46.0) as f64;
    let draw_x = x - width / 2.0;

    assert!(content.contains(&format!("{} {} Td", draw_x, y)));
    assert!(content.contains("(Jane Doe) Tj"));

    // The midpoint of the drawn run is the mapped anchor
    let midpoint = (draw_x + (draw_x + width)) / 2.0;
    assert!((midpoint - x).abs() < 1e-9);
}

#[test]
fn test_underline_only_under_the_name() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Failed to compose");
    let content = first_page_content(&pdf);

    // Three fields drawn, exactly one underline stroke
    assert_eq!(content.matches(" Tj").count(), 3);
    assert_eq!(content.matches(" l\nS").count(), 1);

    let (x, y) = map_to_page(
        442.0,
        280.0,
        REFERENCE_WIDTH,
        REFERENCE_HEIGHT,
        LETTER_LANDSCAPE_WIDTH,
        LETTER_LANDSCAPE_HEIGHT,
    );
    let width = BuiltinFont::Helvetica.text_width("Jane Doe", 46.0) as f64;
    let draw_x = x - width / 2.0;

    // 2 pt below the baseline, spanning the measured width
    assert!(content.contains(&format!(
        "{} {} m\n{} {} l\nS\n",
        draw_x,
        y - 2.0,
        draw_x + width,
        y - 2.0
    )));
}

#[test]
fn test_fallback_never_fails_composition() {
    init_tracing();

    // Every default style is manifest-declared but no asset loaded
    let registry = degraded_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Degraded composition must still succeed");

    assert_eq!(page_count(&pdf), 1);
    let content = first_page_content(&pdf);
    assert_eq!(content.matches(" Tj").count(), 3);
}

#[test]
fn test_degraded_fields_render_uncentered_without_underline() {
    init_tracing();

    let registry = degraded_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Failed to compose");
    let content = first_page_content(&pdf);

    // Uncentered: the name is drawn at the mapped anchor itself
    let (x, y) = map_to_page(
        442.0,
        280.0,
        REFERENCE_WIDTH,
        REFERENCE_HEIGHT,
        LETTER_LANDSCAPE_WIDTH,
        LETTER_LANDSCAPE_HEIGHT,
    );
    assert!(content.contains(&format!("{} {} Td", x, y)));

    // No underline in degraded rendering
    assert_eq!(content.matches(" l\nS").count(), 0);
}

#[test]
fn test_unplaced_fields_are_skipped() {
    let registry = permissive_registry();
    let positions = PositionSet::new();
    let compositor = Compositor::new(&registry, &positions);

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &request())
        .expect("Failed to compose");

    assert_eq!(page_count(&pdf), 1);
    assert_eq!(first_page_content(&pdf).matches(" Tj").count(), 0);
}

#[test]
fn test_empty_request_values_compose() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let empty = CertificateRequest {
        user_name: String::new(),
        certificate_id: String::new(),
        course_duration: String::new(),
    };

    let pdf = compositor
        .compose_from_bytes(&create_template_pdf(1), &empty)
        .expect("Failed to compose");
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn test_invalid_placement_value_is_reported() {
    let registry = permissive_registry();
    let mut positions = PositionSet::new();
    positions.set(
        CertField::Name,
        Placement {
            top: "tall".to_string(),
            left: "442".to_string(),
            font_size: "46".to_string(),
            font_style: "CooperBlkBT-Italic".to_string(),
        },
    );
    let compositor = Compositor::new(&registry, &positions);

    let result = compositor.compose_from_bytes(&create_template_pdf(1), &request());
    assert!(matches!(result, Err(CertError::InvalidPlacement(_))));
}

#[test]
fn test_compose_missing_template() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let result = compositor.compose("/nonexistent/certificate-template.pdf", &request());
    match result {
        Err(CertError::AssetNotFound(path)) => {
            assert!(path.contains("certificate-template.pdf"));
        }
        other => panic!("Expected AssetNotFound, got {other:?}"),
    }
}

#[test]
fn test_compose_invalid_template_bytes() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let result = compositor.compose_from_bytes(b"not a pdf", &request());
    assert!(matches!(result, Err(CertError::AssetNotFound(_))));
}

#[test]
fn test_batch_yields_one_entry_per_row() {
    init_tracing();

    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let template_path = std::env::temp_dir().join(format!(
        "certificate-template-{}.pdf",
        uuid::Uuid::new_v4()
    ));
    std::fs::write(&template_path, create_template_pdf(2)).unwrap();

    let rows = vec![
        CertificateRequest {
            user_name: "Jane Doe".to_string(),
            certificate_id: "CERT-0001".to_string(),
            course_duration: "40 hours".to_string(),
        },
        CertificateRequest {
            user_name: "John Smith".to_string(),
            certificate_id: "CERT-0002".to_string(),
            course_duration: "40 hours".to_string(),
        },
        CertificateRequest {
            user_name: "Ada Lovelace".to_string(),
            certificate_id: "CERT-0003".to_string(),
            course_duration: "12 hours".to_string(),
        },
    ];

    let zip_bytes = generate_batch(&rows, &compositor, &template_path).expect("Batch failed");
    std::fs::remove_file(&template_path).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(&zip_bytes[..])).expect("Invalid archive");
    assert_eq!(archive.len(), 3);

    let mut names = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        assert!(name.starts_with("certificate_"), "entry name {name}");
        assert!(name.ends_with(".pdf"), "entry name {name}");
        names.push(name);

        // Every entry is a valid single-page PDF
        let mut pdf = Vec::new();
        entry.read_to_end(&mut pdf).unwrap();
        assert_eq!(page_count(&pdf), 1);

        // Entries are written in row order, each drawing its own row's name
        let content = first_page_content(&pdf);
        assert!(
            content.contains(&format!("({}) Tj", rows[i].user_name)),
            "entry {i} does not draw {}",
            rows[i].user_name
        );
    }

    names.sort();
    names.dedup();
    assert_eq!(names.len(), 3, "entry names must be distinct");
}

#[test]
fn test_batch_missing_template() {
    let registry = permissive_registry();
    let positions = PositionSet::defaults();
    let compositor = Compositor::new(&registry, &positions);

    let rows = vec![request()];
    let result = generate_batch(&rows, &compositor, "/nonexistent/certificate-template.pdf");
    assert!(matches!(result, Err(CertError::AssetNotFound(_))));
}

#[test]
fn test_batch_aborts_on_first_failing_row() {
    let registry = permissive_registry();
    let mut positions = PositionSet::new();
    positions.set(
        CertField::Name,
        Placement {
            top: "not-a-number".to_string(),
            left: "442".to_string(),
            font_size: "46".to_string(),
            font_style: "CooperBlkBT-Italic".to_string(),
        },
    );
    let compositor = Compositor::new(&registry, &positions);

    let template_path = std::env::temp_dir().join(format!(
        "certificate-template-{}.pdf",
        uuid::Uuid::new_v4()
    ));
    std::fs::write(&template_path, create_template_pdf(1)).unwrap();

    let rows = vec![request(), request()];
    let result = generate_batch(&rows, &compositor, &template_path);
    std::fs::remove_file(&template_path).unwrap();

    match result {
        Err(CertError::BatchRow { row, source }) => {
            assert_eq!(row, 0);
            assert!(matches!(*source, CertError::InvalidPlacement(_)));
        }
        other => panic!("Expected BatchRow, got {other:?}"),
    }
}
