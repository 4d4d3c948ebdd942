//! In-memory PDFs for tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

/// Text drawn on physical page `page` (1-based), unique per page.
pub fn page_marker(page: usize) -> String {
    format!("Marker-{:04}", page)
}

pub fn sample_pdf(num_pages: usize) -> Vec<u8> {
    save(build(num_pages, None))
}

/// Page `broken_page` (1-based) points at a content stream that doesn't exist
pub fn sample_pdf_with_missing_contents(num_pages: usize, broken_page: usize) -> Vec<u8> {
    save(build(num_pages, Some(broken_page)))
}

/// A catalog-level metadata stream of `payload_len` bytes plus an info dictionary
pub fn sample_pdf_with_metadata(num_pages: usize, payload_len: usize) -> Vec<u8> {
    let mut doc = build(num_pages, None);
    let metadata_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        vec![b'x'; payload_len],
    ));
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Catalog Extras"),
    });
    doc.trailer.set("Info", Object::Reference(info_id));

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("root");
    doc.get_dictionary_mut(root_id)
        .expect("catalog")
        .set("Metadata", metadata_id);
    save(doc)
}

pub fn sample_pdf_with_info(num_pages: usize, title: &str, author: &str) -> Vec<u8> {
    let mut doc = build(num_pages, None);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Author" => Object::string_literal(author),
    });
    doc.trailer.set("Info", Object::Reference(info_id));
    save(doc)
}

fn build(num_pages: usize, broken_page: Option<usize>) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids = Vec::new();
    for page in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        page_marker(page).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = if broken_page == Some(page) {
            doc.new_object_id()
        } else {
            doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().expect("encode content"),
            ))
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    // MediaBox and Resources are inherited from the page tree root
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => num_pages as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save fixture");
    buffer
}
