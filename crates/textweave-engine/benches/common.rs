// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn document_with_objects(
    words: usize,
    every: usize,
) -> textweave_engine::editing::Document {
    use textweave_engine::editing::{Document, ObjectKind};

    let text = "lorem ".repeat(words);
    let doc = Document::from_text(&text);

    // scatter alternating images and link markers through the text
    let mut at = 0;
    let mut n = 0;
    while at < doc.len() {
        let kind = if n % 2 == 0 {
            ObjectKind::Image
        } else {
            ObjectKind::LinkMarker
        };
        doc.insert_object(at, kind).unwrap();
        at += every + 1;
        n += 1;
    }
    doc
}
