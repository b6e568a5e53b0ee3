//! End-to-end exercise of the position core: a document accumulates text
//! and embedded objects, bookmarks and fragments track it through edits,
//! and the three coordinate spaces stay mutually consistent throughout.

use pretty_assertions::assert_eq;
use textweave_engine::editing::{Document, ObjectKind};

#[test]
fn test_editing_session_keeps_spaces_consistent() {
    // "The chart <CHART> shows it. See <LINK>docs<LINK>."
    let doc = Document::from_text("The chart  shows it. See docs.");
    let chart = doc.insert_object(10, ObjectKind::Chart).unwrap();
    // "See " now starts at actual 22; wrap "docs" in link markers
    let open = doc.insert_object(26, ObjectKind::LinkMarker).unwrap();
    let close = doc.insert_object(31, ObjectKind::LinkMarker).unwrap();

    assert_eq!(doc.text(), "The chart  shows it. See docs.");
    assert_eq!(doc.text_len(), 30);
    assert_eq!(doc.len(), 33, "three objects add three actual units");
    assert_eq!(
        doc.underlying_len(),
        35,
        "each link marker reserves one extra underlying slot"
    );

    // every actual position that is not an object round-trips through text
    for actual in 0..=doc.len() {
        if doc.object_at(actual).is_some() {
            continue;
        }
        assert_eq!(doc.to_index_actual(doc.to_index_text(actual)), actual);
    }

    // the linked word reads back through a fragment spanning the markers
    let linked = doc.fragment(26, 32);
    assert_eq!(linked.text(), "docs");
    assert_eq!(linked.objects().len(), 2);

    // an edit far before everything shifts objects, bookmarks and the
    // fragment in lockstep
    let cursor = doc.bookmark(27);
    doc.replace(0..3, "This").unwrap();

    assert_eq!(doc.text(), "This chart  shows it. See docs.");
    assert_eq!(cursor.pos(), 28);
    assert_eq!(linked.text(), "docs");
    assert_eq!(doc.object_at(11).unwrap().id, chart);
    assert_eq!(doc.object_at(27).unwrap().id, open);
    assert_eq!(doc.object_at(32).unwrap().id, close);
}

#[test]
fn test_fragment_survives_surrounding_deletion() {
    let doc = Document::from_text("keep [interesting part] tail");
    let fragment = doc.fragment(6, 22);
    assert_eq!(fragment.text(), "interesting part");

    // deleting content before and after the fragment leaves it intact
    doc.delete(0..5).unwrap();
    assert_eq!(fragment.text(), "interesting part");
    doc.delete(18..23).unwrap();
    assert_eq!(fragment.text(), "interesting part");

    // deleting the enclosing region collapses it
    doc.delete(0..doc.len()).unwrap();
    assert_eq!(fragment.text(), "");
    assert!(fragment.is_empty());
}

#[test]
fn test_bookmarks_are_pruned_without_explicit_unsubscribe() {
    let doc = Document::from_text("0123456789");

    let keep = doc.bookmark(9);
    for _ in 0..50 {
        // transient bookmarks go out of scope immediately
        let _transient = doc.bookmark(4);
    }
    assert_eq!(doc.observer_count(), 51);

    doc.insert_text(0, "x").unwrap();

    assert_eq!(doc.observer_count(), 1);
    assert_eq!(keep.pos(), 10);
}

#[test]
fn test_object_placement_from_text_search() {
    // a text-space search hit gets translated into an actual position
    // where an object can be embedded
    let doc = Document::from_text("before target after");
    doc.insert_object(0, ObjectKind::Image).unwrap();

    let hit = doc.text().find("target").unwrap();
    let actual = doc.to_index_actual(hit);
    assert_eq!(actual, 8, "image before the hit shifts it by one");

    doc.insert_object(actual, ObjectKind::Chart).unwrap();
    assert_eq!(doc.object_at(8).unwrap().kind, ObjectKind::Chart);
    assert_eq!(doc.text(), "before target after", "text is unchanged");
}
