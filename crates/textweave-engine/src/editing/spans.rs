use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use crate::editing::interval::{Space, shift_range};

/// Unique identifier for an embedded object, stable across edits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectId(pub u128);

impl ObjectId {
    /// Derive an id from the insertion site and the document's edit history.
    ///
    /// The document version increments on every edit and at most one object
    /// is registered per edit, so the (version, count) pair never repeats.
    pub(crate) fn generate(at: usize, version: u64, count: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        0x0b1e_c75a_9d0c_4e11u64.hash(&mut hasher);
        at.hash(&mut hasher);
        version.hash(&mut hasher);
        count.hash(&mut hasher);
        ObjectId(hasher.finish() as u128)
    }
}

/// Kind of embedded non-text content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Image,
    Chart,
    /// Link start/end marker. Reserves one extra underlying slot next to the
    /// marker for link metadata, so its underlying range is wider than its
    /// actual range.
    LinkMarker,
}

impl ObjectKind {
    /// Width of the object in actual space. Every object counts as exactly
    /// one unit of content, however large it renders.
    pub fn actual_width(&self) -> usize {
        1
    }

    /// Width of the object in underlying (storage) space.
    pub fn underlying_width(&self) -> usize {
        match self {
            ObjectKind::Image | ObjectKind::Chart => 1,
            ObjectKind::LinkMarker => 2,
        }
    }
}

/// One embedded object's location in all three coordinate spaces.
///
/// The text range is always a zero-width point (`t..t`): objects are
/// invisible to text positions. The actual and underlying ranges are
/// half-open and at least one unit wide.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpan {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub text: Range<usize>,
    pub actual: Range<usize>,
    pub underlying: Range<usize>,
}

impl ObjectSpan {
    pub fn range_in(&self, space: Space) -> &Range<usize> {
        match space {
            Space::Text => &self.text,
            Space::Actual => &self.actual,
            Space::Underlying => &self.underlying,
        }
    }
}

/// Ordered table of every embedded object's spans.
///
/// Spans must be ordered and disjoint in all three coordinate spaces
/// simultaneously, so a single sorted `Vec` serves lookups in any space.
/// Violating that ordering is a programming error in the host application,
/// not a runtime condition; it is debug-asserted on insert.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectIndex {
    spans: Vec<ObjectSpan>,
}

/// Ordering check between two adjacent spans: disjoint and in order in
/// every space. Zero-width text points of neighbouring objects may touch.
fn ordered(before: &ObjectSpan, after: &ObjectSpan) -> bool {
    before.actual.end <= after.actual.start
        && before.text.end <= after.text.start
        && before.underlying.end <= after.underlying.start
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectSpan> {
        self.spans.iter()
    }

    pub fn get(&self, id: ObjectId) -> Option<&ObjectSpan> {
        self.spans.iter().find(|span| span.id == id)
    }

    /// Register a new span at its sorted position.
    pub fn insert(&mut self, span: ObjectSpan) {
        let idx = self
            .spans
            .partition_point(|s| s.actual.start < span.actual.start);
        if idx > 0 {
            debug_assert!(
                ordered(&self.spans[idx - 1], &span),
                "object spans must stay ordered and disjoint in every coordinate space"
            );
        }
        if idx < self.spans.len() {
            debug_assert!(
                ordered(&span, &self.spans[idx]),
                "object spans must stay ordered and disjoint in every coordinate space"
            );
        }
        self.spans.insert(idx, span);
    }

    /// The closest span whose begin in `space` is `<= pos`, if any.
    pub fn closest_before(&self, space: Space, pos: usize) -> Option<&ObjectSpan> {
        let idx = self
            .spans
            .partition_point(|span| span.range_in(space).start <= pos);
        if idx == 0 { None } else { Some(&self.spans[idx - 1]) }
    }

    /// Shift every span starting at or after `actual_from` by the given
    /// per-space deltas. Used when content is inserted or removed before
    /// those spans.
    pub fn shift_from(
        &mut self,
        actual_from: usize,
        d_text: isize,
        d_actual: isize,
        d_underlying: isize,
    ) {
        for span in self
            .spans
            .iter_mut()
            .filter(|span| span.actual.start >= actual_from)
        {
            shift_range(&mut span.text, d_text);
            shift_range(&mut span.actual, d_actual);
            shift_range(&mut span.underlying, d_underlying);
        }
    }

    /// Remove every span lying entirely within the given actual range,
    /// returning the removed spans.
    pub fn remove_within(&mut self, actual: Range<usize>) -> Vec<ObjectSpan> {
        let mut removed = Vec::new();
        self.spans.retain(|span| {
            if span.actual.start >= actual.start && span.actual.end <= actual.end {
                removed.push(span.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(id: u128, kind: ObjectKind, text: usize, actual: usize, underlying: usize) -> ObjectSpan {
        ObjectSpan {
            id: ObjectId(id),
            kind,
            text: text..text,
            actual: actual..actual + kind.actual_width(),
            underlying: underlying..underlying + kind.underlying_width(),
        }
    }

    /// "ab<IMG>cd<LINK>ef": image after "ab", link marker after "cd".
    fn sample_index() -> ObjectIndex {
        let mut index = ObjectIndex::new();
        index.insert(span(1, ObjectKind::Image, 2, 2, 2));
        index.insert(span(2, ObjectKind::LinkMarker, 4, 5, 5));
        index
    }

    #[test]
    fn test_insert_keeps_spans_sorted() {
        let mut index = ObjectIndex::new();
        index.insert(span(2, ObjectKind::LinkMarker, 4, 5, 5));
        index.insert(span(1, ObjectKind::Image, 2, 2, 2));

        let starts: Vec<usize> = index.iter().map(|s| s.actual.start).collect();
        assert_eq!(starts, vec![2, 5]);
    }

    #[test]
    fn test_closest_before_in_each_space() {
        let index = sample_index();

        // before any span
        assert!(index.closest_before(Space::Actual, 1).is_none());
        assert!(index.closest_before(Space::Text, 1).is_none());
        assert!(index.closest_before(Space::Underlying, 1).is_none());

        // between the two spans
        let mid = index.closest_before(Space::Actual, 4).unwrap();
        assert_eq!(mid.id, ObjectId(1));

        // after both spans, in every space
        assert_eq!(index.closest_before(Space::Actual, 7).unwrap().id, ObjectId(2));
        assert_eq!(index.closest_before(Space::Text, 5).unwrap().id, ObjectId(2));
        assert_eq!(
            index.closest_before(Space::Underlying, 8).unwrap().id,
            ObjectId(2)
        );
    }

    #[test]
    fn test_adjacent_text_points_are_allowed() {
        // Two objects back to back share a text point; that is not overlap.
        let mut index = ObjectIndex::new();
        index.insert(span(1, ObjectKind::Image, 2, 2, 2));
        index.insert(span(2, ObjectKind::Image, 2, 3, 3));
        assert_eq!(index.count(), 2);

        // closest_before in text space picks the later of the two
        assert_eq!(index.closest_before(Space::Text, 2).unwrap().id, ObjectId(2));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "ordered and disjoint")]
    fn test_overlapping_spans_assert_in_debug() {
        let mut index = ObjectIndex::new();
        index.insert(span(1, ObjectKind::Image, 2, 2, 2));
        // same actual slot as the image
        index.insert(span(2, ObjectKind::Chart, 2, 2, 2));
    }

    #[test]
    fn test_shift_from_moves_only_later_spans() {
        let mut index = sample_index();

        // two text characters inserted at actual position 3
        index.shift_from(3, 2, 2, 2);

        let image = index.get(ObjectId(1)).unwrap();
        assert_eq!(image.actual, 2..3, "span before the edit must not move");

        let link = index.get(ObjectId(2)).unwrap();
        assert_eq!(link.text, 6..6);
        assert_eq!(link.actual, 7..8);
        assert_eq!(link.underlying, 7..9);
    }

    #[test]
    fn test_remove_within_takes_only_enclosed_spans() {
        let mut index = sample_index();

        let removed = index.remove_within(4..6);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, ObjectId(2));
        assert_eq!(index.count(), 1);
        assert!(index.get(ObjectId(1)).is_some());
    }

    #[test]
    fn test_remove_within_ignores_spans_outside() {
        let mut index = sample_index();
        let removed = index.remove_within(3..5);
        assert!(removed.is_empty());
        assert_eq!(index.count(), 2);
    }

    #[test]
    fn test_generated_ids_differ_across_versions() {
        let a = ObjectId::generate(3, 1, 0);
        let b = ObjectId::generate(3, 2, 0);
        assert_ne!(a, b);
    }
}
