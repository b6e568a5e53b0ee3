use std::rc::Weak;

use crate::editing::bookmark::Bookmark;
use crate::editing::convert;
use crate::editing::document::{Document, EditError, Shared};
use crate::editing::spans::ObjectSpan;

/// A live, two-ended view over a span of document content.
///
/// A fragment owns two bookmarks (a leading `begin` and a trailing `end`)
/// and a non-owning back-reference to the document. Nothing is cached:
/// every read converts the current bookmark positions and queries the store
/// directly, so a fragment is automatically correct after any edit,
/// including edits made through other fragments.
///
/// When the content under the fragment is deleted, both bookmarks collapse
/// onto the start of the deleted region and the fragment degenerates to an
/// empty span; reading it yields `""`, never an error.
pub struct Fragment {
    doc: Weak<Shared>,
    begin: Bookmark,
    end: Bookmark,
}

impl Fragment {
    pub(crate) fn new(doc: Weak<Shared>, begin: Bookmark, end: Bookmark) -> Self {
        Self { doc, begin, end }
    }

    /// Current actual position of the fragment's start.
    pub fn begin(&self) -> usize {
        self.begin.pos()
    }

    /// Current actual position of the fragment's end.
    pub fn end(&self) -> usize {
        // a shrinking edit can momentarily order the bookmarks apart
        self.end.pos().max(self.begin.pos())
    }

    pub fn is_empty(&self) -> bool {
        self.begin() == self.end()
    }

    /// Text content of the spanned region.
    ///
    /// Queries the store with the two bookmark positions; cost is
    /// proportional to the fragment, never the whole document.
    pub fn text(&self) -> String {
        let Some(shared) = self.doc.upgrade() else {
            return String::new();
        };
        let state = shared.state.borrow();
        let (begin, end) = (self.begin(), self.end());
        if begin == end {
            return String::new();
        }
        let text_begin = convert::to_text(&state.objects, begin);
        let text_end = convert::to_text(&state.objects, end);
        state.text.slice_to_cow(text_begin..text_end).into_owned()
    }

    /// Replace the spanned content with new text.
    ///
    /// Runs a store-level replace and then publishes the actual-space
    /// delta, in that order; the fragment's own bookmarks re-span the new
    /// text through the same event every other observer sees.
    pub fn set_text(&self, text: &str) -> Result<(), EditError> {
        let Some(shared) = self.doc.upgrade() else {
            return Ok(());
        };
        let doc = Document::from_shared(shared);
        doc.replace(self.begin()..self.end(), text)
    }

    /// Embedded objects lying entirely inside the fragment.
    pub fn objects(&self) -> Vec<ObjectSpan> {
        let Some(shared) = self.doc.upgrade() else {
            return Vec::new();
        };
        let state = shared.state.borrow();
        let (begin, end) = (self.begin(), self.end());
        state
            .objects
            .iter()
            .filter(|span| span.actual.start >= begin && span.actual.end <= end)
            .cloned()
            .collect()
    }
}
