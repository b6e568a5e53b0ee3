use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use xi_rope::Rope;

use crate::editing::bookmark::{Bias, Bookmark};
use crate::editing::bus::{ChangeBus, LengthObserver};
use crate::editing::convert;
use crate::editing::fragment::Fragment;
use crate::editing::interval::{ClosedRange, Space};
use crate::editing::spans::{ObjectId, ObjectIndex, ObjectKind, ObjectSpan};

/// Recoverable contract errors raised by document edit operations.
///
/// Everything else in this core is infallible: conversions pass positions
/// through, stale subscribers are pruned silently, and span-ordering
/// violations are debug-asserted programming errors rather than values of
/// this type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("position {pos} is outside the document (length {len})")]
    OutOfBounds { pos: usize, len: usize },
    #[error("{start}..{end} is not a valid range in a document of length {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("edit boundary at {pos} would split an embedded object")]
    SplitsObject { pos: usize },
}

/// Rich-text document: a text store plus an index of embedded non-text
/// objects, addressed through three coordinate spaces.
///
/// ## Coordinate spaces
///
/// - **actual**: the canonical space; every text character and every
///   embedded object counts as one unit. All public positions are actual
///   positions unless stated otherwise.
/// - **text**: counts text only; objects are zero-width. Text positions
///   are byte offsets into the rope buffer.
/// - **underlying**: the storage space; some object kinds reserve extra
///   slots here (see [`ObjectKind::underlying_width`]).
///
/// ## Edit loop
///
/// Every mutation goes through [`insert_text`], [`insert_object`],
/// [`delete`] or [`replace`]: the rope and object index are updated first,
/// then the affected closed interval and signed length delta are published
/// on the internal change bus. Bookmarks and fragments reposition
/// themselves in response; external observers can watch the same stream
/// via [`on_length_change`].
///
/// The document is a cheap-to-clone handle: clones share the same state.
/// It is single-threaded; all edits and publishes happen synchronously on
/// the calling thread.
///
/// [`insert_text`]: Document::insert_text
/// [`insert_object`]: Document::insert_object
/// [`delete`]: Document::delete
/// [`replace`]: Document::replace
/// [`on_length_change`]: Document::on_length_change
pub struct Document {
    shared: Rc<Shared>,
}

pub(crate) struct Shared {
    pub(crate) state: RefCell<State>,
    pub(crate) bus: ChangeBus,
}

pub(crate) struct State {
    /// Text-space content. Byte offsets into this rope are text positions.
    pub(crate) text: Rope,
    /// Every embedded object's spans in all three spaces.
    pub(crate) objects: ObjectIndex,
    /// Actual-space length of the whole document.
    pub(crate) len: usize,
    /// Incremented on each edit (enables change detection).
    pub(crate) version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a document holding the given text and no embedded objects.
    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(State {
                    text: buffer,
                    objects: ObjectIndex::new(),
                    len,
                    version: 0,
                }),
                bus: ChangeBus::new(),
            }),
        }
    }

    /// Create a document from raw bytes, ensuring valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub(crate) fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    pub(crate) fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }

    // ---- queries ------------------------------------------------------

    /// Full text content (text space; objects contribute nothing).
    pub fn text(&self) -> String {
        self.shared.state.borrow().text.to_string()
    }

    /// Actual-space length of the document.
    pub fn len(&self) -> usize {
        self.shared.state.borrow().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text-space length (byte length of the text content).
    pub fn text_len(&self) -> usize {
        self.shared.state.borrow().text.len()
    }

    /// Underlying-space length, including slots reserved by objects.
    pub fn underlying_len(&self) -> usize {
        let state = self.shared.state.borrow();
        convert::to_underlying(&state.objects, state.len, true)
    }

    /// Current edit version.
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// The object occupying the given actual position, if any.
    pub fn object_at(&self, actual_pos: usize) -> Option<ObjectSpan> {
        let state = self.shared.state.borrow();
        state
            .objects
            .closest_before(Space::Actual, actual_pos)
            .filter(|span| actual_pos < span.actual.end)
            .cloned()
    }

    /// Snapshot of every embedded object's spans, in document order.
    pub fn objects(&self) -> Vec<ObjectSpan> {
        self.shared.state.borrow().objects.iter().cloned().collect()
    }

    /// Number of registered length-change subscribers (bookmarks included);
    /// dead entries count until the next publish prunes them.
    pub fn observer_count(&self) -> usize {
        self.shared.bus.subscriber_count()
    }

    // ---- coordinate conversions ---------------------------------------

    /// Convert a text position to actual space.
    pub fn to_index_actual(&self, text_pos: usize) -> usize {
        let state = self.shared.state.borrow();
        convert::to_actual(&state.objects, text_pos)
    }

    /// Convert an actual position to text space.
    pub fn to_index_text(&self, actual_pos: usize) -> usize {
        let state = self.shared.state.borrow();
        convert::to_text(&state.objects, actual_pos)
    }

    /// Convert an actual position to underlying space. `prefer_start`
    /// breaks the tie when the position sits on an object that reserves a
    /// whole range of underlying slots.
    pub fn to_underlying(&self, actual_pos: usize, prefer_start: bool) -> usize {
        let state = self.shared.state.borrow();
        convert::to_underlying(&state.objects, actual_pos, prefer_start)
    }

    /// Convert an underlying position back to actual space.
    pub fn from_underlying(&self, underlying_pos: usize, prefer_start: bool) -> usize {
        let state = self.shared.state.borrow();
        convert::from_underlying(&state.objects, underlying_pos, prefer_start)
    }

    // ---- factories ----------------------------------------------------

    /// Create a bookmark at the given actual position.
    ///
    /// The document is the only legitimate creator of bookmarks; it wires
    /// the bookmark into the change bus by weak reference, so the returned
    /// handle is the bookmark's only owner.
    pub fn bookmark(&self, actual_pos: usize) -> Bookmark {
        self.bookmark_with_bias(actual_pos, Bias::Leading)
    }

    pub fn bookmark_with_bias(&self, actual_pos: usize, bias: Bias) -> Bookmark {
        debug_assert!(actual_pos <= self.len(), "bookmark past end of document");
        let bookmark = Bookmark::new(actual_pos, bias);
        self.shared.bus.subscribe(bookmark.observer());
        bookmark
    }

    /// Create a live fragment over `begin..end` (actual positions).
    pub fn fragment(&self, begin: usize, end: usize) -> Fragment {
        debug_assert!(begin <= end, "fragment must have begin <= end");
        Fragment::new(
            Rc::downgrade(&self.shared),
            self.bookmark(begin),
            self.bookmark_with_bias(end, Bias::Trailing),
        )
    }

    /// Subscribe an external observer to length-change events.
    ///
    /// The bus keeps only a weak reference: the caller retains ownership
    /// and dropping the observer unsubscribes it.
    pub fn on_length_change(&self, observer: &Rc<impl LengthObserver + 'static>) {
        let observer: Rc<dyn LengthObserver> = observer.clone();
        self.shared.bus.subscribe(Rc::downgrade(&observer));
    }

    // ---- edits --------------------------------------------------------

    /// Insert text at an actual position.
    pub fn insert_text(&self, at: usize, text: &str) -> Result<(), EditError> {
        if text.is_empty() {
            return Ok(());
        }
        {
            let mut state = self.shared.state.borrow_mut();
            if at > state.len {
                return Err(EditError::OutOfBounds { pos: at, len: state.len });
            }
            check_boundary(&state.objects, at)?;

            let text_at = convert::to_text(&state.objects, at);
            let n = text.len();
            state.text.edit(text_at..text_at, text);
            state.objects.shift_from(at, n as isize, n as isize, n as isize);
            state.len += n;
            state.version += 1;
        }
        // publish only after the store mutation so observers that re-query
        // the document see the updated content
        self.shared
            .bus
            .publish(ClosedRange::point(at), text.len() as isize);
        Ok(())
    }

    /// Embed a non-text object at an actual position.
    pub fn insert_object(&self, at: usize, kind: ObjectKind) -> Result<ObjectId, EditError> {
        let actual_width = kind.actual_width();
        let id = {
            let mut state = self.shared.state.borrow_mut();
            if at > state.len {
                return Err(EditError::OutOfBounds { pos: at, len: state.len });
            }
            check_boundary(&state.objects, at)?;

            let text_at = convert::to_text(&state.objects, at);
            let underlying_at = convert::to_underlying(&state.objects, at, true);
            let underlying_width = kind.underlying_width();

            state.objects.shift_from(
                at,
                0,
                actual_width as isize,
                underlying_width as isize,
            );
            let id = ObjectId::generate(at, state.version, state.objects.count());
            state.objects.insert(ObjectSpan {
                id,
                kind,
                text: text_at..text_at,
                actual: at..at + actual_width,
                underlying: underlying_at..underlying_at + underlying_width,
            });
            state.len += actual_width;
            state.version += 1;
            id
        };
        self.shared
            .bus
            .publish(ClosedRange::point(at), actual_width as isize);
        Ok(id)
    }

    /// Delete an actual-space range. Objects entirely inside the range are
    /// removed; a boundary cutting through an object is an error.
    pub fn delete(&self, range: Range<usize>) -> Result<(), EditError> {
        self.replace(range, "")
    }

    /// Replace an actual-space range with new text.
    ///
    /// An empty range inserts, empty text deletes. Objects entirely inside
    /// the range are removed. The store is mutated first, then a single
    /// event covering the replaced region is published with the net
    /// actual-space delta.
    pub fn replace(&self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        if range.start == range.end && text.is_empty() {
            return Ok(());
        }
        if range.start == range.end {
            return self.insert_text(range.start, text);
        }

        let delta = {
            let mut state = self.shared.state.borrow_mut();
            if range.start > range.end || range.end > state.len {
                return Err(EditError::InvalidRange {
                    start: range.start,
                    end: range.end,
                    len: state.len,
                });
            }
            check_boundary(&state.objects, range.start)?;
            check_boundary(&state.objects, range.end)?;

            let text_start = convert::to_text(&state.objects, range.start);
            let text_end = convert::to_text(&state.objects, range.end);
            let underlying_start = convert::to_underlying(&state.objects, range.start, true);
            let underlying_end = convert::to_underlying(&state.objects, range.end, true);

            state.text.edit(text_start..text_end, text);
            state.objects.remove_within(range.clone());

            let inserted = text.len() as isize;
            let removed_text = (text_end - text_start) as isize;
            let removed_actual = (range.end - range.start) as isize;
            let removed_underlying = (underlying_end - underlying_start) as isize;
            state.objects.shift_from(
                range.end,
                inserted - removed_text,
                inserted - removed_actual,
                inserted - removed_underlying,
            );
            state.len = (state.len as isize + inserted - removed_actual) as usize;
            state.version += 1;
            inserted - removed_actual
        };
        self.shared
            .bus
            .publish(ClosedRange::new(range.start, range.end - 1), delta);
        Ok(())
    }
}

impl Clone for Document {
    /// Cheap handle clone; both handles refer to the same document state.
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An edit boundary may touch an object's edges but never its interior.
fn check_boundary(objects: &ObjectIndex, pos: usize) -> Result<(), EditError> {
    let splits = objects
        .closest_before(Space::Actual, pos)
        .is_some_and(|span| pos > span.actual.start && pos < span.actual.end);
    if splits {
        Err(EditError::SplitsObject { pos })
    } else {
        Ok(())
    }
}
