/*!
 * # Position & Bookmark Core
 *
 * This module implements the coordinate system underneath the rich-text
 * document model: where text and embedded non-text objects (images, charts,
 * link markers) live while the content is constantly edited, and how outside
 * observers keep a stable reference into that content.
 *
 * ## Three coordinate spaces
 *
 * Every position in a document is an offset in one of three spaces:
 *
 * - **Text**: counts only text; embedded objects have zero width.
 * - **Actual**: the canonical, application-facing space. Every unit of
 *   content, text or object, counts as exactly one slot.
 * - **Underlying**: the storage space. Some objects reserve extra slots
 *   here (a link marker keeps a metadata slot next to it); when nothing is
 *   reserved, underlying equals actual.
 *
 * The [`ObjectIndex`] records, for each embedded object, its range in all
 * three spaces at once. The index must stay ordered and disjoint in every
 * space simultaneously; the pure functions in [`convert`] walk it with a
 * binary search to translate a position between any two spaces.
 *
 * ## Change propagation
 *
 * Every mutation flows through [`Document`]'s edit operations. After the
 * store is updated, the document publishes a "length changed" event on its
 * [`ChangeBus`]: the closed interval of affected actual positions plus the
 * signed length delta. Subscribers are held by `Weak` reference and pruned
 * lazily during publish, so dropping a subscriber is all it takes to
 * unsubscribe.
 *
 * ## Bookmarks and fragments
 *
 * A [`Bookmark`] is a bus subscriber owning a single actual position. It
 * shifts itself on every publish (forward past insertions, backward past
 * deletions, collapsing to the start of an edit that swallowed it) without
 * ever rescanning the document. A [`Fragment`] is a pair of bookmarks
 * spanning live content; its text is recomputed from the current bookmark
 * positions on every read, so it is automatically correct after any edit.
 *
 * Everything here is single-threaded and synchronous: one logical session
 * edits the document at a time, and a publish returns only after every live
 * subscriber has observed it.
 *
 * ## Module Structure
 *
 * - **`interval`**: closed intervals and position offset helpers
 * - **`spans`**: the object span table ([`ObjectIndex`])
 * - **`convert`**: pure coordinate conversions between the three spaces
 * - **`bus`**: the weak-subscriber [`ChangeBus`]
 * - **`bookmark`**: self-adjusting stable positions
 * - **`document`**: the document facade tying store, index and bus together
 * - **`fragment`**: live two-ended views over document content
 */

// Module exports
pub mod bookmark;
pub mod bus;
pub mod convert;
pub mod document;
pub mod fragment;
pub mod interval;
pub mod spans;

// Public API re-exports
pub use bookmark::{Bias, Bookmark};
pub use bus::{ChangeBus, LengthObserver};
pub use document::{Document, EditError};
pub use fragment::Fragment;
pub use interval::{ClosedRange, Space};
pub use spans::{ObjectId, ObjectIndex, ObjectKind, ObjectSpan};
