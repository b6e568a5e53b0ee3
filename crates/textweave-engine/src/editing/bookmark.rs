use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::editing::bus::LengthObserver;
use crate::editing::interval::{ClosedRange, offset};

/// Which edge of an edit a bookmark sticks to when the edit lands on it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Bias {
    /// Stay at the start of an edit that touches the position. Content
    /// inserted exactly at the bookmark stays after it.
    #[default]
    Leading,
    /// Follow the end of an edit that touches the position, so the bookmark
    /// grows with text inserted at it.
    Trailing,
}

/// A stable, self-adjusting reference to one actual-space position.
///
/// Bookmarks are created by [`Document::bookmark`] and updated only through
/// the change bus: on every publish the bookmark shifts itself past edits
/// before it and collapses to the start of an edit that swallowed it. There
/// is no detached state: a bookmark whose content was deleted points at
/// the start of the deleted region, so dependent fragments degrade to a
/// zero-length span instead of failing.
///
/// Dropping the bookmark drops its only strong subscription reference; the
/// bus prunes it on the next publish. The bookmark holds no reference to
/// the document at all, so neither keeps the other alive.
///
/// [`Document::bookmark`]: crate::editing::Document::bookmark
#[derive(Debug)]
pub struct Bookmark {
    cell: Rc<BookmarkCell>,
}

#[derive(Debug)]
pub(crate) struct BookmarkCell {
    pos: Cell<usize>,
    bias: Bias,
}

impl Bookmark {
    pub(crate) fn new(pos: usize, bias: Bias) -> Self {
        Self {
            cell: Rc::new(BookmarkCell {
                pos: Cell::new(pos),
                bias,
            }),
        }
    }

    pub(crate) fn observer(&self) -> Weak<dyn LengthObserver> {
        Rc::downgrade(&self.cell) as Weak<dyn LengthObserver>
    }

    /// Current actual-space position.
    pub fn pos(&self) -> usize {
        self.cell.pos.get()
    }
}

impl LengthObserver for BookmarkCell {
    fn on_length_change(&self, range: ClosedRange, delta: isize) {
        let pos = self.pos.get();
        if pos < range.begin {
            // edit happened entirely after the bookmark
            return;
        }
        if !range.contains(pos) {
            self.pos.set(offset(pos, delta));
            return;
        }
        // The edit touched or enclosed the bookmark's position: the content
        // it pointed at is gone or replaced.
        match self.bias {
            Bias::Leading => self.pos.set(range.begin),
            Bias::Trailing => {
                let shifted = (range.end as isize + delta).max(range.begin as isize);
                self.pos.set(shifted as usize);
            }
        }
    }
}
