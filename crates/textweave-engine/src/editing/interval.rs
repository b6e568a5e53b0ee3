/// The three coordinate spaces a position can be expressed in.
///
/// `Text` counts only text characters, `Actual` counts every content unit
/// (text character or embedded object) as one slot, and `Underlying` is the
/// storage space where some objects reserve extra slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Space {
    Text,
    Actual,
    Underlying,
}

/// Closed integer interval `[begin, end]`.
///
/// Change notifications carry closed intervals so that subscribers can tell
/// whether they sit before, inside, or after the edited region from both
/// endpoints. `begin <= end` always holds; a single position is `[p, p]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClosedRange {
    pub begin: usize,
    pub end: usize,
}

impl ClosedRange {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "closed range must have begin <= end");
        Self { begin, end }
    }

    /// Single-position interval `[pos, pos]`.
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.begin <= pos && pos <= self.end
    }
}

/// Shift a position by a signed delta.
///
/// Callers guarantee the result stays non-negative; a negative result is a
/// bookkeeping error upstream.
pub(crate) fn offset(pos: usize, delta: isize) -> usize {
    let shifted = pos as isize + delta;
    debug_assert!(shifted >= 0, "position {pos} shifted below zero by {delta}");
    shifted as usize
}

/// Shift both endpoints of a half-open range by a signed delta.
pub(crate) fn shift_range(range: &mut std::ops::Range<usize>, delta: isize) {
    range.start = offset(range.start, delta);
    range.end = offset(range.end, delta);
}
