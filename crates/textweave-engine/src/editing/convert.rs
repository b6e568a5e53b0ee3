//! Pure coordinate conversions between the three spaces.
//!
//! All four conversions follow the same shape: find the closest object span
//! preceding the position in the *source* space. If there is none, no object
//! affects the position and it passes through unchanged. If the position
//! falls inside the span's source range, the result is one of the span's
//! boundaries in the *destination* space, chosen by the caller's tie-break.
//! Otherwise the position is shifted by the cumulative width difference the
//! spans contribute up to that point:
//! `destination_end + (source_position - source_end)`.
//!
//! None of these functions can fail for a non-negative input; positions past
//! the end of the document are a contract violation the document store
//! bounds-checks separately.

use crate::editing::interval::Space;
use crate::editing::spans::ObjectIndex;

/// Convert a text position to actual space.
///
/// Text ranges of object spans are zero-width points, so a text position is
/// never strictly inside one and no tie-break is needed: a position at an
/// object's text point resolves to the actual slot just after the object.
pub fn to_actual(index: &ObjectIndex, text_pos: usize) -> usize {
    match index.closest_before(Space::Text, text_pos) {
        None => text_pos,
        Some(span) => span.actual.end + (text_pos - span.text.end),
    }
}

/// Convert an actual position to text space.
///
/// A position on an object itself maps to the object's text point.
pub fn to_text(index: &ObjectIndex, actual_pos: usize) -> usize {
    match index.closest_before(Space::Actual, actual_pos) {
        None => actual_pos,
        Some(span) => {
            if actual_pos < span.actual.end {
                span.text.start
            } else {
                span.text.end + (actual_pos - span.actual.end)
            }
        }
    }
}

/// Convert an actual position to underlying (storage) space.
///
/// A position on an object maps to a whole range of underlying slots when
/// the object reserves extra storage; `prefer_start` picks which boundary
/// of that range to return.
pub fn to_underlying(index: &ObjectIndex, actual_pos: usize, prefer_start: bool) -> usize {
    match index.closest_before(Space::Actual, actual_pos) {
        None => actual_pos,
        Some(span) => {
            if actual_pos < span.actual.end {
                if prefer_start {
                    span.underlying.start
                } else {
                    span.underlying.end
                }
            } else {
                span.underlying.end + (actual_pos - span.actual.end)
            }
        }
    }
}

/// Convert an underlying position back to actual space.
///
/// An underlying position inside an object's reserved slots is ambiguous;
/// `prefer_start` selects the object's own actual slot, otherwise the slot
/// just after it.
pub fn from_underlying(index: &ObjectIndex, underlying_pos: usize, prefer_start: bool) -> usize {
    match index.closest_before(Space::Underlying, underlying_pos) {
        None => underlying_pos,
        Some(span) => {
            if underlying_pos < span.underlying.end {
                if prefer_start {
                    span.actual.start
                } else {
                    span.actual.end
                }
            } else {
                span.actual.end + (underlying_pos - span.underlying.end)
            }
        }
    }
}
