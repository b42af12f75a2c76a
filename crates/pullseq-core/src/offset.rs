//! Logical positions inside a sequence.

use std::ops::Range;

/// A position counted from the start or from the end of a sequence.
///
/// `End(1)` names the last element, `End(0)` the slot one past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    Start(usize),
    End(usize),
}

impl Offset {
    /// Absolute index for a sequence of `len` elements.
    ///
    /// `None` when an end-relative offset reaches before the first element.
    /// Start-relative offsets always resolve, even past the end.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Offset::Start(n) => Some(n),
            Offset::End(n) => len.checked_sub(n),
        }
    }

    pub fn is_start(self) -> bool {
        self == Offset::Start(0)
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Start(0)
    }
}

impl From<usize> for Offset {
    fn from(n: usize) -> Self {
        Offset::Start(n)
    }
}

/// Positions a bulk copy of `want` elements at `offset` covers in a sequence
/// of `len` elements. Clamped to the sequence; empty when the offset is at or
/// past the end. `None` only when the offset does not resolve.
pub fn copy_window(len: usize, offset: Offset, want: usize) -> Option<Range<usize>> {
    let start = offset.resolve(len)?.min(len);
    let end = start.saturating_add(want).min(len);
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_offsets_count_back_from_length() {
        assert_eq!(Offset::End(1).resolve(5), Some(4));
        assert_eq!(Offset::End(5).resolve(5), Some(0));
        assert_eq!(Offset::End(6).resolve(5), None);
        assert_eq!(Offset::Start(9).resolve(5), Some(9));
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(copy_window(5, Offset::Start(3), 10), Some(3..5));
        assert_eq!(copy_window(5, Offset::Start(7), 2), Some(5..5));
        assert_eq!(copy_window(5, Offset::End(2), 1), Some(3..4));
        assert_eq!(copy_window(0, Offset::Start(0), 4), Some(0..0));
        assert_eq!(copy_window(3, Offset::End(4), 1), None);
    }
}
