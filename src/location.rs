//! Grid coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position in a [`Field`](crate::field::Field).
///
/// Two locations are equal when both row and column match, so a `Location`
/// can be used as a map key as well as a grid index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed offset, returning `None` if either coordinate would go negative.
    #[inline]
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Location> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Location { row, col })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_equality() {
        assert_eq!(Location::new(3, 4), Location::new(3, 4));
        assert_ne!(Location::new(3, 4), Location::new(4, 3));
    }

    #[test]
    fn test_usable_as_key() {
        let mut set = HashSet::new();
        set.insert(Location::new(1, 2));
        set.insert(Location::new(1, 2));
        set.insert(Location::new(2, 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_offset() {
        let loc = Location::new(0, 5);
        assert_eq!(loc.offset(1, -1), Some(Location::new(1, 4)));
        assert_eq!(loc.offset(-1, 0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::new(7, 11).to_string(), "7,11");
    }
}
