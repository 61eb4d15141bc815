//! Rectangular field holding at most one agent per cell.

use crate::agent::Species;
use crate::location::Location;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a field cell stores: the occupant's roster index and its species.
///
/// The species tag lets adjacency scans filter by kind without looking the
/// agent up in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub index: usize,
    pub species: Species,
}

impl Occupant {
    #[inline]
    pub fn new(index: usize, species: Species) -> Self {
        Self { index, species }
    }
}

/// Fixed-size grid. `cells[row][col]`.
#[derive(Clone, Debug)]
pub struct Field {
    depth: usize,
    width: usize,
    cells: Vec<Vec<Option<Occupant>>>,
}

impl Field {
    /// Create an empty field. Both dimensions must be non-zero.
    pub fn new(depth: usize, width: usize) -> Self {
        assert!(depth > 0 && width > 0, "field dimensions must be non-zero");
        Self {
            depth,
            width,
            cells: vec![vec![None; width]; depth],
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn contains(&self, location: Location) -> bool {
        location.row < self.depth && location.col < self.width
    }

    #[inline]
    fn check(&self, location: Location) {
        assert!(
            self.contains(location),
            "location {} outside {}x{} field",
            location,
            self.depth,
            self.width
        );
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                *cell = None;
            }
        }
    }

    /// Store `occupant` at `location`, replacing whatever was there.
    ///
    /// The previous occupant is only dropped from storage; its own state is untouched.
    #[inline]
    pub fn place(&mut self, occupant: Occupant, location: Location) {
        self.check(location);
        self.cells[location.row][location.col] = Some(occupant);
    }

    /// Remove and return the occupant at `location`.
    #[inline]
    pub fn take(&mut self, location: Location) -> Option<Occupant> {
        self.check(location);
        self.cells[location.row][location.col].take()
    }

    #[inline]
    pub fn object_at(&self, location: Location) -> Option<Occupant> {
        self.check(location);
        self.cells[location.row][location.col]
    }

    #[inline]
    pub fn is_free(&self, location: Location) -> bool {
        self.object_at(location).is_none()
    }

    /// In-bounds neighbours of `location` (up to 8, never `location` itself)
    /// in a freshly shuffled order.
    pub fn adjacent_locations<R: Rng + ?Sized>(&self, location: Location, rng: &mut R) -> Vec<Location> {
        self.check(location);
        let mut locations = Vec::with_capacity(8);
        for d_row in -1isize..=1 {
            for d_col in -1isize..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                if let Some(next) = location.offset(d_row, d_col) {
                    if self.contains(next) {
                        locations.push(next);
                    }
                }
            }
        }
        locations.shuffle(rng);
        locations
    }

    /// Pick a cell of the 3x3 block around `location` using independent
    /// row/col offsets in {-1, 0, 1}. Falls back to `location` when the pick
    /// lands outside the field.
    pub fn random_adjacent_location<R: Rng + ?Sized>(&self, location: Location, rng: &mut R) -> Location {
        self.check(location);
        let d_row = rng.gen_range(-1isize..=1);
        let d_col = rng.gen_range(-1isize..=1);
        match location.offset(d_row, d_col) {
            Some(next) if self.contains(next) => next,
            _ => location,
        }
    }

    /// First empty neighbour in shuffled order; otherwise `location` itself if
    /// it is empty; otherwise `None` (overcrowded).
    pub fn free_adjacent_location<R: Rng + ?Sized>(&self, location: Location, rng: &mut R) -> Option<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .find(|&next| self.is_free(next))
            .or_else(|| self.is_free(location).then_some(location))
    }

    /// All empty neighbours, shuffled.
    pub fn free_adjacent_locations<R: Rng + ?Sized>(&self, location: Location, rng: &mut R) -> Vec<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .filter(|&next| self.is_free(next))
            .collect()
    }

    /// Iterate over every occupied cell.
    pub fn occupants(&self) -> impl Iterator<Item = (Location, Occupant)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|occ| (Location::new(row, col), occ)))
        })
    }

    /// Rewrite roster indices after the roster was compacted.
    ///
    /// `remap[old]` is the new index, or `None` if that agent was removed, in
    /// which case its cell is emptied.
    pub(crate) fn remap_indices(&mut self, remap: &[Option<usize>]) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = cell.and_then(|occ| {
                    let index = remap.get(occ.index).copied().flatten()?;
                    Some(Occupant { index, ..occ })
                });
            }
        }
    }

    /// Species-only copy of the grid, for renderers.
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            depth: self.depth,
            width: self.width,
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(|cell| cell.map(|occ| occ.species)).collect())
                .collect(),
        }
    }
}

/// Detached view of a field for display surfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub depth: usize,
    pub width: usize,
    pub cells: Vec<Vec<Option<Species>>>,
}

impl FieldSnapshot {
    #[inline]
    pub fn species_at(&self, location: Location) -> Option<Species> {
        self.cells
            .get(location.row)
            .and_then(|row| row.get(location.col))
            .copied()
            .flatten()
    }
}
