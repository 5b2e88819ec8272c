//! Seat identification and per-seat data storage.
//!
//! ## SeatId
//!
//! Internal, stable index of one participant in a match (0-based).
//!
//! ## SeatMap
//!
//! Per-seat data storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `SeatId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index supporting up to 255 seats.
///
/// Seat indices are 0-based: the first seat is `SeatId(0)` and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one in a match of `seat_count` seats, wrapping.
    #[must_use]
    pub fn next(self, seat_count: usize) -> Self {
        Self(((self.index() + 1) % seat_count) as u8)
    }

    /// The seat before this one in a match of `seat_count` seats, wrapping.
    #[must_use]
    pub fn previous(self, seat_count: usize) -> Self {
        Self(((self.index() + seat_count - 1) % seat_count) as u8)
    }

    /// Iterate over all seat IDs for a match with `seat_count` seats.
    ///
    /// ```
    /// use amazons_engine::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all(2).collect();
    /// assert_eq!(seats, vec![SeatId::new(0), SeatId::new(1)]);
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = SeatId> {
        (0..seat_count as u8).map(SeatId)
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use amazons_engine::core::{SeatId, SeatMap};
///
/// let mut pieces: SeatMap<u32> = SeatMap::with_value(2, 4);
/// pieces[SeatId::new(1)] = 3;
/// assert_eq!(pieces[SeatId::new(0)], 4);
/// assert_eq!(pieces[SeatId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    ///
    /// Callers validate `seat_count` beforehand; counts above 255 are truncated
    /// by the `u8` seat index and rejected at configuration time.
    pub fn new(seat_count: usize, factory: impl Fn(SeatId) -> T) -> Self {
        let data = (0..seat_count.min(u8::MAX as usize) as u8)
            .map(|i| factory(SeatId(i)))
            .collect();

        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(seat_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(seat_count, |_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default(seat_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(seat_count, |_| T::default())
    }

    /// Get the number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a seat's data, if the seat exists.
    #[must_use]
    pub fn get(&self, seat: SeatId) -> Option<&T> {
        self.data.get(seat.index())
    }

    /// Get a mutable reference to a seat's data, if the seat exists.
    pub fn get_mut(&mut self, seat: SeatId) -> Option<&mut T> {
        self.data.get_mut(seat.index())
    }

    /// Iterate over (SeatId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SeatId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (SeatId(i as u8), v))
    }
}

impl<T> Default for SeatMap<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Index<SeatId> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: SeatId) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<SeatId> for SeatMap<T> {
    fn index_mut(&mut self, seat: SeatId) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}
