use std::fmt;

use crate::PlayType;

const _: () = assert!(PlayType::LEN <= u16::BITS as usize);

/// Set of play types stored as a bit mask over the enumeration order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlayTypeSet {
    bits: u16,
}

impl PlayTypeSet {
    const ALL_BITS: u16 = (1 << PlayType::LEN) - 1;

    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    const fn bit(play_type: PlayType) -> u16 {
        1 << play_type.index()
    }

    pub fn insert(&mut self, play_type: PlayType) {
        self.bits |= Self::bit(play_type);
    }

    pub fn remove(&mut self, play_type: PlayType) {
        self.bits &= !Self::bit(play_type);
    }

    #[must_use]
    pub const fn contains(self, play_type: PlayType) -> bool {
        self.bits & Self::bit(play_type) != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns the play types in `self` that are not in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::{PlayType, PlayTypeSet};
    ///
    /// let runs = PlayTypeSet::from_iter([PlayType::RunLeft, PlayType::RunRight]);
    /// let left = PlayTypeSet::from_iter([PlayType::RunLeft]);
    /// assert_eq!(
    ///     runs.difference(left).iter().collect::<Vec<_>>(),
    ///     [PlayType::RunRight]
    /// );
    /// ```
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates over the members in enumeration order.
    pub fn iter(self) -> impl Iterator<Item = PlayType> {
        PlayType::ALL
            .into_iter()
            .filter(move |&play_type| self.contains(play_type))
    }
}

impl FromIterator<PlayType> for PlayTypeSet {
    fn from_iter<I: IntoIterator<Item = PlayType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for play_type in iter {
            set.insert(play_type);
        }
        set
    }
}

impl fmt::Debug for PlayTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
