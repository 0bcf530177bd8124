//! Double-buffered resource pair with a single "previous" tag.

/// One side of a [`PingPong`] pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Two resources where one holds the last completed frame (`previous`) and the
/// other is the one written next (`current`).
///
/// The pair is never half-swapped: `swap` flips the single tag.
#[derive(Debug)]
pub struct PingPong<T> {
    a: T,
    b: T,
    previous: Slot,
}

impl<T> PingPong<T> {
    /// `a` starts as the previous frame, `b` as the next write target.
    pub fn new(a: T, b: T) -> Self {
        Self {
            a,
            b,
            previous: Slot::A,
        }
    }

    #[inline]
    pub fn previous_slot(&self) -> Slot {
        self.previous
    }

    #[inline]
    pub fn current_slot(&self) -> Slot {
        self.previous.other()
    }

    #[inline]
    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    #[inline]
    pub fn previous(&self) -> &T {
        self.get(self.previous)
    }

    #[inline]
    pub fn current(&self) -> &T {
        self.get(self.current_slot())
    }

    /// Marks `current` as completed: it becomes `previous`.
    #[inline]
    pub fn swap(&mut self) {
        self.previous = self.previous.other();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.a, &self.b].into_iter()
    }
}
