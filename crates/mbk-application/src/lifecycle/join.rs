//! Two-signal completion barrier
//!
//! A consumption cycle completes only after two independent vendor signals
//! have both arrived, in either order. [`PairBarrier`] records each side at
//! most once and yields the pair exactly once, on the arrival of whichever
//! side came second. Repeated emissions of a side are ignored.

/// Join of a left and a right signal
#[derive(Debug)]
pub struct PairBarrier<L, R> {
    left: Option<L>,
    right: Option<R>,
    fired: bool,
}

impl<L, R> PairBarrier<L, R> {
    /// Create an armed, empty barrier
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            fired: false,
        }
    }

    /// Record the left signal; returns the pair if this completes the join
    pub fn offer_left(&mut self, value: L) -> Option<(L, R)> {
        if self.fired || self.left.is_some() {
            return None;
        }
        self.left = Some(value);
        self.try_fire()
    }

    /// Record the right signal; returns the pair if this completes the join
    pub fn offer_right(&mut self, value: R) -> Option<(L, R)> {
        if self.fired || self.right.is_some() {
            return None;
        }
        self.right = Some(value);
        self.try_fire()
    }

    fn try_fire(&mut self) -> Option<(L, R)> {
        if self.left.is_none() || self.right.is_none() {
            return None;
        }
        self.fired = true;
        self.left.take().zip(self.right.take())
    }

    /// Clear both sides and re-arm
    pub fn reset(&mut self) {
        self.left = None;
        self.right = None;
        self.fired = false;
    }

    /// Whether the pair was already yielded
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Whether the left side arrived and the pair is still pending
    pub fn has_left(&self) -> bool {
        self.left.is_some()
    }

    /// Whether the right side arrived and the pair is still pending
    pub fn has_right(&self) -> bool {
        self.right.is_some()
    }
}

impl<L, R> Default for PairBarrier<L, R> {
    fn default() -> Self {
        Self::new()
    }
}
