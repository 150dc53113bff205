//! Best-so-far value of an index range and the tie-break rule.

use crate::Mana;

/// Best `(value, index)` known for some contiguous index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialResult {
    pub best_value: Mana,
    /// `None` only for an empty range.
    pub best_index: Option<usize>,
}

impl Default for PartialResult {
    fn default() -> Self {
        Self::NONE
    }
}

impl PartialResult {
    /// Result of an empty range.
    pub const NONE: PartialResult = PartialResult {
        best_value: Mana::MIN,
        best_index: None,
    };

    pub fn new(best_value: Mana, best_index: usize) -> Self {
        Self {
            best_value,
            best_index: Some(best_index),
        }
    }

    pub fn is_none(&self) -> bool {
        self.best_index.is_none()
    }

    /// Whether `self` wins against `other`: strictly greater value, or equal
    /// value at a smaller index. An empty result never wins.
    pub fn beats(&self, other: &PartialResult) -> bool {
        match (self.best_index, other.best_index) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(mine), Some(theirs)) => {
                self.best_value > other.best_value
                    || (self.best_value == other.best_value && mine < theirs)
            }
        }
    }

    /// Merge two results. The outcome does not depend on argument order.
    pub fn combine(self, other: PartialResult) -> PartialResult {
        if other.beats(&self) {
            other
        } else {
            self
        }
    }

    /// Fold a single evaluated unit into this result.
    pub fn offer(self, value: Mana, index: usize) -> PartialResult {
        self.combine(PartialResult::new(value, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greater_value_wins() {
        let a = PartialResult::new(3, 0);
        let b = PartialResult::new(5, 7);
        assert_eq!(a.combine(b), b);
        assert_eq!(b.combine(a), b);
    }

    #[test]
    fn test_tie_goes_to_smaller_index() {
        let left = PartialResult::new(9, 1);
        let right = PartialResult::new(9, 2);
        assert_eq!(left.combine(right), left);
        assert_eq!(right.combine(left), left);
    }

    #[test]
    fn test_none_never_wins() {
        let min = PartialResult::new(Mana::MIN, 4);
        assert_eq!(PartialResult::NONE.combine(min), min);
        assert_eq!(min.combine(PartialResult::NONE), min);
        assert_eq!(
            PartialResult::NONE.combine(PartialResult::NONE),
            PartialResult::NONE
        );
        assert!(PartialResult::default().is_none());
    }

    #[test]
    fn test_offer_matches_scan() {
        let values = [5, 9, 9, 3];
        let best = values
            .iter()
            .enumerate()
            .fold(PartialResult::NONE, |acc, (i, &v)| acc.offer(v, i));
        assert_eq!(best, PartialResult::new(9, 1));
    }

    #[test]
    fn test_negative_values() {
        let a = PartialResult::new(-10, 0);
        let b = PartialResult::new(-2, 1);
        assert_eq!(a.combine(b), b);
    }
}
