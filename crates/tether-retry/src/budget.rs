use std::num::NonZeroU32;

/// Attempts left for one logical call.
///
/// Created when a call begins and dropped with it. Every transient failure
/// consumes one attempt; the budget is never replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    total: u32,
    remaining: u32,
}

impl AttemptBudget {
    /// A fresh budget of `total` attempts.
    #[must_use]
    pub fn new(total: NonZeroU32) -> Self {
        Self {
            total: total.get(),
            remaining: total.get(),
        }
    }

    /// Record a transient failure. Returns the failure's 1-based ordinal.
    pub fn consume(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.used()
    }

    /// Attempts not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Transient failures recorded so far.
    #[must_use]
    pub fn used(&self) -> u32 {
        self.total - self.remaining
    }

    /// Size of the budget at creation.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether no attempts remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_counts_down_to_exhaustion() {
        let mut budget = AttemptBudget::new(NonZeroU32::new(2).expect("non-zero"));
        assert_eq!(budget.remaining(), 2);
        assert!(!budget.is_exhausted());

        assert_eq!(budget.consume(), 1);
        assert!(!budget.is_exhausted());
        assert_eq!(budget.consume(), 2);
        assert!(budget.is_exhausted());

        // Saturates instead of wrapping
        budget.consume();
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.used(), budget.total());
    }
}
