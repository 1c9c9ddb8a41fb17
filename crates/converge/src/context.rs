//! Apply context passed to the reconciler

/// Options for a single reconciliation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyContext {
    /// Predict the outcome without issuing any mutating statement
    pub dry_run: bool,
}

impl ApplyContext {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Context for check mode
    pub fn check() -> Self {
        Self::new(true)
    }

    /// Context that applies changes
    pub fn live() -> Self {
        Self::new(false)
    }
}
