use crate::{FilterCriteria, Location};

/// Immutable location + criteria pair a cycle runs under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSnapshot {
    /// Bumped on every accepted location or filter change.
    pub revision: u64,
    pub location: Location,
    pub criteria: FilterCriteria,
}

impl SearchSnapshot {
    pub fn new(location: Location, criteria: FilterCriteria) -> Self {
        Self {
            revision: 0,
            location,
            criteria,
        }
    }

    /// Successor snapshot carrying a fresh revision.
    pub fn revise(&self, location: Location, criteria: FilterCriteria) -> Self {
        Self {
            revision: self.revision.wrapping_add(1),
            location,
            criteria,
        }
    }
}
