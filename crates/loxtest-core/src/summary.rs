//! Pass/fail aggregation per group and for the whole run

/// Pass/fail counts of one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTally {
    pub key: String,
    pub passed: usize,
    pub failed: usize,
}

impl GroupTally {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            passed: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Tallies for a whole run, appended to by the driver one group at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: Vec<GroupTally>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished group
    pub fn push(&mut self, tally: GroupTally) {
        self.groups.push(tally);
    }

    pub fn passed(&self) -> usize {
        self.groups.iter().map(|g| g.passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.groups.iter().map(|g| g.failed).sum()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(GroupTally::total).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}
