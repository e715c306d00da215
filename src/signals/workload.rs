use serde::{Deserialize, Serialize};

/// How many open issues an assignee of this issue already carries in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeWorkload {
    pub login: String,
    pub open_assignments: u64,
    pub is_overloaded: bool,
}

impl AssigneeWorkload {
    /// An assignee is overloaded when their open assignment count exceeds `threshold`.
    #[must_use]
    pub fn new(login: impl Into<String>, open_assignments: u64, threshold: u64) -> Self {
        Self {
            login: login.into(),
            open_assignments,
            is_overloaded: open_assignments > threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overload_threshold_is_exclusive() {
        assert!(!AssigneeWorkload::new("a", 5, 5).is_overloaded);
        assert!(AssigneeWorkload::new("a", 6, 5).is_overloaded);
    }
}
