use serde::{Deserialize, Serialize};

/// Per-component switches. A disabled component is skipped and reported as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
#[expect(clippy::struct_excessive_bools, reason = "one independent switch per component")]
pub struct Features {
    /// Merge sidebar and search pull request references
    pub pr_detection: bool,

    /// Scan comments for claims
    pub claim_detection: bool,

    /// Look for issue branches in recently pushed forks
    pub fork_activity: bool,

    pub momentum: bool,
    pub difficulty: bool,

    /// Count open assignments of each assignee
    pub workload: bool,

    /// Derive chart axes and the comment histogram
    pub stats: bool,
}

impl Features {
    /// Every component enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            pr_detection: true,
            claim_detection: true,
            fork_activity: true,
            momentum: true,
            difficulty: true,
            workload: true,
            stats: true,
        }
    }

    /// Every component disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            pr_detection: false,
            claim_detection: false,
            fork_activity: false,
            momentum: false,
            difficulty: false,
            workload: false,
            stats: false,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flags_default_to_enabled() {
        let features: Features = toml::from_str("momentum = false").unwrap();
        assert!(!features.momentum);
        assert!(features.pr_detection);
        assert!(features.stats);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(toml::from_str::<Features>("sparkles = true").is_err());
    }
}
