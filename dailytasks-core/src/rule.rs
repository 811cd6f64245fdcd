//! Completion rules: pure functions from a [`TaskValue`] tree to a [`TaskStatus`].
//!
//! Every rule is total over non-negative values and has no error path.

use crate::status::TaskStatus;
use crate::value::TaskValue;

/// Tiered thresholds compared with `>=` against the task's own value.
///
/// A `None` tier is unreachable. Non-null thresholds are expected in
/// descending order (beyond >= complete >= in-progress).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRule {
    pub beyond_complete: Option<u32>,
    pub complete: Option<u32>,
    pub in_progress: Option<u32>,
    pub default: TaskStatus,
}

impl ThresholdRule {
    pub const fn new(
        beyond_complete: Option<u32>,
        complete: Option<u32>,
        in_progress: Option<u32>,
        default: TaskStatus,
    ) -> Self {
        Self {
            beyond_complete,
            complete,
            in_progress,
            default,
        }
    }

    /// Checkbox semantics: any positive value completes the task.
    pub const fn checkbox() -> Self {
        Self::new(None, Some(1), None, TaskStatus::Incomplete)
    }

    /// A rule that never reports progress either way.
    pub const fn irrelevant() -> Self {
        Self::new(None, None, None, TaskStatus::CompletionIrrelevant)
    }

    pub fn evaluate(&self, value: u32) -> TaskStatus {
        let meets = |t: Option<u32>| t.is_some_and(|t| value >= t);
        if meets(self.beyond_complete) {
            TaskStatus::BeyondComplete
        } else if meets(self.complete) {
            TaskStatus::Complete
        } else if meets(self.in_progress) {
            TaskStatus::InProgressOrAttempted
        } else {
            self.default
        }
    }
}

/// One rule per task, carried by the task definition.
#[derive(Debug, Clone, Copy)]
pub enum CompletionRule {
    Threshold(ThresholdRule),
    /// Arbitrary pure function over the whole value tree.
    Composite(fn(&TaskValue) -> TaskStatus),
}

impl CompletionRule {
    pub fn evaluate(&self, value: &TaskValue) -> TaskStatus {
        match self {
            CompletionRule::Threshold(rule) => rule.evaluate(value.value),
            CompletionRule::Composite(f) => f(value),
        }
    }
}

/// Eating: two meals with at least one healthy; two healthy meals go beyond.
///
/// Reads sub-task 0 as healthy meals and sub-task 1 as miscellaneous meals.
pub fn eat_rule(value: &TaskValue) -> TaskStatus {
    let healthy = value.sub_value(0);
    let total = healthy.saturating_add(value.sub_value(1));
    if healthy >= 2 {
        TaskStatus::BeyondComplete
    } else if healthy == 1 && total >= 2 {
        TaskStatus::Complete
    } else if total > 0 {
        TaskStatus::InProgressOrAttempted
    } else {
        TaskStatus::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meals(healthy: u32, misc: u32) -> TaskValue {
        TaskValue::new(0, vec![TaskValue::leaf(healthy), TaskValue::leaf(misc)])
    }

    #[test]
    fn threshold_tiers() {
        let rule = ThresholdRule::new(Some(60), Some(30), Some(1), TaskStatus::Incomplete);
        assert_eq!(rule.evaluate(0), TaskStatus::Incomplete);
        assert_eq!(rule.evaluate(1), TaskStatus::InProgressOrAttempted);
        assert_eq!(rule.evaluate(29), TaskStatus::InProgressOrAttempted);
        assert_eq!(rule.evaluate(30), TaskStatus::Complete);
        assert_eq!(rule.evaluate(59), TaskStatus::Complete);
        assert_eq!(rule.evaluate(60), TaskStatus::BeyondComplete);
        assert_eq!(rule.evaluate(u32::MAX), TaskStatus::BeyondComplete);
    }

    #[test]
    fn missing_tiers_are_unreachable() {
        let rule = ThresholdRule::new(None, Some(2), Some(1), TaskStatus::Incomplete);
        assert_eq!(rule.evaluate(1_000), TaskStatus::Complete);

        let rule = ThresholdRule::new(Some(15), Some(5), None, TaskStatus::Incomplete);
        assert_eq!(rule.evaluate(4), TaskStatus::Incomplete);
    }

    #[test]
    fn checkbox_and_irrelevant() {
        assert_eq!(ThresholdRule::checkbox().evaluate(0), TaskStatus::Incomplete);
        assert_eq!(ThresholdRule::checkbox().evaluate(1), TaskStatus::Complete);
        assert_eq!(ThresholdRule::checkbox().evaluate(9), TaskStatus::Complete);
        assert_eq!(
            ThresholdRule::irrelevant().evaluate(4),
            TaskStatus::CompletionIrrelevant
        );
    }

    #[test]
    fn eat_scenarios() {
        assert_eq!(eat_rule(&meals(2, 0)), TaskStatus::BeyondComplete);
        assert_eq!(eat_rule(&meals(2, 5)), TaskStatus::BeyondComplete);
        assert_eq!(eat_rule(&meals(1, 1)), TaskStatus::Complete);
        assert_eq!(eat_rule(&meals(1, 0)), TaskStatus::InProgressOrAttempted);
        assert_eq!(eat_rule(&meals(0, 1)), TaskStatus::InProgressOrAttempted);
        assert_eq!(eat_rule(&meals(0, 3)), TaskStatus::InProgressOrAttempted);
        assert_eq!(eat_rule(&meals(0, 0)), TaskStatus::Incomplete);
    }

    #[test]
    fn eat_tolerates_missing_sub_values() {
        assert_eq!(eat_rule(&TaskValue::leaf(4)), TaskStatus::Incomplete);
    }

    #[test]
    fn composite_dispatch() {
        let rule = CompletionRule::Composite(eat_rule);
        assert_eq!(rule.evaluate(&meals(1, 1)), TaskStatus::Complete);
        let rule = CompletionRule::Threshold(ThresholdRule::checkbox());
        assert_eq!(rule.evaluate(&TaskValue::leaf(1)), TaskStatus::Complete);
    }
}
