use std::collections::HashMap;

/// 会话里的五种异步动作。每种各自持有独立的 loading/error，
/// 一个动作失败不会阻塞或清掉另一个动作的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Load,
    Create,
    Update,
    Delete,
    Like,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStatus {
    pub in_flight: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ActionTracker {
    statuses: HashMap<ActionKind, ActionStatus>,
}

impl ActionTracker {
    pub fn status(&self, kind: ActionKind) -> ActionStatus {
        self.statuses.get(&kind).cloned().unwrap_or_default()
    }

    /// 动作起飞：置 loading，清掉上一次的错误。
    pub fn begin(&mut self, kind: ActionKind) {
        let entry = self.statuses.entry(kind).or_default();
        entry.in_flight = true;
        entry.error = None;
    }

    pub fn finish_ok(&mut self, kind: ActionKind) {
        let entry = self.statuses.entry(kind).or_default();
        entry.in_flight = false;
        entry.error = None;
    }

    /// 失败只记一条面向用户的字符串，不存异常对象。
    pub fn finish_err(&mut self, kind: ActionKind, message: String) {
        let entry = self.statuses.entry(kind).or_default();
        entry.in_flight = false;
        entry.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_defaults_to_idle() {
        let tracker = ActionTracker::default();
        assert_eq!(tracker.status(ActionKind::Create), ActionStatus::default());
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut tracker = ActionTracker::default();
        tracker.finish_err(ActionKind::Update, "boom".into());
        tracker.begin(ActionKind::Update);

        let s = tracker.status(ActionKind::Update);
        assert!(s.in_flight);
        assert_eq!(s.error, None);
    }

    #[test]
    fn kinds_are_independent() {
        let mut tracker = ActionTracker::default();
        tracker.begin(ActionKind::Update);
        tracker.finish_err(ActionKind::Delete, "delete failed".into());

        // Delete 失败不影响 Update 的 in-flight 状态
        assert!(tracker.status(ActionKind::Update).in_flight);
        assert_eq!(tracker.status(ActionKind::Update).error, None);
        assert_eq!(
            tracker.status(ActionKind::Delete).error.as_deref(),
            Some("delete failed")
        );
        assert!(!tracker.status(ActionKind::Delete).in_flight);
    }
}
