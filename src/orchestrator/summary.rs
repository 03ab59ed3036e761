use std::time::Duration;

/// 오케스트레이터 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    Failed,
    /// dry run에서 실행하지 않은 작업
    Planned,
}

/// 작업 실행 결과
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub name: String,
    pub critical: bool,
    pub status: TaskStatus,
    /// 작업이 에러로 끝난 경우 메시지
    pub error: Option<String>,
    pub duration: Duration,
}

impl TaskOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    pub fn failed(&self) -> bool {
        self.status == TaskStatus::Failed
    }
}

/// 성공률에 따른 평가
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// 전체 실행 요약
#[derive(Debug, Clone)]
pub struct Summary {
    /// 입력된 작업 수
    pub total: usize,
    /// 끝까지 실행된 작업들 (순서 유지)
    pub outcomes: Vec<TaskOutcome>,
    /// 중요 작업 실패 경고
    pub warnings: Vec<String>,
    pub state: RunState,
    /// 인터럽트가 발생한 작업 이름
    pub interrupted_during: Option<String>,
    pub elapsed: Duration,
    pub dry_run: bool,
}

impl Summary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            outcomes: Vec::new(),
            warnings: Vec::new(),
            state: RunState::NotStarted,
            interrupted_during: None,
            elapsed: Duration::ZERO,
            dry_run: false,
        }
    }

    /// 실제로 끝난 작업 수 (인터럽트 시 total보다 작음)
    pub fn executed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failed()).count()
    }

    /// 실패한 작업 이름
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.failed())
            .map(|o| o.name.as_str())
            .collect()
    }

    /// 실패한 중요 작업 이름
    pub fn critical_failures(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.failed() && o.critical)
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn critical_total(&self) -> usize {
        self.outcomes.iter().filter(|o| o.critical).count()
    }

    pub fn is_interrupted(&self) -> bool {
        self.state == RunState::Interrupted
    }

    /// 모든 작업이 끝까지 실행되고 모두 성공했는지 확인
    pub fn all_succeeded(&self) -> bool {
        self.state == RunState::Completed
            && self.outcomes.len() == self.total
            && self
                .outcomes
                .iter()
                .all(|o| o.status != TaskStatus::Failed)
    }

    /// 성공률 계산 (입력 작업 수 기준)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.success_count() as f64 / self.total as f64) * 100.0
    }

    pub fn grade(&self) -> Grade {
        let rate = self.success_rate();
        if rate >= 100.0 {
            Grade::Excellent
        } else if rate >= 80.0 {
            Grade::Good
        } else if rate >= 60.0 {
            Grade::Fair
        } else {
            Grade::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, critical: bool, status: TaskStatus) -> TaskOutcome {
        TaskOutcome {
            name: name.to_string(),
            critical,
            status,
            error: None,
            duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_summary_all_succeeded() {
        let mut summary = Summary::new(2);
        summary.outcomes.push(outcome("a", true, TaskStatus::Succeeded));
        summary.outcomes.push(outcome("b", false, TaskStatus::Succeeded));
        summary.state = RunState::Completed;

        assert!(summary.all_succeeded());
        assert_eq!(summary.success_rate(), 100.0);
        assert_eq!(summary.grade(), Grade::Excellent);
    }

    #[test]
    fn test_summary_partial_failure() {
        let mut summary = Summary::new(5);
        summary.outcomes.push(outcome("a", true, TaskStatus::Succeeded));
        summary.outcomes.push(outcome("b", true, TaskStatus::Failed));
        summary.outcomes.push(outcome("c", false, TaskStatus::Failed));
        summary.outcomes.push(outcome("d", false, TaskStatus::Succeeded));
        summary.outcomes.push(outcome("e", false, TaskStatus::Succeeded));
        summary.state = RunState::Completed;

        assert!(!summary.all_succeeded());
        assert_eq!(summary.failed(), vec!["b", "c"]);
        assert_eq!(summary.critical_failures(), vec!["b"]);
        assert_eq!(summary.success_rate(), 60.0);
        assert_eq!(summary.grade(), Grade::Fair);
    }

    #[test]
    fn test_interrupted_is_not_success() {
        let mut summary = Summary::new(3);
        summary.outcomes.push(outcome("a", false, TaskStatus::Succeeded));
        summary.state = RunState::Interrupted;

        assert_eq!(summary.failure_count(), 0);
        assert!(!summary.all_succeeded());
        assert!(summary.executed() < summary.total);
    }

    #[test]
    fn test_grade_boundaries() {
        let mut summary = Summary::new(5);
        for _ in 0..4 {
            summary.outcomes.push(outcome("ok", false, TaskStatus::Succeeded));
        }
        summary.outcomes.push(outcome("bad", false, TaskStatus::Failed));
        assert_eq!(summary.grade(), Grade::Good);

        assert_eq!(Summary::new(0).grade(), Grade::Poor);
    }
}
