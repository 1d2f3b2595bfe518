/// Backend-reported state of one ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// Result of asking a status to move to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Unchanged,
    Rejected,
}

impl JobStatus {
    pub const TERMINAL: [JobStatus; 3] =
        [JobStatus::Succeeded, JobStatus::Failed, JobStatus::Cancelled];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Running => "Processing",
            JobStatus::Succeeded => "Complete",
            JobStatus::Failed => "Failed",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    /// Checks `self -> next` against the job lifecycle
    /// `queued -> running -> {succeeded | failed | cancelled}`.
    ///
    /// A queued job may jump straight to a terminal outcome when the backend
    /// finishes between two polls. Terminal statuses are final.
    pub fn transition(self, next: JobStatus) -> Transition {
        if self == next {
            return Transition::Unchanged;
        }
        match (self, next) {
            (from, _) if from.is_terminal() => Transition::Rejected,
            (JobStatus::Queued, _) => Transition::Applied,
            (JobStatus::Running, to) if to.is_terminal() => Transition::Applied,
            _ => Transition::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_apply() {
        assert_eq!(
            JobStatus::Queued.transition(JobStatus::Running),
            Transition::Applied
        );
        assert_eq!(
            JobStatus::Running.transition(JobStatus::Succeeded),
            Transition::Applied
        );
        assert_eq!(
            JobStatus::Queued.transition(JobStatus::Cancelled),
            Transition::Applied
        );
    }

    #[test]
    fn terminal_statuses_are_final() {
        for terminal in JobStatus::TERMINAL {
            assert!(terminal.is_terminal());
            assert_eq!(terminal.transition(JobStatus::Running), Transition::Rejected);
            assert_eq!(terminal.transition(terminal), Transition::Unchanged);
        }
        assert_eq!(
            JobStatus::Succeeded.transition(JobStatus::Failed),
            Transition::Rejected
        );
    }

    #[test]
    fn running_does_not_regress_to_queued() {
        assert_eq!(
            JobStatus::Running.transition(JobStatus::Queued),
            Transition::Rejected
        );
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
    }
}
