use crate::CoreError;
use std::fmt;

/// Where a [`Manager`](crate::Manager) stands in its bring-up/teardown cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Accepting registrations; nothing started yet.
    #[default]
    Fresh,
    /// Every registered subsystem started.
    Running,
    /// Start stopped at a failing subsystem; the ones before it are up.
    PartiallyStarted,
    /// Rollback finished; nothing is left started.
    Stopped,
    /// Rollback stopped at a failing `end`; subsystems below it are still up.
    StuckDown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Fresh => write!(f, "fresh"),
            Phase::Running => write!(f, "running"),
            Phase::PartiallyStarted => write!(f, "partially-started"),
            Phase::Stopped => write!(f, "stopped"),
            Phase::StuckDown => write!(f, "stuck-down"),
        }
    }
}

pub fn validate_transition(from: Phase, to: Phase) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (Phase::Fresh, Phase::Fresh)
            | (
                Phase::Fresh
                    | Phase::Stopped
                    | Phase::Running
                    | Phase::PartiallyStarted
                    | Phase::StuckDown,
                Phase::Running | Phase::PartiallyStarted
            )
            | (
                Phase::Running | Phase::PartiallyStarted | Phase::StuckDown,
                Phase::Stopped | Phase::StuckDown
            )
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}
