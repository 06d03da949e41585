//! Ordered, reversible bring-up of a process's long-lived subsystems.
//!
//! A [`Manager`] starts registered subsystems (database handles, log files,
//! listening sockets, background workers) in registration order. When one of
//! them fails to come up, the caller rolls back and exactly the subsystems that
//! did start are torn down in reverse order. The same rollback serves as the
//! normal shutdown path. Every pass reports its result as an [`Outcome`] naming
//! the first failing subsystem, if any.

pub mod lifecycle;
pub mod manager;
pub mod outcome;
pub mod subsystem;

pub use lifecycle::{validate_transition, Phase};
pub use manager::Manager;
pub use outcome::{Outcome, Stage};
pub use subsystem::{subsystem, BoxError, FnSubsystem, Hook, Subsystem};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },
    #[error("subsystem '{name}' failed to {stage}: {source}")]
    Subsystem {
        stage: Stage,
        name: String,
        #[source]
        source: BoxError,
    },
}
