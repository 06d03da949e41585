use crate::subsystem::{BoxError, Subsystem};
use crate::CoreError;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Which hook produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Begin,
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Begin => write!(f, "begin"),
            Stage::End => write!(f, "end"),
        }
    }
}

struct Failure {
    stage: Stage,
    error: BoxError,
    offender: Arc<dyn Subsystem>,
}

/// Result of a start or rollback pass.
///
/// Either a success carrying nothing, or the first error of the pass together
/// with the subsystem that raised it. Both are present or both are absent.
#[must_use = "an Outcome may carry a subsystem failure"]
pub struct Outcome {
    failure: Option<Failure>,
}

impl Outcome {
    pub(crate) fn success() -> Self {
        Self { failure: None }
    }

    pub(crate) fn failed(stage: Stage, error: BoxError, offender: Arc<dyn Subsystem>) -> Self {
        Self {
            failure: Some(Failure {
                stage,
                error,
                offender,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// The error returned by the offending subsystem, exactly as it returned it.
    pub fn error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.failure.as_ref().map(|f| &*f.error)
    }

    /// The subsystem whose hook failed. `None` exactly when `error()` is `None`.
    pub fn offender(&self) -> Option<&Arc<dyn Subsystem>> {
        self.failure.as_ref().map(|f| &f.offender)
    }

    pub fn stage(&self) -> Option<Stage> {
        self.failure.as_ref().map(|f| f.stage)
    }

    /// Take the subsystem's error out of the outcome.
    pub fn into_error(self) -> Option<BoxError> {
        self.failure.map(|f| f.error)
    }

    /// Convert into a `Result`, naming the offender in the error.
    ///
    /// The subsystem's own error stays reachable through `source()`.
    pub fn into_result(self) -> Result<(), CoreError> {
        match self.failure {
            None => Ok(()),
            Some(f) => Err(CoreError::Subsystem {
                stage: f.stage,
                name: f.offender.name().to_owned(),
                source: f.error,
            }),
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => f.write_str("Outcome::Success"),
            Some(failure) => f
                .debug_struct("Outcome::Failure")
                .field("stage", &failure.stage)
                .field("offender", &failure.offender.name())
                .field("error", &failure.error)
                .finish(),
        }
    }
}
