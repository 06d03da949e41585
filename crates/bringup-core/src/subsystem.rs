use std::fmt;
use std::sync::Arc;

/// Error type produced by subsystem hooks. The manager passes it through untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A begin or end callable wrapped by [`FnSubsystem`].
pub type Hook = Box<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// A unit of the process that can be brought up and torn down.
///
/// Implementors keep their own state behind interior mutability: the manager
/// holds subsystems as shared `Arc<dyn Subsystem>` references.
pub trait Subsystem: Send + Sync {
    /// Display name. Only used to report failures, never for lookup.
    fn name(&self) -> &str;

    /// Acquire whatever the subsystem needs (open files, bind sockets,
    /// allocate buffers). On error the subsystem must hold nothing that its
    /// own `end` would have to release.
    fn begin(&self) -> Result<(), BoxError>;

    /// Release what `begin` acquired. Only called after a successful `begin`.
    fn end(&self) -> Result<(), BoxError>;
}

/// Subsystem built from two plain callables.
///
/// Either hook may be omitted; it then does nothing and succeeds.
pub struct FnSubsystem {
    name: String,
    begin: Hook,
    end: Hook,
}

fn noop() -> Hook {
    Box::new(|| Ok(()))
}

impl FnSubsystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            begin: noop(),
            end: noop(),
        }
    }

    #[must_use]
    pub fn on_begin<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.begin = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_end<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.end = Box::new(f);
        self
    }
}

impl Subsystem for FnSubsystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&self) -> Result<(), BoxError> {
        (self.begin)()
    }

    fn end(&self) -> Result<(), BoxError> {
        (self.end)()
    }
}

impl fmt::Debug for FnSubsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubsystem")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a shareable subsystem from a name and optional hooks.
///
/// `None` hooks are replaced by no-ops that succeed. The name is not validated.
pub fn subsystem(
    name: impl Into<String>,
    begin: Option<Hook>,
    end: Option<Hook>,
) -> Arc<dyn Subsystem> {
    Arc::new(FnSubsystem {
        name: name.into(),
        begin: begin.unwrap_or_else(noop),
        end: end.unwrap_or_else(noop),
    })
}
