use crate::lifecycle::{validate_transition, Phase};
use crate::outcome::{Outcome, Stage};
use crate::subsystem::Subsystem;
use crate::CoreError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Starts subsystems in registration order and tears them down in reverse.
///
/// `start` stops at the first failing `begin` and does not undo anything by
/// itself; the caller decides when to `rollback`. `rollback` calls `end` on the
/// started subsystems only, newest first, and stops at the first failing `end`.
///
/// Not thread-safe: drive it from a single thread. Returned [`Outcome`]s may be
/// sent anywhere.
#[derive(Default)]
pub struct Manager {
    registered: Vec<Arc<dyn Subsystem>>,
    /// Always a prefix of `registered`.
    started: Vec<Arc<dyn Subsystem>>,
    phase: Phase,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append subsystems in the order they should start.
    ///
    /// Fails with [`CoreError::InvalidTransition`] once `start` has been called.
    pub fn register<I>(&mut self, subsystems: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = Arc<dyn Subsystem>>,
    {
        validate_transition(self.phase, Phase::Fresh)?;
        let before = self.registered.len();
        self.registered.extend(subsystems);
        debug!(
            "registered {} subsystems ({} total)",
            self.registered.len() - before,
            self.registered.len()
        );
        Ok(())
    }

    pub fn register_one(&mut self, subsystem: Arc<dyn Subsystem>) -> Result<(), CoreError> {
        self.register(std::iter::once(subsystem))
    }

    /// Call `begin` on every registered subsystem, in order, until one fails.
    ///
    /// The failing subsystem is not added to `started` and later subsystems are
    /// not touched. Nothing is rolled back here.
    ///
    /// Starting again is allowed from any phase and clears `started` first.
    /// From `Running`, `PartiallyStarted` or `StuckDown` the subsystems still in
    /// `started` are forgotten without `end`, even though they are still live;
    /// call `rollback` until it succeeds before restarting to avoid that.
    pub fn start(&mut self) -> Outcome {
        if !self.started.is_empty() {
            warn!(
                "start called while {}: {} live subsystems are dropped without end",
                self.phase,
                self.started.len()
            );
        }
        self.started.clear();

        debug!("starting {} subsystems", self.registered.len());
        let mut failure = None;
        for subsystem in &self.registered {
            debug!("begin: {}", subsystem.name());
            if let Err(error) = subsystem.begin() {
                debug!("begin failed: {}: {error}", subsystem.name());
                failure = Some((error, Arc::clone(subsystem)));
                break;
            }
            self.started.push(Arc::clone(subsystem));
        }

        let Some((error, offender)) = failure else {
            self.enter(Phase::Running);
            debug!("all {} subsystems started", self.started.len());
            return Outcome::success();
        };
        self.enter(Phase::PartiallyStarted);
        Outcome::failed(Stage::Begin, error, offender)
    }

    /// Call `end` on started subsystems, newest first, until one fails.
    ///
    /// Each subsystem leaves `started` just before its `end` runs, so `end` is
    /// never called twice for one `begin`. After a failure `started` holds the
    /// subsystems below the offender, which are still up. Without a prior start
    /// this does nothing and succeeds.
    pub fn rollback(&mut self) -> Outcome {
        let mut outcome = Outcome::success();
        while let Some(subsystem) = self.started.pop() {
            debug!("end: {}", subsystem.name());
            if let Err(error) = subsystem.end() {
                debug!("end failed: {}: {error}", subsystem.name());
                outcome = Outcome::failed(Stage::End, error, subsystem);
                break;
            }
        }

        let next = if outcome.is_success() {
            Phase::Stopped
        } else {
            Phase::StuckDown
        };
        // Fresh and Stopped have nothing started and keep their phase.
        self.enter(next);
        debug!("rollback finished: {}", self.phase);
        outcome
    }

    /// Move to `next` if the transition table allows it; otherwise stay put.
    fn enter(&mut self, next: Phase) {
        match validate_transition(self.phase, next) {
            Ok(()) => self.phase = next,
            Err(e) => debug!("staying {}: {e}", self.phase),
        }
    }

    pub fn registered(&self) -> &[Arc<dyn Subsystem>] {
        &self.registered
    }

    pub fn started(&self) -> &[Arc<dyn Subsystem>] {
        &self.started
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[Arc<dyn Subsystem>]| -> Vec<String> {
            list.iter().map(|s| s.name().to_owned()).collect()
        };
        f.debug_struct("Manager")
            .field("phase", &self.phase)
            .field("registered", &names(&self.registered))
            .field("started", &names(&self.started))
            .finish()
    }
}
