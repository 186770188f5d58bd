//! Step controller — the active step and the rules for leaving it.
//!
//! Forward moves (`next`, `jump_to`) are gated by step validators supplied by
//! the caller as a closure over the current draft. Backward moves are free.

use tracing::{debug, info};

use crate::config::JumpPolicy;
use crate::error::{NavigationError, StepGateError};

use super::steps::{PrimaryAction, StepId, StepStatus};

/// Reason given when a jump is refused.
pub const JUMP_REFUSED: &str = "Please complete the previous step to jump ahead.";

/// Active step plus navigation. The active step is never persisted.
#[derive(Debug, Clone, Default)]
pub struct StepController {
    active: StepId,
    policy: JumpPolicy,
}

impl StepController {
    pub fn new(policy: JumpPolicy) -> Self {
        Self {
            active: StepId::FIRST,
            policy,
        }
    }

    pub fn active(&self) -> StepId {
        self.active
    }

    pub fn policy(&self) -> JumpPolicy {
        self.policy
    }

    /// Advance one step if the active step's validator passes.
    ///
    /// A no-op on the terminal step.
    pub fn next<G>(&mut self, gate: G) -> Result<StepId, NavigationError>
    where
        G: Fn(StepId) -> Result<(), StepGateError>,
    {
        let Some(target) = self.active.next() else {
            debug!(step = %self.active, "Already on the last step");
            return Ok(self.active);
        };
        if let Err(e) = gate(self.active) {
            info!(step = %self.active, "Next refused: {e}");
            return Err(e.into());
        }
        self.move_to(target);
        Ok(target)
    }

    /// Go back one step without validation, stopping at the first step.
    pub fn back(&mut self) -> Result<StepId, NavigationError> {
        if self.active.is_terminal() {
            info!("Back refused: application already submitted");
            return Err(NavigationError::Finished);
        }
        if let Some(target) = self.active.prev() {
            self.move_to(target);
        }
        Ok(self.active)
    }

    /// Jump straight to the step at `index`.
    ///
    /// The first step is always reachable. Any other target requires the
    /// step before it to pass, or every earlier step under
    /// [`JumpPolicy::AllPrior`].
    pub fn jump_to<G>(&mut self, index: usize, gate: G) -> Result<StepId, NavigationError>
    where
        G: Fn(StepId) -> Result<(), StepGateError>,
    {
        let Some(target) = StepId::from_index(index) else {
            info!(index, "Jump refused: no such step");
            return Err(NavigationError::OutOfRange {
                index,
                last: StepId::LAST.index(),
            });
        };
        if self.active.is_terminal() {
            info!(%target, "Jump refused: application already submitted");
            return Err(NavigationError::Finished);
        }

        let steps = StepId::ALL;
        let required = match (target.prev(), self.policy) {
            (None, _) => &steps[..0],
            (Some(_), JumpPolicy::AllPrior) => &steps[..index],
            (Some(_), JumpPolicy::PreviousStep) => &steps[index - 1..index],
        };
        for &step in required {
            if gate(step).is_err() {
                info!(%target, blocked_by = %step, "Jump refused");
                return Err(StepGateError {
                    step,
                    reason: JUMP_REFUSED.to_string(),
                }
                .into());
            }
        }

        self.move_to(target);
        Ok(target)
    }

    /// The primary button on the active step; none once submitted.
    pub fn primary_action(&self) -> Option<PrimaryAction> {
        match self.active {
            StepId::Summary => Some(PrimaryAction::Confirm),
            StepId::Completed => None,
            _ => Some(PrimaryAction::Next),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.active != StepId::FIRST && !self.active.is_terminal()
    }

    pub fn step_status(&self, step: StepId) -> StepStatus {
        use std::cmp::Ordering::*;
        match step.index().cmp(&self.active.index()) {
            Less => StepStatus::Completed,
            Equal => StepStatus::Active,
            Greater => StepStatus::Pending,
        }
    }

    /// Return to the first step.
    pub fn reset(&mut self) {
        self.active = StepId::FIRST;
    }

    fn move_to(&mut self, target: StepId) {
        info!(from = %self.active, to = %target, "Step changed");
        self.active = target;
    }
}
