use std::time::Duration;

use crate::{
    composition::model::Composition,
    foundation::{
        clock::Clock,
        core::Size,
        error::{KeepsakeError, KeepsakeResult},
    },
    render::{
        backend::FontBook,
        hosted::{HostSurface, NEAR_INVISIBLE_OPACITY},
    },
};

/// Where an animated capture is in its settle wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Nothing attached yet.
    NotStarted,
    /// Attached; capture must wait until `until` on the gate's clock.
    AttachedWaiting { until: Duration },
    /// The wait finished at `at`.
    ReadyToCapture { at: Duration },
}

/// Holds an animated composition on a near-invisible host until its fixed delay elapses.
///
/// The wait is a single sleep. The composition handed back by [`AnimationGate::into_settled`] is
/// sampled no earlier than its own settle time, so a short delay cannot capture a mid-animation
/// frame.
#[derive(Debug)]
pub struct AnimationGate {
    delay: Duration,
    state: GateState,
    attached_at: Duration,
    host: HostSurface,
}

impl AnimationGate {
    /// Gate with a fixed settle `delay`.
    pub fn new(delay: Duration, fonts: FontBook) -> Self {
        Self {
            delay,
            state: GateState::NotStarted,
            attached_at: Duration::ZERO,
            host: HostSurface::new(fonts),
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Host the composition is attached to.
    pub fn host(&self) -> &HostSurface {
        &self.host
    }

    /// Attach `composition` and start the delay.
    pub fn attach(
        &mut self,
        composition: Composition,
        proposal: Size,
        clock: &dyn Clock,
    ) -> KeepsakeResult<()> {
        if self.state != GateState::NotStarted {
            return Err(KeepsakeError::validation(format!(
                "animation gate attach in state {:?}",
                self.state
            )));
        }
        let size = composition.measure(proposal);
        self.host.attach(composition, size)?;
        self.host.set_presentation_opacity(NEAR_INVISIBLE_OPACITY);
        self.attached_at = clock.now();
        let until = self.attached_at + self.delay;
        self.state = GateState::AttachedWaiting { until };
        tracing::debug!(delay_secs = self.delay.as_secs_f64(), "animation gate attached");
        Ok(())
    }

    /// Block until the delay has elapsed.
    pub fn wait(&mut self, clock: &dyn Clock) -> KeepsakeResult<()> {
        let GateState::AttachedWaiting { until } = self.state else {
            return Err(KeepsakeError::validation(format!(
                "animation gate wait in state {:?}",
                self.state
            )));
        };
        clock.sleep_until(until);
        self.state = GateState::ReadyToCapture { at: clock.now() };
        Ok(())
    }

    /// Detach and return the composition as it looks once settled.
    pub fn into_settled(mut self) -> KeepsakeResult<Composition> {
        let GateState::ReadyToCapture { at } = self.state else {
            return Err(KeepsakeError::validation(format!(
                "animation gate capture in state {:?}",
                self.state
            )));
        };
        let composition = self
            .host
            .detach()
            .ok_or_else(|| KeepsakeError::render("animation gate lost its composition"))?;
        let elapsed = at.saturating_sub(self.attached_at).as_secs_f64();
        let t = elapsed.max(composition.settle_secs());
        Ok(composition.sample(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gate.rs"]
mod tests;
