// src/core/control_loop.rs
//! The polling loop that ties selection, lookup and overlay together
//!
//! Everything runs on one thread. Each tick samples the hotkeys, captures the
//! selection, possibly shows an answer, and hides an answer that has been on
//! screen for the display duration. Time is passed in explicitly so the
//! rules can be driven deterministically.

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::TooltipConfig;
use crate::core::input_types::{Hotkey, HotkeySource, SelectionSource, ToggleState};
use crate::core::knowledge::KnowledgeStore;
use crate::core::matcher::find_answer;
use crate::core::overlay::{OverlayPresenter, OverlaySurface};
use crate::error::OverlayError;

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Exit,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ExitHotkey,
    Interrupted,
}

/// Selection bookkeeping between ticks
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    last_selection: Option<String>,
}

impl SelectionState {
    pub fn last_selection(&self) -> Option<&str> {
        self.last_selection.as_deref()
    }

    fn is_new(&self, selection: &str) -> bool {
        self.last_selection.as_deref() != Some(selection)
    }
}

pub struct ControlLoop<S, K, O>
where
    S: SelectionSource,
    K: HotkeySource,
    O: OverlaySurface,
{
    store: KnowledgeStore,
    selection: S,
    hotkeys: K,
    overlay: OverlayPresenter<O>,
    toggle: ToggleState,
    state: SelectionState,
    display_duration: Duration,
    poll_interval: Duration,
}

impl<S, K, O> ControlLoop<S, K, O>
where
    S: SelectionSource,
    K: HotkeySource,
    O: OverlaySurface,
{
    pub fn new(
        config: &TooltipConfig,
        store: KnowledgeStore,
        selection: S,
        hotkeys: K,
        surface: O,
    ) -> Self {
        Self {
            store,
            selection,
            hotkeys,
            overlay: OverlayPresenter::new(surface, config.pointer_offset),
            toggle: ToggleState::new(config.toggle_debounce),
            state: SelectionState::default(),
            display_duration: config.display_duration,
            poll_interval: config.poll_interval,
        }
    }

    /// Run one poll cycle at time `now`
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, OverlayError> {
        if self.hotkeys.is_down(Hotkey::Exit) {
            info!("Exiting program...");
            return Ok(TickOutcome::Exit);
        }

        let toggle_down = self.hotkeys.is_down(Hotkey::Toggle);
        if let Some(enabled) = self.toggle.observe(toggle_down, now) {
            info!("Tooltip toggled {}", if enabled { "ON" } else { "OFF" });
        }

        if self.toggle.is_enabled() {
            self.poll_selection(now)?;
        }

        if self.overlay.expired(now, self.display_duration) {
            debug!("Answer expired, hiding overlay");
            self.overlay.hide()?;
            self.state.last_selection = None;
        }

        Ok(TickOutcome::Continue)
    }

    fn poll_selection(&mut self, now: Instant) -> Result<(), OverlayError> {
        let Some(selection) = self.selection.capture_selection() else {
            return Ok(());
        };
        if selection.is_empty() || !self.state.is_new(&selection) {
            return Ok(());
        }

        if let Some(answer) = find_answer(&self.store, &selection) {
            debug!("Selection {:?} matched", selection);
            self.overlay.show(&answer, now)?;
            self.state.last_selection = Some(selection);
        }
        Ok(())
    }

    /// Drive ticks until the exit hotkey, Ctrl+C, or an overlay failure.
    /// The GUI is serviced once after every tick.
    pub async fn run(&mut self) -> Result<StopReason, OverlayError> {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Interrupted, exiting...");
                    self.overlay.hide()?;
                    return Ok(StopReason::Interrupted);
                }
                _ = interval.tick() => {
                    if self.tick(Instant::now())? == TickOutcome::Exit {
                        self.overlay.hide()?;
                        return Ok(StopReason::ExitHotkey);
                    }
                    self.overlay.refresh()?;
                }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.toggle.is_enabled()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn overlay(&self) -> &OverlayPresenter<O> {
        &self.overlay
    }
}
