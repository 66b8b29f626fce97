// src/core/input_types.rs
//! Common types and traits for selection and hotkey input

use std::fmt;
use std::time::{Duration, Instant};

/// Captures whatever text the user currently has selected
pub trait SelectionSource {
    /// Best effort: `None` when nothing could be read. Never fails loudly;
    /// the control loop simply tries again on the next tick.
    fn capture_selection(&mut self) -> Option<String>;
}

/// The two global keys the tool reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// Flip the tooltip on and off
    Toggle,
    /// Quit the program
    Exit,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hotkey::Toggle => f.write_str("CAPS LOCK"),
            Hotkey::Exit => f.write_str("Q"),
        }
    }
}

/// Samples the physical state of global hotkeys
pub trait HotkeySource {
    /// Whether `key` is held down right now
    fn is_down(&mut self, key: Hotkey) -> bool;
}

/// Enabled flag driven by a debounced toggle key
#[derive(Debug, Clone)]
pub struct ToggleState {
    enabled: bool,
    was_down: bool,
    last_toggle: Option<Instant>,
    debounce: Duration,
}

impl ToggleState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            enabled: true,
            was_down: false,
            last_toggle: None,
            debounce,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed one key sample. Returns the new enabled state when this sample
    /// is a press edge outside the debounce window, `None` otherwise.
    pub fn observe(&mut self, down: bool, now: Instant) -> Option<bool> {
        let edge = down && !self.was_down;
        self.was_down = down;
        if !edge {
            return None;
        }

        let bouncing = self
            .last_toggle
            .is_some_and(|last| now.saturating_duration_since(last) < self.debounce);
        if bouncing {
            return None;
        }

        self.enabled = !self.enabled;
        self.last_toggle = Some(now);
        Some(self.enabled)
    }
}
