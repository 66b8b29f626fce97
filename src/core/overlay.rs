// src/core/overlay.rs
//! Overlay presentation independent of the windowing backend
//!
//! The presenter owns a single reusable window (the [`OverlaySurface`]) and
//! tracks whether it is on screen and since when. Backends only need to
//! move, fill and show/hide their window; the timing rules live here so they
//! can be exercised without a display.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::OverlayError;

/// A screen position in points, origin at the top-left, y growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (f64, f64)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Window operations a backend provides for the overlay
pub trait OverlaySurface {
    /// Replace the label text
    fn set_text(&mut self, text: &str) -> Result<(), OverlayError>;

    /// Place the window's top-left corner
    fn move_to(&mut self, top_left: ScreenPoint) -> Result<(), OverlayError>;

    /// Order the window on or off screen without destroying it
    fn set_visible(&mut self, visible: bool) -> Result<(), OverlayError>;

    /// Current pointer location
    fn pointer_location(&self) -> ScreenPoint;

    /// Service pending GUI events without blocking
    fn pump_events(&mut self) -> Result<(), OverlayError>;
}

/// Shows answers next to the pointer and remembers when they appeared
pub struct OverlayPresenter<S: OverlaySurface> {
    surface: S,
    pointer_offset: (f64, f64),
    visible: bool,
    shown_at: Option<Instant>,
}

impl<S: OverlaySurface> OverlayPresenter<S> {
    pub fn new(surface: S, pointer_offset: (f64, f64)) -> Self {
        Self {
            surface,
            pointer_offset,
            visible: false,
            shown_at: None,
        }
    }

    /// Display `text` near the pointer. Showing while already visible only
    /// replaces the text and moves the window.
    pub fn show(&mut self, text: &str, now: Instant) -> Result<(), OverlayError> {
        self.surface.set_text(text)?;
        self.reposition()?;
        if !self.visible {
            self.surface.set_visible(true)?;
            self.visible = true;
        }
        self.shown_at = Some(now);
        Ok(())
    }

    /// Take the window off screen; nothing happens when it is already hidden
    pub fn hide(&mut self) -> Result<(), OverlayError> {
        if self.visible {
            self.surface.set_visible(false)?;
            self.visible = false;
        }
        self.shown_at = None;
        Ok(())
    }

    pub fn reposition(&mut self) -> Result<(), OverlayError> {
        let target = self.surface.pointer_location().offset(self.pointer_offset);
        trace!("Overlay at ({:.0}, {:.0})", target.x, target.y);
        self.surface.move_to(target)
    }

    pub fn refresh(&mut self) -> Result<(), OverlayError> {
        self.surface.pump_events()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn shown_at(&self) -> Option<Instant> {
        self.shown_at
    }

    /// True once a visible overlay has been up for at least `duration`
    pub fn expired(&self, now: Instant, duration: Duration) -> bool {
        match (self.visible, self.shown_at) {
            (true, Some(shown_at)) => now.saturating_duration_since(shown_at) >= duration,
            _ => false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
