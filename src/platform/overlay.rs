// src/platform/overlay.rs
//! AppKit window backing the answer overlay
//!
//! A borderless, shadowed, non-activating window at floating level holding a
//! single wrapping label. The window is created once and ordered in and out;
//! it is only closed when the surface is dropped.

use objc2::rc::Retained;
use objc2::{MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{
    NSApplication, NSBackingStoreType, NSColor, NSEvent, NSEventMask, NSFont, NSScreen,
    NSTextField, NSWindow, NSWindowStyleMask,
};
use objc2_foundation::{NSDate, NSDefaultRunLoopMode, NSPoint, NSRect, NSSize, NSString};
use tracing::{debug, warn};

use crate::core::overlay::{OverlaySurface, ScreenPoint};
use crate::error::OverlayError;

/// kCGFloatingWindowLevel
const FLOATING_WINDOW_LEVEL: isize = 3;
const LABEL_PADDING: f64 = 5.0;
const WRAP_WIDTH: f64 = 300.0;
const FONT_SIZE: f64 = 13.0;
/// #FFFFDD
const BACKGROUND_RGB: (f64, f64, f64) = (1.0, 1.0, 221.0 / 255.0);

pub struct AppKitOverlay {
    mtm: MainThreadMarker,
    app: Retained<NSApplication>,
    window: Retained<NSWindow>,
    label: Retained<NSTextField>,
}

impl AppKitOverlay {
    pub fn new() -> Result<Self, OverlayError> {
        let mtm = MainThreadMarker::new().ok_or(OverlayError::NotMainThread)?;
        let app = NSApplication::sharedApplication(mtm);

        let (window, label) = unsafe {
            let frame = NSRect::new(NSPoint::new(0.0, 0.0), NSSize::new(WRAP_WIDTH, 20.0));
            let window = NSWindow::initWithContentRect_styleMask_backing_defer(
                NSWindow::alloc(mtm),
                frame,
                NSWindowStyleMask::Borderless,
                NSBackingStoreType::Buffered,
                false,
            );
            window.setReleasedWhenClosed(false);
            window.setLevel(FLOATING_WINDOW_LEVEL);
            window.setOpaque(false);
            window.setHasShadow(true);
            window.setIgnoresMouseEvents(true);
            let (r, g, b) = BACKGROUND_RGB;
            window.setBackgroundColor(Some(&*NSColor::colorWithSRGBRed_green_blue_alpha(
                r, g, b, 1.0,
            )));

            let label = NSTextField::wrappingLabelWithString(&NSString::from_str(""), mtm);
            label.setFont(Some(&*NSFont::systemFontOfSize(FONT_SIZE)));
            label.setTextColor(Some(&*NSColor::blackColor()));
            label.setPreferredMaxLayoutWidth(WRAP_WIDTH);
            label.setFrameOrigin(NSPoint::new(LABEL_PADDING, LABEL_PADDING));

            let content = window
                .contentView()
                .ok_or_else(|| OverlayError::Platform("window has no content view".into()))?;
            content.addSubview(&label);

            (window, label)
        };

        debug!("Overlay window created");
        Ok(Self {
            mtm,
            app,
            window,
            label,
        })
    }

    /// Height of the primary screen, whose bottom-left corner is the origin
    /// of AppKit's global coordinates
    fn primary_screen_height(&self) -> Option<f64> {
        unsafe {
            NSScreen::screens(self.mtm)
                .firstObject()
                .or_else(|| NSScreen::mainScreen(self.mtm))
                .map(|screen| screen.frame().size.height)
        }
    }
}

impl OverlaySurface for AppKitOverlay {
    fn set_text(&mut self, text: &str) -> Result<(), OverlayError> {
        unsafe {
            self.label.setStringValue(&NSString::from_str(text));
            let size = self.label.fittingSize();
            self.label.setFrameSize(size);
            self.label
                .setFrameOrigin(NSPoint::new(LABEL_PADDING, LABEL_PADDING));
            self.window.setContentSize(NSSize::new(
                size.width + 2.0 * LABEL_PADDING,
                size.height + 2.0 * LABEL_PADDING,
            ));
        }
        Ok(())
    }

    fn move_to(&mut self, top_left: ScreenPoint) -> Result<(), OverlayError> {
        let height = self.primary_screen_height().ok_or(OverlayError::NoScreen)?;
        unsafe {
            self.window
                .setFrameTopLeftPoint(NSPoint::new(top_left.x, height - top_left.y));
        }
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), OverlayError> {
        unsafe {
            if visible {
                self.window.orderFrontRegardless();
            } else {
                self.window.orderOut(None);
            }
        }
        Ok(())
    }

    fn pointer_location(&self) -> ScreenPoint {
        let location = unsafe { NSEvent::mouseLocation() };
        match self.primary_screen_height() {
            Some(height) => ScreenPoint::new(location.x, height - location.y),
            None => {
                warn!("No screen attached, using raw pointer coordinates");
                ScreenPoint::new(location.x, location.y)
            }
        }
    }

    fn pump_events(&mut self) -> Result<(), OverlayError> {
        unsafe {
            let distant_past = NSDate::distantPast();
            while let Some(event) = self.app.nextEventMatchingMask_untilDate_inMode_dequeue(
                NSEventMask::Any,
                Some(&*distant_past),
                NSDefaultRunLoopMode,
                true,
            ) {
                self.app.sendEvent(&event);
            }
            self.app.updateWindows();
        }
        Ok(())
    }
}

impl Drop for AppKitOverlay {
    fn drop(&mut self) {
        unsafe {
            self.window.orderOut(None);
            self.window.close();
        }
        debug!("Overlay window closed");
    }
}
