// src/platform/selection.rs
//! Reads the current selection by copying it to the general pasteboard

use std::time::Duration;

use objc2_app_kit::NSPasteboard;
use objc2_foundation::NSString;
use tracing::{debug, trace};

use crate::core::input_types::SelectionSource;
use crate::platform::keyboard::post_copy_shortcut;

const PLAIN_TEXT_TYPE: &str = "public.utf8-plain-text";

/// Sends Cmd+C to the focused app, waits, then reads the pasteboard.
///
/// The user's clipboard is overwritten and not restored. A copy that leaves
/// the pasteboard change count untouched means nothing was selected, so the
/// old clipboard text is not reported as a selection.
pub struct PasteboardSelection {
    settle_delay: Duration,
}

impl PasteboardSelection {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

impl SelectionSource for PasteboardSelection {
    fn capture_selection(&mut self) -> Option<String> {
        unsafe {
            let pasteboard = NSPasteboard::generalPasteboard();
            let before = pasteboard.changeCount();

            if let Err(e) = post_copy_shortcut() {
                debug!("Copy shortcut not delivered: {}", e);
                return None;
            }

            // Blocking wait: the control loop owns the only thread
            std::thread::sleep(self.settle_delay);

            if pasteboard.changeCount() == before {
                trace!("Pasteboard unchanged after copy");
                return None;
            }

            let text = pasteboard.stringForType(&NSString::from_str(PLAIN_TEXT_TYPE))?;
            let text = text.to_string();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}
