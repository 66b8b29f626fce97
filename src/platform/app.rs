// src/platform/app.rs
//! NSApplication setup, the fatal error dialog and permission checks

use objc2::rc::Retained;
use objc2::MainThreadMarker;
use objc2_app_kit::{NSAlert, NSAlertStyle, NSApplication, NSApplicationActivationPolicy};
use objc2_foundation::NSString;
use tracing::info;

/// Prepare NSApplication for an agent-style app: no Dock icon, no menu bar,
/// but allowed to put windows on screen
pub fn init_application(mtm: MainThreadMarker) -> Retained<NSApplication> {
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
    unsafe { app.finishLaunching() };
    info!("✅ macOS application context initialized");
    app
}

/// Blocking modal alert, brought in front of the focused app
pub fn show_error_dialog(mtm: MainThreadMarker, title: &str, message: &str) {
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
    unsafe {
        #[allow(deprecated)]
        app.activateIgnoringOtherApps(true);

        let alert = NSAlert::new(mtm);
        alert.setAlertStyle(NSAlertStyle::Critical);
        alert.setMessageText(&NSString::from_str(title));
        alert.setInformativeText(&NSString::from_str(message));
        alert.runModal();
    }
}

/// Synthetic key events and global key state both require Accessibility trust
pub fn is_accessibility_trusted() -> bool {
    use accessibility_sys::AXIsProcessTrusted;
    unsafe { AXIsProcessTrusted() }
}
