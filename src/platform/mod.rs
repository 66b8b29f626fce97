// src/platform/mod.rs
//! macOS integration: hotkeys, selection capture, overlay window, dialogs

pub mod app;
pub mod keyboard;
pub mod overlay;
pub mod selection;

pub use app::{init_application, is_accessibility_trusted, show_error_dialog};
pub use keyboard::GlobalHotkeys;
pub use overlay::AppKitOverlay;
pub use selection::PasteboardSelection;
