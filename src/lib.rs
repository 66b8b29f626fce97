//! Selection Tooltip Library
//!
//! Watches the user's text selection, looks it up in a question/answer
//! knowledge base and shows the answer in a small overlay next to the
//! pointer. The matching and timing logic in [`core`] is platform
//! independent; [`platform`] provides the macOS implementations of the
//! selection, hotkey and overlay traits.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod core;
pub mod error;

#[cfg(target_os = "macos")]
pub mod platform;

pub use config::TooltipConfig;
pub use crate::core::knowledge::{KnowledgeSource, KnowledgeStore, QARecord};
pub use crate::core::matcher::find_answer;
pub use error::{InputError, LoadError, OverlayError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::TooltipConfig;
    pub use crate::core::control_loop::{ControlLoop, StopReason, TickOutcome};
    pub use crate::core::input_types::{Hotkey, HotkeySource, SelectionSource};
    pub use crate::core::knowledge::{KnowledgeSource, KnowledgeStore, QARecord};
    pub use crate::core::matcher::find_answer;
    pub use crate::core::overlay::{OverlayPresenter, OverlaySurface, ScreenPoint};
    pub use crate::error::{InputError, LoadError, OverlayError};
}
