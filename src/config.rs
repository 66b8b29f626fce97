// src/config.rs
//! Runtime configuration with compiled-in defaults

use std::time::Duration;

use crate::core::knowledge::KnowledgeSource;

/// Remote knowledge base fetched at startup
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/JavohirbekMuxtorov/tooltip/refs/heads/main/answer.txt";

/// How long an answer stays on screen
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(2);

/// Configuration for the tooltip control loop and its collaborators
#[derive(Debug, Clone)]
pub struct TooltipConfig {
    /// Where the knowledge base comes from
    pub source: KnowledgeSource,

    /// Time an answer stays visible before it is hidden
    pub display_duration: Duration,

    /// Interval between control loop ticks
    pub poll_interval: Duration,

    /// Wait between the synthetic copy and the pasteboard read
    pub copy_settle_delay: Duration,

    /// Minimum spacing between two accepted toggle presses
    pub toggle_debounce: Duration,

    /// Overlay offset from the pointer, right and down, in points
    pub pointer_offset: (f64, f64),

    /// Request timeout for the startup fetch
    pub fetch_timeout: Duration,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            source: KnowledgeSource::Url(DEFAULT_SOURCE_URL.to_string()),
            display_duration: DEFAULT_DISPLAY_DURATION,
            poll_interval: Duration::from_millis(100),
            copy_settle_delay: Duration::from_millis(100),
            toggle_debounce: Duration::from_millis(300),
            pointer_offset: (15.0, 10.0),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}
