// src/main.rs
//! Selection Tooltip
//!
//! Select text anywhere; if it appears in one of the knowledge base questions,
//! the answer pops up next to the pointer for a couple of seconds.
//! CAPS LOCK toggles the tooltip, Q quits.

#![deny(unsafe_op_in_unsafe_fn)]

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use selection_tooltip::config::{TooltipConfig, DEFAULT_SOURCE_URL};
use selection_tooltip::{KnowledgeSource, KnowledgeStore, LoadError};

/// Command line interface for the selection tooltip
#[derive(Debug, Parser)]
#[command(
    name = "selection-tooltip",
    version,
    about = "Show answers for selected text in a floating tooltip",
    long_about = "Watches the text selection of the focused application, looks it up in a question/answer knowledge base and shows the matching answer next to the pointer. Requires Accessibility permission on macOS."
)]
struct Args {
    /// Knowledge base location: an http(s) URL or a local file path
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source: KnowledgeSource,

    /// Seconds an answer stays on screen
    #[arg(long = "display-secs", default_value = "2", value_parser = parse_display_secs)]
    display_duration: Duration,

    /// Verbosity level for logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Check permissions and exit
    #[arg(long, help = "Check required permissions and exit")]
    check_permissions: bool,
}

fn parse_display_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !(secs.is_finite() && secs > 0.0) {
        return Err("display duration must be a positive number of seconds".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("display duration out of range: {}", e))
}

impl Args {
    fn to_config(&self) -> TooltipConfig {
        TooltipConfig {
            source: self.source.clone(),
            display_duration: self.display_duration,
            ..TooltipConfig::default()
        }
    }
}

/// The main application state
struct TooltipApp {
    config: TooltipConfig,
    store: KnowledgeStore,
    start_time: std::time::Instant,
}

impl TooltipApp {
    /// Set up logging and load the knowledge base. A failed load is fatal.
    async fn new(args: Args) -> Result<Self> {
        let start_time = std::time::Instant::now();

        Self::setup_logging(&args)?;

        info!(
            "🚀 Starting Selection Tooltip v{}",
            env!("CARGO_PKG_VERSION")
        );

        if args.check_permissions {
            Self::check_and_report_permissions();
            std::process::exit(0);
        }

        #[cfg(not(target_os = "macos"))]
        {
            return Err(anyhow::anyhow!("This application only runs on macOS"));
        }

        let config = args.to_config();
        info!("Configuration: {:#?}", config);

        let store = match KnowledgeStore::load(&config.source, config.fetch_timeout).await {
            Ok(store) => store,
            Err(e) => {
                Self::report_load_failure(&e);
                return Err(e).context("No answers loaded. Program will exit.");
            }
        };

        Ok(Self {
            config,
            store,
            start_time,
        })
    }

    /// Run the polling loop on the main thread until exit
    #[cfg(target_os = "macos")]
    async fn run(self) -> Result<()> {
        use objc2::MainThreadMarker;
        use selection_tooltip::core::control_loop::{ControlLoop, StopReason};
        use selection_tooltip::core::input_types::Hotkey;
        use selection_tooltip::platform::{
            init_application, is_accessibility_trusted, AppKitOverlay, GlobalHotkeys,
            PasteboardSelection,
        };

        let mtm = MainThreadMarker::new()
            .context("Must run on main thread for NSApplication integration")?;
        let _app = init_application(mtm);

        if !is_accessibility_trusted() {
            tracing::warn!("⚠️  Accessibility permission missing: copy and hotkeys may not work");
            tracing::warn!("💡 Enable in: System Settings → Privacy & Security → Accessibility");
        }

        let overlay = AppKitOverlay::new().context("Failed to create overlay window")?;
        let mut control = ControlLoop::new(
            &self.config,
            self.store,
            PasteboardSelection::new(self.config.copy_settle_delay),
            GlobalHotkeys::new(),
            overlay,
        );

        println!("Running... Select text to see answer!");
        println!(
            "Press {} to toggle tooltip, {} to exit",
            Hotkey::Toggle,
            Hotkey::Exit
        );

        let reason = control.run().await.context("Overlay window failed")?;
        match reason {
            StopReason::ExitHotkey => info!("🛑 Exit key pressed"),
            StopReason::Interrupted => info!("🛑 Interrupted"),
        }

        let elapsed = self.start_time.elapsed();
        info!("📊 Session completed. Runtime: {:.2}s", elapsed.as_secs_f64());
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    async fn run(self) -> Result<()> {
        Err(anyhow::anyhow!("This application only runs on macOS"))
    }

    /// Log the failure and tell the user with a modal dialog
    fn report_load_failure(e: &LoadError) {
        let message = format!("Error loading answers from server: {}", e);
        error!("❌ {}", message);

        #[cfg(target_os = "macos")]
        {
            if let Some(mtm) = objc2::MainThreadMarker::new() {
                selection_tooltip::platform::show_error_dialog(mtm, "Error", &message);
            }
        }
    }

    /// Set up logging based on verbosity level
    fn setup_logging(args: &Args) -> Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let level = match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_target(args.verbose > 1)
            .init();

        Ok(())
    }

    /// Check and report on required permissions
    fn check_and_report_permissions() {
        println!("🔐 Checking required permissions...\n");

        #[cfg(target_os = "macos")]
        {
            let trusted = selection_tooltip::platform::is_accessibility_trusted();
            if trusted {
                println!("✅ Accessibility: Granted");
            } else {
                println!("❌ Accessibility: Not granted");
                println!("   Needed to send the copy shortcut and read the hotkeys");
                println!("   Enable in: System Settings → Privacy & Security → Accessibility");
                println!("   Add this application and enable the checkbox");
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            println!("❌ Unsupported platform: the overlay only runs on macOS");
        }
    }
}

/// Application entry point
///
/// A current-thread runtime keeps every AppKit call on the main thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let app = TooltipApp::new(args)
        .await
        .context("Failed to initialize tooltip application")?;

    app.run().await.context("Application runtime error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let args = Args::parse_from(["selection-tooltip"]);
        let config = args.to_config();
        assert_eq!(config.display_duration, Duration::from_secs(2));
        assert_eq!(
            config.source,
            KnowledgeSource::Url(DEFAULT_SOURCE_URL.to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "selection-tooltip",
            "--source",
            "answers.txt",
            "--display-secs",
            "3.5",
            "-vv",
        ]);
        let config = args.to_config();
        assert_eq!(config.display_duration, Duration::from_millis(3500));
        assert_eq!(
            config.source,
            KnowledgeSource::File(std::path::PathBuf::from("answers.txt"))
        );
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        assert!(Args::try_parse_from(["selection-tooltip", "--display-secs", "0"]).is_err());
        assert!(Args::try_parse_from(["selection-tooltip", "--display-secs", "abc"]).is_err());
        assert!(Args::try_parse_from(["selection-tooltip", "--display-secs", "-1"]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_duration() {
        assert!(Args::try_parse_from(["selection-tooltip", "--display-secs", "1e30"]).is_err());
        assert!(Args::try_parse_from(["selection-tooltip", "--display-secs", "inf"]).is_err());
    }
}
