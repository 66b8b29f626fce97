// src/error.rs
//! Error types shared by the library modules

use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Failure to obtain a usable knowledge base at startup. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} is not valid UTF-8: {source}")]
    Encoding {
        location: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("no questions found in {0}")]
    Empty(String),
}

/// Failure in the overlay window subsystem. Ends the control loop.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay must be created on the main thread")]
    NotMainThread,

    #[error("no screen available to place the overlay on")]
    NoScreen,

    #[error("overlay window error: {0}")]
    Platform(String),
}

/// Failure to inject a synthetic key press
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not create keyboard event for key {key:#04x}")]
    EventCreation { key: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_thing() {
        let e = LoadError::Status {
            url: "https://example.com/a.txt".into(),
            status: 404,
        };
        assert_eq!(
            e.to_string(),
            "server returned HTTP 404 for https://example.com/a.txt"
        );

        let e = InputError::EventCreation { key: 0x08 };
        assert_eq!(e.to_string(), "could not create keyboard event for key 0x08");
    }
}
