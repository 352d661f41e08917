//! Escape hatch when a direct retrieval fails
//!
//! The asset URL is handed to the platform instead: the system browser if
//! allowed and available, otherwise it is printed so the user can save it
//! manually.

use serde::Serialize;
use tracing::{info, warn};

/// Where the URL ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Handoff {
    Browser,
    Printed,
}

/// Hands an asset URL to something outside this process. Must not fail.
pub trait FallbackOpener: Send + Sync {
    fn hand_off(&self, url: &str) -> Handoff;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Clone)]
pub struct SystemOpener {
    open_in_browser: bool,
}

impl SystemOpener {
    pub fn new(open_in_browser: bool) -> Self {
        Self { open_in_browser }
    }
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FallbackOpener for SystemOpener {
    fn hand_off(&self, url: &str) -> Handoff {
        if self.open_in_browser {
            match open::that(url) {
                Ok(()) => {
                    info!("Opened asset URL in the default browser");
                    return Handoff::Browser;
                }
                Err(e) => warn!("Failed to open browser: {}", e),
            }
        }
        println!("Save the file manually from: {}", url);
        Handoff::Printed
    }
}
