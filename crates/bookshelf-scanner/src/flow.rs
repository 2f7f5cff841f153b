//! The scanner screen: camera scanning with a manual entry fallback
//!
//! A [`ScanFlow`] owns one [`ScanSession`] and one [`ManualIsbnEntry`] for
//! the time the screen is open. Either path ends the flow with a single
//! [`ScanResult`] delivered to the session's observer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScannerConfig;
use crate::error::{ManualEntryError, Result};
use crate::manual::ManualIsbnEntry;
use crate::platform::{CameraPlatform, DecodeEngine, DecodeOutcome, ScanObserver};
use crate::result::ScanResult;
use crate::session::{FrameVerdict, ScanSession};

/// Which input the screen is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "lowercase")]
pub enum ScannerMode {
    #[default]
    Scan,
    Manual,
}

/// Scanner screen controller
pub struct ScanFlow<P, E, O>
where
    P: CameraPlatform,
    E: DecodeEngine,
    O: ScanObserver,
{
    session: ScanSession<P, E, O>,
    manual: ManualIsbnEntry,
    mode: ScannerMode,
    is_open: bool,
}

impl<P, E, O> ScanFlow<P, E, O>
where
    P: CameraPlatform,
    E: DecodeEngine,
    O: ScanObserver,
{
    pub fn new(config: ScannerConfig, platform: P, engine: E, observer: O) -> Self {
        let manual = ManualIsbnEntry::new(config.manual_input_max_len as usize);
        Self {
            session: ScanSession::with_config(config, platform, engine, observer),
            manual,
            mode: ScannerMode::Scan,
            is_open: false,
        }
    }

    pub fn session(&self) -> &ScanSession<P, E, O> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ScanSession<P, E, O> {
        &mut self.session
    }

    pub fn manual(&self) -> &ManualIsbnEntry {
        &self.manual
    }

    pub fn mode(&self) -> ScannerMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the screen should offer a "try camera access again" action
    pub fn needs_permission_retry(&self) -> bool {
        self.session
            .error()
            .is_some_and(|err| err.is_permission_error())
    }

    /// Show the screen in scan mode and start the camera
    ///
    /// Permission is requested first if needed. A failure leaves the screen
    /// open so the user can retry or switch to manual entry.
    pub fn open(&mut self) -> Result<()> {
        self.is_open = true;
        self.mode = ScannerMode::Scan;
        debug!("Scanner opened");
        self.session.start_scanning()
    }

    /// Toggle between camera and manual entry
    ///
    /// Leaving scan mode releases the camera; coming back restarts it.
    pub fn switch_mode(&mut self, mode: ScannerMode) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        debug!("Scanner mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;

        match mode {
            ScannerMode::Manual => {
                self.session.stop_scanning();
                Ok(())
            }
            ScannerMode::Scan => {
                self.manual.clear();
                if self.is_open {
                    self.session.start_scanning()
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Forward a frame to the session; an accepted ISBN closes the screen
    pub fn handle_frame(&mut self, outcome: DecodeOutcome) -> FrameVerdict {
        let verdict = self.session.handle_frame(outcome);
        if matches!(verdict, FrameVerdict::Accepted(_)) {
            self.close();
        }
        verdict
    }

    /// Cycle to the next camera (scan mode only)
    pub fn switch_camera(&mut self) -> Result<()> {
        self.session.switch_camera()
    }

    pub fn set_manual_input(&mut self, value: &str) {
        self.manual.set_input(value);
    }

    /// Submit the manual form
    ///
    /// On success the result goes to the observer exactly like a scan and
    /// the screen closes. A rejection stays inline on the form and is not
    /// sent to the observer's error callback.
    pub fn submit_manual(&mut self) -> std::result::Result<ScanResult, ManualEntryError> {
        let result = self.manual.submit()?;
        self.session.observer_mut().on_scan_success(result.clone());
        self.close();
        Ok(result)
    }

    /// Hide the screen, releasing the camera from any state
    pub fn close(&mut self) {
        self.session.close();
        self.manual.clear();
        self.mode = ScannerMode::Scan;
        self.is_open = false;
        debug!("Scanner closed");
    }
}
