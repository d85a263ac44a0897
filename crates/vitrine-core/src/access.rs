//! Passcode gate for the console.
//!
//! This is an obfuscated local flag, not a credential system: the stored value
//! is the passcode in base64 and anyone with access to the file can read it.
//! It keeps casual users out of the console and nothing more. The API itself
//! is not protected by it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};

use crate::config::ConsoleConfig;
use crate::error::CoreError;

/// Minimum number of characters an entered passcode must have
pub const MIN_PASSCODE_LENGTH: usize = 6;

#[derive(Clone, Debug)]
pub struct AccessGate {
    passcode: Option<String>,
    flag_path: PathBuf,
}

impl AccessGate {
    pub fn new(passcode: Option<String>, flag_path: impl Into<PathBuf>) -> Self {
        Self {
            passcode,
            flag_path: flag_path.into(),
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.passcode.clone(), config.access_file.clone())
    }

    pub fn flag_path(&self) -> &Path {
        &self.flag_path
    }

    /// True when no passcode is configured or the stored flag decodes to it.
    pub fn is_unlocked(&self) -> bool {
        let Some(expected) = self.passcode.as_deref() else {
            return true;
        };

        match fs::read_to_string(&self.flag_path) {
            Ok(stored) => decode_flag(stored.trim()).as_deref() == Some(expected),
            Err(_) => false,
        }
    }

    /// Compare `pin` with the configured passcode and persist the flag on success.
    pub fn unlock(&self, pin: &str) -> Result<(), CoreError> {
        if pin.chars().count() < MIN_PASSCODE_LENGTH {
            return Err(CoreError::InvalidInput(format!(
                "Passcode must be at least {} characters",
                MIN_PASSCODE_LENGTH
            )));
        }

        match self.passcode.as_deref() {
            Some(expected) if expected == pin => {
                fs::write(&self.flag_path, encode_flag(pin))?;
                tracing::info!(path = %self.flag_path.display(), "Console unlocked");
                Ok(())
            }
            Some(_) => Err(CoreError::AccessDenied(
                "Wrong passcode, check it and try again".to_string(),
            )),
            None => Ok(()),
        }
    }

    /// Remove the stored flag. Missing flag is not an error.
    pub fn lock(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.flag_path) {
            Ok(()) => {
                tracing::info!(path = %self.flag_path.display(), "Console locked");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn require_unlocked(&self) -> Result<(), CoreError> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(CoreError::AccessDenied(
                "Console is locked; run `vitrine unlock` first".to_string(),
            ))
        }
    }
}

fn encode_flag(passcode: &str) -> String {
    general_purpose::STANDARD.encode(passcode.as_bytes())
}

fn decode_flag(stored: &str) -> Option<String> {
    let bytes = general_purpose::STANDARD.decode(stored).ok()?;
    String::from_utf8(bytes).ok()
}
