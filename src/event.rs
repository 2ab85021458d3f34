use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::capabilities::{ApiResult, TimerOutput};
use crate::places::{CountryCities, DialCode};
use crate::profile::FieldEdit;

// --- Secret wrapper: redacts Debug, zeroizes on Drop ---

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(s: String) -> Self {
        Self(s)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// --- Event enum: one variant per inbound signal, large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    /// Session credential injected by the shell. `None` means no stored
    /// session; the core short-circuits to unauthenticated without any
    /// network call.
    SessionStarted { token: Option<Secret> },

    /// Static place and dial-code datasets, loaded once at startup.
    DatasetsLoaded {
        places: Vec<CountryCities>,
        dial_codes: Vec<DialCode>,
    },

    // Sync completions
    ProfileFetched(Box<ApiResult>),
    ProfileSaved(Box<ApiResult>),

    // Editing
    FieldEdited(FieldEdit),
    DialCodeSelected { code: String },

    // Place search
    SearchInput { text: String },
    DebounceElapsed(TimerOutput),
    PlaceSelected { city: String },
    PlaceCleared,

    // Persistence
    SaveRequested,

    // UI
    ErrorDismissed,
    FormClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let s = Secret::new("super_secret".into());
        assert_eq!(format!("{s:?}"), "[REDACTED]");
    }

    #[test]
    fn secret_round_trips_through_serde() {
        let s = Secret::new("token-123".into());
        let json = serde_json::to_string(&s).unwrap();
        let back: Secret = serde_json::from_str(&json).unwrap();
        assert_eq!(back.expose(), "token-123");
    }

    #[test]
    fn event_size_is_reasonable() {
        // Ensure boxing keeps the enum small.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {size} bytes — too large, box more variants"
        );
    }
}
