use serde::{Deserialize, Serialize};

use crate::capabilities::TimerId;
use crate::event::Secret;
use crate::places::{DialCodeOption, PlaceIndex, PlaceOption};
use crate::profile::ProfileRecord;
use crate::AppError;

/// Controller state for the account form session.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Unauthenticated,
    /// Credential found, fetch in flight.
    Loading,
    /// Terminal for the session. Entered with a hydrated record on fetch
    /// success, or with an empty record (degraded) after a transient fetch
    /// failure.
    Editing,
}

impl FormState {
    /// Binary session-validity view exposed to the shell. A found credential
    /// counts as authenticated until the backend rejects it.
    #[must_use]
    pub const fn auth(self) -> AuthState {
        match self {
            Self::Unauthenticated => AuthState::Unauthenticated,
            Self::Loading | Self::Editing => AuthState::Authenticated,
        }
    }

    #[must_use]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Editing)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Explicit debounce handle: owns the pending timer id and the not yet
/// committed query text. The id is the scoped resource the session must
/// release on teardown; garbage collection is never relied upon.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Debounce {
    next_id: u64,
    pending: Option<TimerId>,
    pending_query: Option<String>,
}

impl Debounce {
    /// Records a new raw keystroke: returns the freshly armed timer id and
    /// the superseded one (to cancel), if any. Last call wins.
    pub fn arm(&mut self, query: String) -> (TimerId, Option<TimerId>) {
        let superseded = self.pending.take();
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some(id);
        self.pending_query = Some(query);
        (id, superseded)
    }

    /// Consumes the pending query iff `id` is still the current handle.
    /// Fired notifications for superseded timers yield `None` and must be
    /// ignored by the caller.
    pub fn try_settle(&mut self, id: TimerId) -> Option<String> {
        if self.pending == Some(id) {
            self.pending = None;
            self.pending_query.take()
        } else {
            None
        }
    }

    /// Teardown: drops any staged query and hands back the pending id so the
    /// caller can cancel it. Mandatory on unmount.
    pub fn release(&mut self) -> Option<TimerId> {
        self.pending_query = None;
        self.pending.take()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Authoritative in-memory state, owned exclusively by the core and only
/// ever touched on the single event loop.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub state: FormState,
    pub token: Option<Secret>,

    /// Working copy of the profile; the backend owns the durable one.
    pub profile: ProfileRecord,

    // Static datasets, built once per load
    pub place_index: Option<PlaceIndex>,
    pub dial_codes: Vec<DialCodeOption>,
    pub selected_dial_code: Option<String>,

    // Place search
    pub committed_query: String,
    pub debounce: Debounce,

    // Generic UI state
    pub is_saving: bool,
    pub active_error: Option<AppError>,
    pub active_toast: Option<String>,
}

/// Projection consumed by the presentation layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub auth: AuthState,
    pub is_loading: bool,
    pub is_saving: bool,
    pub profile: ProfileRecord,
    /// Filtered place options, at most 100, in index order.
    pub place_options: Vec<PlaceOption>,
    pub dial_code_options: Vec<DialCodeOption>,
    pub selected_dial_code: Option<String>,
    pub error: Option<String>,
    pub toast: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_last_call_wins() {
        let mut debounce = Debounce::default();

        let (first, cancelled) = debounce.arm("m".into());
        assert_eq!(cancelled, None);

        let (second, cancelled) = debounce.arm("mu".into());
        assert_eq!(cancelled, Some(first));

        let (third, cancelled) = debounce.arm("my".into());
        assert_eq!(cancelled, Some(second));

        // Stale fires settle nothing.
        assert_eq!(debounce.try_settle(first), None);
        assert_eq!(debounce.try_settle(second), None);

        // Only the most recent id commits, with the last call's text.
        assert_eq!(debounce.try_settle(third), Some("my".to_string()));
        assert!(!debounce.is_pending());

        // A second fire for the same id is also stale.
        assert_eq!(debounce.try_settle(third), None);
    }

    #[test]
    fn debounce_ids_are_never_reused() {
        let mut debounce = Debounce::default();
        let (a, _) = debounce.arm("x".into());
        debounce.try_settle(a);
        let (b, _) = debounce.arm("y".into());
        assert_ne!(a, b);
    }

    #[test]
    fn debounce_release_returns_the_pending_handle() {
        let mut debounce = Debounce::default();
        let (id, _) = debounce.arm("q".into());
        assert_eq!(debounce.release(), Some(id));
        assert!(!debounce.is_pending());
        // Released queries never settle late.
        assert_eq!(debounce.try_settle(id), None);
    }

    #[test]
    fn form_state_maps_to_binary_auth() {
        assert_eq!(FormState::Unauthenticated.auth(), AuthState::Unauthenticated);
        assert_eq!(FormState::Loading.auth(), AuthState::Authenticated);
        assert_eq!(FormState::Editing.auth(), AuthState::Authenticated);
    }
}
