use tracing::{debug, warn};

use crate::capabilities::{ApiOutput, Capabilities, TimerOutput};
use crate::event::Event;
use crate::model::{FormState, Model, ViewModel};
use crate::places::{dial_code_options, place_options, PlaceIndex};
use crate::profile::ProfileRecord;
use crate::{AppError, DEBOUNCE_WINDOW_MS};

/// The account form core: owns the profile record, the filter query and the
/// session state, and mediates between raw input events, filter results and
/// the remote sync capability.
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::SessionStarted { token } => match token {
                Some(token) => {
                    debug!("session credential found, fetching profile");
                    model.state = FormState::Loading;
                    model.token = Some(token.clone());
                    caps.api
                        .fetch_profile(token, |result| Event::ProfileFetched(Box::new(result)));
                }
                // No credential: short-circuit, no network call.
                None => {
                    model.state = FormState::Unauthenticated;
                    model.token = None;
                }
            },

            Event::DatasetsLoaded { places, dial_codes } => {
                // One index per dataset load; the datasets are static, so in
                // practice this runs once per session.
                let index = PlaceIndex::build(&places);
                debug!(entries = index.len(), "place index built");
                model.place_index = Some(index);
                model.dial_codes = dial_code_options(&dial_codes);
            }

            Event::ProfileFetched(result) => self.profile_fetched(*result, model),

            Event::FieldEdited(edit) => {
                if model.state.is_editing() {
                    model.profile.apply(edit);
                }
            }

            Event::DialCodeSelected { code } => {
                if model.dial_codes.iter().any(|o| o.value == code) {
                    model.selected_dial_code = Some(code);
                } else {
                    warn!(%code, "ignoring dial code not present in the dataset");
                }
            }

            Event::SearchInput { text } => {
                if !model.state.is_editing() {
                    return;
                }
                // Coalesce rapid keystrokes: cancel the superseded timer
                // before arming a new one, so only the last query can ever
                // commit.
                let (id, superseded) = model.debounce.arm(text);
                if let Some(old) = superseded {
                    caps.timer.cancel(old);
                }
                caps.timer.start(id, DEBOUNCE_WINDOW_MS, Event::DebounceElapsed);
            }

            Event::DebounceElapsed(output) => {
                if let TimerOutput::Fired { id } = output {
                    if let Some(query) = model.debounce.try_settle(id) {
                        debug!(%query, "filter query committed");
                        model.committed_query = query;
                    }
                    // A stale id means the timer was superseded after firing;
                    // its query must not commit.
                }
            }

            Event::PlaceSelected { city } => {
                if city.is_empty() {
                    model.profile.birth_place.clear();
                } else if model
                    .place_index
                    .as_ref()
                    .is_some_and(|index| index.contains_city(&city))
                {
                    model.profile.birth_place = city;
                } else {
                    // Free text never commits the constrained field.
                    warn!(%city, "ignoring selection not present in the place index");
                }
            }

            Event::PlaceCleared => model.profile.birth_place.clear(),

            Event::SaveRequested => self.save_requested(model, caps),

            Event::ProfileSaved(result) => self.profile_saved(*result, model),

            Event::ErrorDismissed => model.active_error = None,

            Event::FormClosed => {
                // Mandatory cleanup: a stale timer callback must never mutate
                // state after disposal. The static datasets are loaded once
                // at startup and survive the session.
                if let Some(pending) = model.debounce.release() {
                    caps.timer.cancel(pending);
                }
                model.state = FormState::Unauthenticated;
                model.token = None;
                model.profile = ProfileRecord::default();
                model.committed_query.clear();
                model.selected_dial_code = None;
                model.is_saving = false;
                model.active_error = None;
                model.active_toast = None;
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        // Pure re-derivation from (index, committed query); never cached.
        let place_options = model
            .place_index
            .as_ref()
            .map(|index| place_options(&index.filter(&model.committed_query)))
            .unwrap_or_default();

        ViewModel {
            auth: model.state.auth(),
            is_loading: matches!(model.state, FormState::Loading),
            is_saving: model.is_saving,
            profile: model.profile.clone(),
            place_options,
            dial_code_options: model.dial_codes.clone(),
            selected_dial_code: model.selected_dial_code.clone(),
            error: model.active_error.as_ref().map(AppError::user_facing_message),
            toast: model.active_toast.clone(),
        }
    }
}

impl App {
    fn profile_fetched(&self, result: crate::capabilities::ApiResult, model: &mut Model) {
        // A completion landing after teardown (or any state but Loading) is
        // stale and must not touch the model.
        if model.state != FormState::Loading {
            debug!("stale fetch completion ignored");
            return;
        }
        match result {
            Ok(ApiOutput::Profile(response)) => {
                model.profile = ProfileRecord::hydrate(response);
                model.state = FormState::Editing;
                model.active_error = None;
                debug!("profile hydrated");
            }
            Ok(ApiOutput::Saved) => {
                warn!("unexpected save acknowledgement on the fetch path");
            }
            Err(e) if e.is_authorization() => {
                // Expired or rejected credential: never show stale or
                // half-populated data.
                warn!(error = %e, "fetch rejected, resetting session");
                model.state = FormState::Unauthenticated;
                model.token = None;
                model.profile = ProfileRecord::default();
                model.active_error = Some(AppError::from(e));
            }
            Err(e) => {
                // Transient: report without logging the user out. The form
                // stays usable with an empty record.
                warn!(error = %e, "profile fetch failed");
                model.state = FormState::Editing;
                model.active_error = Some(AppError::from(e));
            }
        }
    }

    fn save_requested(&self, model: &mut Model, caps: &Capabilities) {
        if !model.state.is_editing() || model.is_saving {
            return;
        }
        let Some(token) = model.token.clone() else {
            warn!("save requested without a session credential");
            return;
        };
        model.is_saving = true;
        model.active_toast = None;
        caps.api.save_profile(token, model.profile.to_update(), |result| {
            Event::ProfileSaved(Box::new(result))
        });
    }

    fn profile_saved(&self, result: crate::capabilities::ApiResult, model: &mut Model) {
        // Only an in-flight save may complete; anything else is a stale
        // callback arriving after teardown.
        if !model.is_saving {
            debug!("stale save completion ignored");
            return;
        }
        model.is_saving = false;
        match result {
            Ok(_) => {
                debug!("profile saved");
                model.active_toast = Some("Your details have been saved.".to_string());
            }
            Err(e) if e.is_authorization() => {
                warn!(error = %e, "save rejected, resetting session");
                model.state = FormState::Unauthenticated;
                model.token = None;
                model.profile = ProfileRecord::default();
                model.active_error = Some(AppError::from(e));
            }
            // Failed save: record stays exactly as edited, so the user can
            // retry.
            Err(e) => {
                warn!(error = %e, "profile save failed");
                model.active_error = Some(AppError::from(e));
            }
        }
    }
}
