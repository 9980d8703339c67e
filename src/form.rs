use crate::domain::{RecordEmail, StoredRecord};
use crate::store::RecordStore;

/// How many records a refresh asks the store for, newest first.
pub const RECENT_LIMIT: i64 = 10;

/// The user-facing message shown when the submitted input fails local validation.
pub const INVALID_EMAIL_MESSAGE: &str = "invalid email";

/// Everything the form renders from.
///
/// `recent` never holds more than [`RECENT_LIMIT`] entries and is ordered by creation time
/// descending. `last_inserted` is either `None` or the most recently stored record of this
/// process's lifetime; nothing here survives a restart.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub email_input: String,
    pub is_submitting: bool,
    pub error_message: Option<String>,
    pub last_inserted: Option<StoredRecord>,
    pub recent: Vec<StoredRecord>,
}

/// The submission form: captures input, validates it, submits it to the record store and
/// keeps the latest state of both the submission result and the recent-records list.
///
/// Every submission cycle runs `Idle -> Submitting -> Idle`; no failure is fatal and the
/// form is always ready for the next attempt. Failures of the recent-list refresh are
/// deliberately kept away from the user: the previous list stays on display.
pub struct SubmissionForm<S> {
    store: S,
    state: UiState,
}

impl<S: RecordStore> SubmissionForm<S> {
    /// Builds the form and performs the one automatic refresh of the recent list that
    /// happens when the form becomes active, before any user interaction.
    pub async fn activate(store: S) -> Self {
        let mut form = Self {
            store,
            state: UiState::default(),
        };
        form.refresh_recent().await;
        form
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Overwrites the input buffer. No other side effect: validation only happens on
    /// submission.
    pub fn input_changed(&mut self, text: impl Into<String>) {
        self.state.email_input = text.into();
    }

    /// Runs one submission cycle: validate, mark the form busy, insert, fold the outcome
    /// back into the state, mark the form idle again.
    ///
    /// The insert fully resolves before the recent list is refreshed, so a successful
    /// submission is always visible in the list it leaves behind. While a submission is in
    /// flight, further calls are no-ops: no second insert may be issued.
    #[tracing::instrument(
        name = "Submitting a new record",
        skip(self),
        fields(email_input = %self.state.email_input)
    )]
    pub async fn submit(&mut self) {
        if self.state.is_submitting {
            return;
        }
        self.state.error_message = None;

        let email = match RecordEmail::parse(self.state.email_input.clone()) {
            Ok(email) => email,
            Err(e) => {
                tracing::info!("Rejecting submission without contacting the store: {e}");
                self.state.error_message = Some(INVALID_EMAIL_MESSAGE.into());
                return;
            }
        };

        self.state.is_submitting = true;
        match self.store.insert(&email).await {
            Ok(record) => {
                self.state.last_inserted = Some(record);
                self.state.email_input.clear();
                self.refresh_recent().await;
            }
            // The store's message is surfaced verbatim; the input stays put so the user
            // can resubmit.
            Err(e) => {
                self.state.error_message = Some(e.to_string());
            }
        }
        self.state.is_submitting = false;
    }

    /// Replaces the recent list wholesale with the store's newest [`RECENT_LIMIT`] records.
    ///
    /// On failure the previous list is kept and nothing is surfaced to the user. That is a
    /// policy, not an accident: the list is best-effort decoration around the form.
    #[tracing::instrument(name = "Refreshing the recent records list", skip(self))]
    pub async fn refresh_recent(&mut self) {
        match self.store.list_recent(RECENT_LIMIT).await {
            Ok(records) => self.state.recent = records,
            Err(e) => {
                tracing::warn!("Failed to refresh the recent records list, keeping the previous one: {e}");
            }
        }
    }
}
