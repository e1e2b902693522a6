use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use txpanel_api::{BAN_PATH, BanRequest, GenericOk, PlayerRef};
use txpanel_api_client::{CallOptions, CallResult, Endpoint, Method, RequestChannel, Transport};

use crate::error::{DispatchError, ValidationError};
use crate::modal::ModalEvent;
use crate::perms::{Capabilities, PERM_BAN};

/// Duration presets offered by the Ban tab, shortest first.
pub const BAN_DURATIONS: [&str; 7] = [
    "2 hours",
    "8 hours",
    "1 day",
    "2 days",
    "1 week",
    "2 weeks",
    "permanent",
];

/// Ban tab form: a reason and one of [`BAN_DURATIONS`].
///
/// At most one submission is in flight. Each one is numbered so a result
/// that settles after [`BanForm::reset`] is recognised and ignored.
pub struct BanForm<T: Transport> {
    reason: String,
    duration: usize,
    submissions: u64,
    inflight: Option<u64>,
    submit: Endpoint<T, ModalEvent>,
}

impl<T: Transport> BanForm<T> {
    pub fn new(channel: &RequestChannel<T, ModalEvent>, scope: &CancellationToken) -> Self {
        Self {
            reason: String::new(),
            duration: 0,
            submissions: 0,
            inflight: None,
            submit: channel.endpoint(Method::Post, BAN_PATH).scoped(scope),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn duration(&self) -> &'static str {
        BAN_DURATIONS[self.duration]
    }

    pub fn duration_index(&self) -> usize {
        self.duration
    }

    pub fn is_pending(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn is_enabled(perms: &dyn Capabilities) -> bool {
        perms.has_perm(PERM_BAN)
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn insert(&mut self, ch: char) {
        self.reason.push(ch);
    }

    pub fn backspace(&mut self) {
        self.reason.pop();
    }

    pub fn select_duration(&mut self, duration: &str) -> Result<(), ValidationError> {
        let idx = BAN_DURATIONS
            .iter()
            .position(|d| *d == duration)
            .ok_or_else(|| ValidationError::UnknownDuration(duration.to_string()))?;
        self.duration = idx;
        Ok(())
    }

    pub fn next_duration(&mut self) {
        self.duration = (self.duration + 1) % BAN_DURATIONS.len();
    }

    pub fn prev_duration(&mut self) {
        self.duration = (self.duration + BAN_DURATIONS.len() - 1) % BAN_DURATIONS.len();
    }

    /// Clear the form. A submission still in flight keeps running but its
    /// result no longer touches the form.
    pub fn reset(&mut self) {
        self.reason.clear();
        self.duration = 0;
        self.inflight = None;
    }

    pub fn submit(
        &mut self,
        reference: &PlayerRef,
        perms: &dyn Capabilities,
    ) -> Result<(), DispatchError> {
        if !Self::is_enabled(perms) {
            return Err(DispatchError::Forbidden(PERM_BAN));
        }
        if self.inflight.is_some() {
            return Err(DispatchError::BanPending);
        }
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyReason.into());
        }
        let body = BanRequest {
            reason: reason.to_string(),
            duration: self.duration().to_string(),
        };
        info!(duration = %body.duration, "banning {reference}");
        self.submissions += 1;
        let submission = self.submissions;
        self.inflight = Some(submission);
        self.submit.call(
            CallOptions::new()
                .query(reference.query_pairs())
                .json(&body)
                .loading_toast("Banning player...")
                .success_toast("Player banned."),
            move |result| ModalEvent::BanApplied { submission, result },
        );
        Ok(())
    }

    /// Settle the submitted ban; returns whether the session should refresh.
    pub fn on_applied(&mut self, submission: u64, result: &CallResult<GenericOk>) -> bool {
        if self.inflight != Some(submission) {
            debug!(submission, "ignoring ban result for a reset form");
            return false;
        }
        self.inflight = None;
        match result {
            Ok(_) => {
                self.reason.clear();
                true
            }
            Err(_) => false,
        }
    }
}
