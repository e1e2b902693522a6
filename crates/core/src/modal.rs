//! The player modal controller.
//!
//! [`PlayerModal`] owns one [`ModalSession`], the tab selection and every
//! write workflow. It lives on the host's UI thread: calls are spawned on
//! the tokio runtime and their results come back through the inbox, which
//! the host drains with [`PlayerModal::pump`] (or awaits with
//! [`PlayerModal::next_event`] and feeds to [`PlayerModal::apply`]).
//! Dropping the modal cancels every request it still has in flight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use txpanel_api::{GenericOk, PlayerModalSuccess, PlayerRef};
use txpanel_api_client::{CallResult, Inbox, RequestChannel, ToastSink, Transport};

use crate::error::DispatchError;
use crate::history::{ActionTally, CounterBadge};
use crate::perms::Capabilities;
use crate::session::ModalSession;
use crate::tabs::{Tab, TabRouter};
use crate::workflows::{BanForm, NotesBox, RevokeAction, WhitelistToggle};

pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_millis(200);

/// Settled call, routed back to whichever part of the modal issued it.
#[derive(Debug)]
pub enum ModalEvent {
    Fetched(CallResult<PlayerModalSuccess>),
    NoteSaved(CallResult<GenericOk>),
    WhitelistChanged(CallResult<GenericOk>),
    BanApplied {
        submission: u64,
        result: CallResult<GenericOk>,
    },
    ActionRevoked(CallResult<GenericOk>),
}

/// Host flags injected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOptions {
    /// Touch hosts have no implicit Enter-to-save on the notes box.
    pub touch: bool,
    /// How long the last snapshot stays on screen after closing.
    pub close_grace: Duration,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            touch: false,
            close_grace: DEFAULT_CLOSE_GRACE,
        }
    }
}

pub struct PlayerModal<T: Transport> {
    options: ModalOptions,
    perms: Arc<dyn Capabilities>,
    teardown: CancellationToken,
    inbox: Inbox<ModalEvent>,
    session: ModalSession<T>,
    tabs: TabRouter,
    notes: NotesBox<T>,
    whitelist: WhitelistToggle<T>,
    ban: BanForm<T>,
    revoke: RevokeAction<T>,
    is_open: bool,
    reset_due: Option<Instant>,
}

impl<T: Transport> PlayerModal<T> {
    pub fn new(
        transport: T,
        runtime: Handle,
        toasts: Arc<dyn ToastSink>,
        perms: Arc<dyn Capabilities>,
        options: ModalOptions,
    ) -> Self {
        let (channel, inbox) = RequestChannel::new(transport, runtime, toasts);
        let teardown = CancellationToken::new();
        Self {
            session: ModalSession::new(&channel, &teardown),
            notes: NotesBox::new(&channel, &teardown),
            whitelist: WhitelistToggle::new(&channel, &teardown),
            ban: BanForm::new(&channel, &teardown),
            revoke: RevokeAction::new(&channel, &teardown),
            tabs: TabRouter::new(),
            options,
            perms,
            teardown,
            inbox,
            is_open: false,
            reset_due: None,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn options(&self) -> ModalOptions {
        self.options
    }

    pub fn perms(&self) -> &dyn Capabilities {
        self.perms.as_ref()
    }

    pub fn session(&self) -> &ModalSession<T> {
        &self.session
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    pub fn notes(&self) -> &NotesBox<T> {
        &self.notes
    }

    pub fn ban(&self) -> &BanForm<T> {
        &self.ban
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn title(&self) -> String {
        self.session.title()
    }

    /// Ban and warn counters of the loaded player, recomputed on each call.
    pub fn log_badges(&self) -> Option<[CounterBadge; 2]> {
        self.session
            .player()
            .map(|p| ActionTally::from_history(&p.action_history).log_badges())
    }

    pub fn whitelist_label(&self) -> Option<&'static str> {
        self.session.player().map(WhitelistToggle::<T>::label)
    }

    pub fn can_whitelist(&self) -> bool {
        WhitelistToggle::<T>::is_enabled(self.perms.as_ref())
    }

    pub fn can_ban(&self) -> bool {
        BanForm::<T>::is_enabled(self.perms.as_ref())
    }

    pub fn can_revoke(&self, action_id: &str) -> bool {
        self.session
            .player()
            .is_some_and(|p| RevokeAction::<T>::can_revoke(p, action_id, self.perms.as_ref()))
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Show the dialog for `reference`. Whatever the previous player left
    /// on screen is cleared before this returns.
    pub fn open(&mut self, reference: PlayerRef) {
        info!("opening player modal for {reference}");
        if self.reset_due.take().is_some() {
            self.tabs.reset();
        }
        self.is_open = true;
        self.notes.reset();
        self.ban.reset();
        self.session.set_reference(Some(reference));
    }

    /// Hide the dialog. The pending fetch is cancelled now; the snapshot and
    /// tab selection are reset once `close_grace` has passed (see [`Self::tick`]).
    pub fn close(&mut self, now: Instant) {
        if !self.is_open {
            return;
        }
        info!("closing player modal");
        self.is_open = false;
        self.session.set_reference(None);
        self.reset_due = Some(now + self.options.close_grace);
    }

    /// Run the deferred reset of a closed dialog when it is due.
    pub fn tick(&mut self, now: Instant) {
        let Some(due) = self.reset_due else {
            return;
        };
        if now < due {
            return;
        }
        debug!("close grace elapsed, resetting modal");
        self.reset_due = None;
        self.session.clear();
        self.tabs.reset();
        self.notes.reset();
        self.ban.reset();
    }

    /// Refresh the session from the backend.
    pub fn invalidate(&mut self) {
        self.session.invalidate();
    }

    /// Apply every result that has already arrived. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.inbox.try_next() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next live result without applying it.
    pub async fn next_event(&mut self) -> Option<ModalEvent> {
        self.inbox.next().await
    }

    pub fn apply(&mut self, event: ModalEvent) {
        match event {
            ModalEvent::Fetched(result) => {
                self.session.apply_fetch(result);
                if let Some(data) = self.session.data().cloned() {
                    self.notes.load(&data.player);
                }
            }
            ModalEvent::NoteSaved(result) => self.notes.on_saved(result),
            ModalEvent::WhitelistChanged(result) => {
                if WhitelistToggle::<T>::on_changed(&result) {
                    self.invalidate();
                }
            }
            ModalEvent::BanApplied { submission, result } => {
                if self.ban.on_applied(submission, &result) {
                    self.invalidate();
                }
            }
            ModalEvent::ActionRevoked(result) => {
                if RevokeAction::<T>::on_revoked(&result) {
                    self.invalidate();
                }
            }
        }
    }

    // ── Tabs ────────────────────────────────────────────────────────────

    pub fn select_tab(&mut self, tab: Tab) -> bool {
        self.tabs.select(tab)
    }

    pub fn next_tab(&mut self) {
        self.tabs.select_next();
    }

    pub fn prev_tab(&mut self) {
        self.tabs.select_prev();
    }

    /// The Info tab's "View" action on the log counters.
    pub fn view_history(&mut self) {
        self.tabs.select(Tab::History);
    }

    // ── Notes ───────────────────────────────────────────────────────────

    pub fn edit_note(&mut self, text: impl Into<String>) {
        self.notes.edit(text);
    }

    pub fn note_input(&mut self, ch: char) {
        self.notes.insert(ch);
    }

    pub fn note_backspace(&mut self) {
        self.notes.backspace();
    }

    /// Enter in the notes box. Returns whether a save was issued.
    pub fn note_enter(&mut self, shift: bool) -> Result<bool, DispatchError> {
        let reference = self.current_reference()?;
        self.notes.enter(shift, self.options.touch, &reference)
    }

    pub fn save_note(&mut self) -> Result<(), DispatchError> {
        let reference = self.current_reference()?;
        self.notes.save(&reference)
    }

    // ── Mutations ───────────────────────────────────────────────────────

    pub fn toggle_whitelist(&mut self) -> Result<(), DispatchError> {
        let (reference, data) = self.loaded()?;
        self.whitelist
            .toggle(&reference, &data.player, self.perms.as_ref())
    }

    pub fn ban_form(&mut self) -> &mut BanForm<T> {
        &mut self.ban
    }

    pub fn submit_ban(&mut self) -> Result<(), DispatchError> {
        let (reference, _) = self.loaded()?;
        self.ban.submit(&reference, self.perms.as_ref())
    }

    pub fn revoke(&mut self, action_id: &str) -> Result<(), DispatchError> {
        let (_, data) = self.loaded()?;
        self.revoke
            .revoke(&data.player, action_id, self.perms.as_ref())
    }

    fn current_reference(&self) -> Result<PlayerRef, DispatchError> {
        self.session
            .reference()
            .cloned()
            .ok_or(DispatchError::NotLoaded)
    }

    fn loaded(&self) -> Result<(PlayerRef, Arc<PlayerModalSuccess>), DispatchError> {
        let reference = self.current_reference()?;
        let data = self.session.data().cloned().ok_or(DispatchError::NotLoaded)?;
        Ok((reference, data))
    }
}

impl<T: Transport> Drop for PlayerModal<T> {
    fn drop(&mut self) {
        self.teardown.cancel();
    }
}
