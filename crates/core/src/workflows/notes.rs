use tokio_util::sync::CancellationToken;
use tracing::debug;
use txpanel_api::{GenericOk, PlayerRef, PlayerSnapshot, SAVE_NOTE_PATH, SaveNoteRequest};
use txpanel_api_client::{CallOptions, CallResult, Endpoint, Method, RequestChannel, Transport};

use crate::error::{DispatchError, ValidationError};
use crate::modal::ModalEvent;

pub const STATUS_EDITING: &str = "Press enter to save.";
pub const STATUS_SAVING: &str = "Saving...";
pub const STATUS_SAVED: &str = "Saved!";

/// Free-text notes editor of the Info tab.
///
/// The status line starts as the snapshot's notes log and then tracks the
/// editor: editing, saving, saved, or the error text of the last save.
/// Saving never refreshes the session.
pub struct NotesBox<T: Transport> {
    draft: String,
    status: String,
    enabled: bool,
    save: Endpoint<T, ModalEvent>,
}

impl<T: Transport> NotesBox<T> {
    pub fn new(channel: &RequestChannel<T, ModalEvent>, scope: &CancellationToken) -> Self {
        Self {
            draft: String::new(),
            status: String::new(),
            enabled: false,
            save: channel
                .endpoint(Method::Post, SAVE_NOTE_PATH)
                .abort_on_unmount(true)
                .scoped(scope),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Only registered players have notes.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn placeholder(&self) -> &'static str {
        if self.enabled {
            "Type your notes about the player."
        } else {
            "Cannot set notes for players that are not registered."
        }
    }

    /// Take draft and status from a freshly fetched snapshot.
    pub fn load(&mut self, player: &PlayerSnapshot) {
        self.draft = player.notes.clone().unwrap_or_default();
        self.status = player.notes_log.clone().unwrap_or_default();
        self.enabled = player.is_registered;
    }

    /// Forget the current player, dropping any save still in flight.
    pub fn reset(&mut self) {
        self.save.cancel();
        self.draft.clear();
        self.status.clear();
        self.enabled = false;
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.draft = text.into();
        self.status = STATUS_EDITING.to_string();
    }

    pub fn insert(&mut self, ch: char) {
        if !self.enabled {
            return;
        }
        self.draft.push(ch);
        self.status = STATUS_EDITING.to_string();
    }

    pub fn backspace(&mut self) {
        if !self.enabled {
            return;
        }
        self.draft.pop();
        self.status = STATUS_EDITING.to_string();
    }

    /// Enter submits unless Shift is held or the host is touch-driven, in
    /// which case it inserts a newline. Returns whether a save was issued.
    pub fn enter(
        &mut self,
        shift: bool,
        touch: bool,
        reference: &PlayerRef,
    ) -> Result<bool, DispatchError> {
        if shift || touch {
            self.insert('\n');
            return Ok(false);
        }
        self.save(reference).map(|()| true)
    }

    pub fn save(&mut self, reference: &PlayerRef) -> Result<(), DispatchError> {
        if !self.enabled {
            return Err(DispatchError::NotRegistered);
        }
        let note = self.draft.trim();
        if note.is_empty() {
            self.status = ValidationError::EmptyNote.to_string();
            return Err(ValidationError::EmptyNote.into());
        }
        let body = SaveNoteRequest {
            note: note.to_string(),
        };
        self.status = STATUS_SAVING.to_string();
        debug!("saving notes for {reference}");
        self.save.call(
            CallOptions::new().query(reference.query_pairs()).json(&body),
            ModalEvent::NoteSaved,
        );
        Ok(())
    }

    pub fn on_saved(&mut self, result: CallResult<GenericOk>) {
        self.status = match result {
            Ok(_) => STATUS_SAVED.to_string(),
            Err(e) => e.message().to_string(),
        };
    }
}
