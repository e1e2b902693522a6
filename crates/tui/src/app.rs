use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;
use txpanel_api::PlayerRef;
use txpanel_api_client::{ToastId, ToastKind, ToastLog, ToastSink, Transport};
use txpanel_core::history::newest_first;
use txpanel_core::{DispatchError, PlayerModal, Tab};

/// How long a settled toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Error,
    Info,
}

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tabs,
    Notes,
    BanReason,
}

pub struct App<T: Transport> {
    pub modal: PlayerModal<T>,
    pub toasts: Arc<ToastLog>,
    pub reference: PlayerRef,
    pub focus: Focus,
    pub history_index: usize,
    pub flash_message: Option<(String, FlashLevel)>,
    toast_seen: HashMap<ToastId, (ToastKind, Instant)>,
}

impl<T: Transport> App<T> {
    pub fn new(modal: PlayerModal<T>, toasts: Arc<ToastLog>, reference: PlayerRef) -> Self {
        Self {
            modal,
            toasts,
            reference,
            focus: Focus::Tabs,
            history_index: 0,
            flash_message: None,
            toast_seen: HashMap::new(),
        }
    }

    pub fn open(&mut self) {
        self.focus = Focus::Tabs;
        self.history_index = 0;
        self.modal.open(self.reference.clone());
    }

    /// Apply settled calls, run the modal's deferred reset and expire toasts.
    pub fn tick(&mut self, now: Instant) {
        self.modal.pump();
        self.modal.tick(now);

        let rows = self.history_len();
        if self.history_index >= rows {
            self.history_index = rows.saturating_sub(1);
        }

        let visible = self.toasts.visible();
        self.toast_seen
            .retain(|id, _| visible.iter().any(|t| t.id == *id));
        for toast in visible {
            let seen = self
                .toast_seen
                .entry(toast.id)
                .or_insert((toast.kind, now));
            if seen.0 != toast.kind {
                *seen = (toast.kind, now);
            }
            if toast.kind != ToastKind::Loading && now.duration_since(seen.1) >= TOAST_TTL {
                self.toasts.dismiss(toast.id);
            }
        }
    }

    /// Handle a key press. Returns `true` to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        self.flash_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if !self.modal.is_open() {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => true,
                KeyCode::Char('o') | KeyCode::Enter => {
                    self.open();
                    false
                }
                _ => false,
            };
        }

        match self.focus {
            Focus::Notes => self.handle_notes_key(key),
            Focus::BanReason => self.handle_ban_reason_key(key),
            Focus::Tabs => self.handle_tab_key(key, now),
        }
        false
    }

    fn handle_tab_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.focus = Focus::Tabs;
                self.modal.close(now);
                return;
            }
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.modal.next_tab();
                return;
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.modal.prev_tab();
                return;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.modal.select_tab(Tab::ALL[idx]);
                return;
            }
            KeyCode::Char('r') => {
                self.modal.invalidate();
                self.flash_info("Refreshing player...");
                return;
            }
            _ => {}
        }

        match self.modal.active_tab() {
            Tab::Info => match key.code {
                KeyCode::Char('w') => {
                    let result = self.modal.toggle_whitelist();
                    self.report(result);
                }
                KeyCode::Char('v') => self.modal.view_history(),
                KeyCode::Char('n') | KeyCode::Enter => {
                    if self.modal.notes().is_enabled() {
                        self.focus = Focus::Notes;
                    } else {
                        self.report(Err(DispatchError::NotRegistered));
                    }
                }
                _ => {}
            },
            Tab::History => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    if self.history_index + 1 < self.history_len() {
                        self.history_index += 1;
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.history_index = self.history_index.saturating_sub(1);
                }
                KeyCode::Char('x') => {
                    if let Some(id) = self.selected_action_id() {
                        let result = self.modal.revoke(&id);
                        self.report(result);
                    }
                }
                _ => {}
            },
            Tab::Ids => {}
            Tab::Ban => match key.code {
                KeyCode::Char('e') | KeyCode::Enter => {
                    if self.modal.can_ban() {
                        self.focus = Focus::BanReason;
                    } else {
                        self.flash_error("You don't have permission to ban players.");
                    }
                }
                KeyCode::Char('[') => self.modal.ban_form().prev_duration(),
                KeyCode::Char(']') => self.modal.ban_form().next_duration(),
                KeyCode::Char('b') => {
                    let result = self.modal.submit_ban();
                    self.report(result);
                }
                _ => {}
            },
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Tabs,
            KeyCode::Enter => {
                let shift = key.modifiers.contains(KeyModifiers::SHIFT);
                if let Err(e) = self.modal.note_enter(shift) {
                    self.report(Err(e));
                }
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let result = self.modal.save_note();
                self.report(result);
            }
            KeyCode::Backspace => self.modal.note_backspace(),
            KeyCode::Char(c) => self.modal.note_input(c),
            _ => {}
        }
    }

    fn handle_ban_reason_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Tabs,
            KeyCode::Enter => {
                let result = self.modal.submit_ban();
                if result.is_ok() {
                    self.focus = Focus::Tabs;
                }
                self.report(result);
            }
            KeyCode::Backspace => self.modal.ban_form().backspace(),
            KeyCode::Char(c) => self.modal.ban_form().insert(c),
            _ => {}
        }
    }

    fn history_len(&self) -> usize {
        self.modal
            .session()
            .player()
            .map_or(0, |p| p.action_history.len())
    }

    pub fn selected_action_id(&self) -> Option<String> {
        let player = self.modal.session().player()?;
        newest_first(&player.action_history)
            .get(self.history_index)
            .map(|entry| entry.id.clone())
    }

    fn report(&mut self, result: Result<(), DispatchError>) {
        if let Err(e) = result {
            debug!("action not dispatched: {e}");
            self.flash_error(e.to_string());
        }
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Error));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Info));
    }
}
