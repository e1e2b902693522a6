//! Fetch lifecycle of the player modal.
//!
//! The session owns the player reference and the snapshot fetched for it.
//! Any change of reference and every [`ModalSession::invalidate`] issues a
//! fresh `GET /player`; the fetch endpoint aborts on supersession, so only
//! the latest fetch can ever reach [`ModalSession::apply_fetch`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use txpanel_api::{PLAYER_PATH, PlayerModalSuccess, PlayerRef, PlayerSnapshot};
use txpanel_api_client::{CallOptions, CallResult, Endpoint, Method, RequestChannel, Transport};

use crate::modal::ModalEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No reference, nothing fetched.
    Idle,
    Loading,
    Loaded(Arc<PlayerModalSuccess>),
    /// Fetch failed; holds the error text verbatim.
    Failed(String),
}

pub struct ModalSession<T: Transport> {
    reference: Option<PlayerRef>,
    phase: Phase,
    refresh_key: u64,
    fetches_issued: u64,
    fetch: Endpoint<T, ModalEvent>,
}

impl<T: Transport> ModalSession<T> {
    pub fn new(channel: &RequestChannel<T, ModalEvent>, scope: &CancellationToken) -> Self {
        Self {
            reference: None,
            phase: Phase::Idle,
            refresh_key: 0,
            fetches_issued: 0,
            fetch: channel
                .endpoint(Method::Get, PLAYER_PATH)
                .abort_on_unmount(true)
                .scoped(scope),
        }
    }

    pub fn reference(&self) -> Option<&PlayerRef> {
        self.reference.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    /// Number of `GET /player` calls issued over the session's lifetime.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn data(&self) -> Option<&Arc<PlayerModalSuccess>> {
        match &self.phase {
            Phase::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<&PlayerSnapshot> {
        self.data().map(|data| &data.player)
    }

    pub fn error_text(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(text) => Some(text),
            _ => None,
        }
    }

    /// Dialog title for the current phase.
    pub fn title(&self) -> String {
        match &self.phase {
            Phase::Loaded(data) => {
                let netid = data
                    .player
                    .netid
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "OFFLINE".to_string());
                format!("[{netid}] {}", data.player.display_name)
            }
            Phase::Failed(_) => "Error!".to_string(),
            Phase::Idle | Phase::Loading => "Loading...".to_string(),
        }
    }

    /// Point the session at another player. A different reference clears the
    /// current snapshot immediately and fetches; `None` stops any pending
    /// fetch and leaves what is displayed until [`Self::clear`].
    pub fn set_reference(&mut self, reference: Option<PlayerRef>) {
        if self.reference == reference {
            return;
        }
        self.reference = reference;
        if self.reference.is_some() {
            self.reload();
        } else {
            self.fetch.cancel();
            if self.is_loading() {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Refresh signal: re-fetch the current player.
    pub fn invalidate(&mut self) {
        self.refresh_key += 1;
        if self.reference.is_some() {
            self.reload();
        } else {
            debug!(refresh_key = self.refresh_key, "refresh without a player, nothing to fetch");
        }
    }

    pub fn apply_fetch(&mut self, result: CallResult<PlayerModalSuccess>) {
        if self.reference.is_none() {
            debug!("ignoring player data for a closed session");
            return;
        }
        self.phase = match result {
            Ok(data) => {
                debug!(player = %data.player.display_name, "player loaded");
                Phase::Loaded(Arc::new(data))
            }
            Err(e) => {
                warn!("failed to load player: {e}");
                Phase::Failed(e.message().to_string())
            }
        };
    }

    /// Wipe snapshot and error. Used once the dialog has finished closing.
    pub fn clear(&mut self) {
        self.fetch.cancel();
        self.reference = None;
        self.phase = Phase::Idle;
    }

    fn reload(&mut self) {
        let Some(reference) = &self.reference else {
            return;
        };
        self.phase = Phase::Loading;
        self.fetches_issued += 1;
        info!(refresh_key = self.refresh_key, "loading player {reference}");
        self.fetch.call(
            CallOptions::new().query(reference.query_pairs()),
            ModalEvent::Fetched,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{player, player_payload};
    use serde_json::json;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use txpanel_api_client::testing::ScriptedTransport;
    use txpanel_api_client::{Inbox, ToastLog};

    struct Harness {
        transport: ScriptedTransport,
        inbox: Inbox<ModalEvent>,
        session: ModalSession<ScriptedTransport>,
        _scope: CancellationToken,
    }

    impl Harness {
        fn new() -> Self {
            let transport = ScriptedTransport::new();
            let (channel, inbox) = RequestChannel::new(
                transport.clone(),
                Handle::current(),
                Arc::new(ToastLog::new()),
            );
            let scope = CancellationToken::new();
            let session = ModalSession::new(&channel, &scope);
            Self {
                transport,
                inbox,
                session,
                _scope: scope,
            }
        }

        async fn settle_one(&mut self) {
            match self.inbox.next().await {
                Some(ModalEvent::Fetched(result)) => self.session.apply_fetch(result),
                _ => panic!("expected a fetch result"),
            }
        }

        async fn drain(&mut self) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            while let Some(event) = self.inbox.try_next() {
                if let ModalEvent::Fetched(result) = event {
                    self.session.apply_fetch(result);
                }
            }
        }

        fn player_fetches(&self) -> usize {
            self.transport.sent_to(Method::Get, PLAYER_PATH).len()
        }
    }

    #[tokio::test]
    async fn reference_moves_idle_to_loading_to_loaded() {
        let mut h = Harness::new();
        h.transport
            .reply(Method::Get, PLAYER_PATH, player_payload(&player("tabby"), 100));
        assert_eq!(h.session.phase(), &Phase::Idle);

        h.session.set_reference(Some(PlayerRef::server("m", 7)));
        assert!(h.session.is_loading());
        assert_eq!(h.session.title(), "Loading...");

        h.settle_one().await;
        assert_eq!(h.session.player().unwrap().display_name, "tabby");
        assert_eq!(h.session.title(), "[7] tabby");
        let sent = h.transport.sent();
        assert_eq!(sent[0].query_value("mutex"), Some("m"));
        assert_eq!(sent[0].query_value("netid"), Some("7"));
    }

    #[tokio::test]
    async fn domain_error_is_surfaced_verbatim() {
        let mut h = Harness::new();
        h.transport
            .reply(Method::Get, PLAYER_PATH, json!({"error": "Player not found"}));

        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.settle_one().await;

        assert_eq!(h.session.error_text(), Some("Player not found"));
        assert!(h.session.player().is_none());
        assert_eq!(h.session.title(), "Error!");
    }

    #[tokio::test]
    async fn transport_error_fails_the_session() {
        let mut h = Harness::new();
        h.transport.fail(Method::Get, PLAYER_PATH, "request timed out");

        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.settle_one().await;

        assert_eq!(h.session.error_text(), Some("request timed out"));
    }

    #[tokio::test]
    async fn invalidate_issues_exactly_one_fetch() {
        let mut h = Harness::new();
        h.transport
            .always(Method::Get, PLAYER_PATH, player_payload(&player("tabby"), 100));
        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.settle_one().await;
        assert_eq!(h.player_fetches(), 1);

        h.session.invalidate();
        assert!(h.session.is_loading());
        assert!(h.session.player().is_none());
        h.settle_one().await;

        assert_eq!(h.session.refresh_key(), 1);
        assert_eq!(h.player_fetches(), 2);
        assert_eq!(h.session.fetches_issued(), 2);
        assert!(h.session.player().is_some());
    }

    #[tokio::test]
    async fn earlier_reference_never_overwrites_later_one() {
        let mut h = Harness::new();
        let first = h.transport.gate(Method::Get, PLAYER_PATH);
        h.transport
            .reply(Method::Get, PLAYER_PATH, player_payload(&player("second"), 100));

        h.session.set_reference(Some(PlayerRef::license("first")));
        h.session.set_reference(Some(PlayerRef::license("second")));
        h.settle_one().await;
        assert_eq!(h.session.player().unwrap().display_name, "second");

        first.resolve(player_payload(&player("first"), 100));
        h.drain().await;
        assert_eq!(h.session.player().unwrap().display_name, "second");
    }

    #[tokio::test]
    async fn superseded_result_is_dropped_even_if_it_lands_first() {
        let mut h = Harness::new();
        let first = h.transport.gate(Method::Get, PLAYER_PATH);
        let second = h.transport.gate(Method::Get, PLAYER_PATH);

        h.session.set_reference(Some(PlayerRef::license("first")));
        h.session.set_reference(Some(PlayerRef::license("second")));
        first.resolve(player_payload(&player("first"), 100));
        h.drain().await;
        assert!(h.session.is_loading());

        second.resolve(player_payload(&player("second"), 100));
        h.drain().await;
        assert_eq!(h.session.player().unwrap().display_name, "second");
    }

    #[tokio::test]
    async fn refresh_while_pending_replaces_the_pending_fetch() {
        let mut h = Harness::new();
        let stale = h.transport.gate(Method::Get, PLAYER_PATH);
        h.transport
            .reply(Method::Get, PLAYER_PATH, player_payload(&player("fresh"), 200));

        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.session.invalidate();
        h.settle_one().await;
        stale.resolve(player_payload(&player("stale"), 100));
        h.drain().await;

        assert_eq!(h.session.player().unwrap().display_name, "fresh");
        assert_eq!(h.session.data().unwrap().server_time, 200);
    }

    #[tokio::test]
    async fn same_reference_does_not_refetch() {
        let mut h = Harness::new();
        h.transport
            .always(Method::Get, PLAYER_PATH, player_payload(&player("tabby"), 100));
        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.settle_one().await;

        h.session.set_reference(Some(PlayerRef::license("abc")));
        assert!(!h.session.is_loading());
        assert_eq!(h.player_fetches(), 1);
    }

    #[tokio::test]
    async fn invalidate_without_reference_only_bumps_the_key() {
        let mut h = Harness::new();
        h.session.invalidate();
        assert_eq!(h.session.refresh_key(), 1);
        assert_eq!(h.session.phase(), &Phase::Idle);
        h.drain().await;
        assert_eq!(h.player_fetches(), 0);
    }

    #[tokio::test]
    async fn clearing_reference_cancels_pending_fetch() {
        let mut h = Harness::new();
        let gate = h.transport.gate(Method::Get, PLAYER_PATH);
        h.session.set_reference(Some(PlayerRef::license("abc")));
        h.session.set_reference(None);
        assert_eq!(h.session.phase(), &Phase::Idle);

        gate.resolve(player_payload(&player("late"), 100));
        h.drain().await;
        assert_eq!(h.session.phase(), &Phase::Idle);
    }
}
