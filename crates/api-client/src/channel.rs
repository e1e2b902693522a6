//! Cancellable request channel.
//!
//! An [`Endpoint`] is one logical caller of one backend route. Calls run as
//! tokio tasks and report back through the [`Inbox`] returned by
//! [`RequestChannel::new`], which the owner drains on its own thread. Each
//! call runs under a cancellation token derived from the endpoint's scope;
//! once that token is cancelled the call is never delivered, not even when
//! its result was already queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{CallError, CallResult};
use crate::request::{ApiRequest, Method};
use crate::toast::{Toast, ToastId, ToastKind, ToastSink};
use crate::transport::Transport;

/// Shared half of the channel: the transport, the runtime calls are spawned
/// on, and the sending side of the inbox.
pub struct RequestChannel<T, M> {
    transport: Arc<T>,
    runtime: Handle,
    outbox: mpsc::UnboundedSender<Delivery<M>>,
    toasts: Arc<dyn ToastSink>,
    toast_ids: Arc<AtomicU64>,
}

impl<T, M> Clone for RequestChannel<T, M> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            runtime: self.runtime.clone(),
            outbox: self.outbox.clone(),
            toasts: Arc::clone(&self.toasts),
            toast_ids: Arc::clone(&self.toast_ids),
        }
    }
}

impl<T: Transport, M: Send + 'static> RequestChannel<T, M> {
    pub fn new(transport: T, runtime: Handle, toasts: Arc<dyn ToastSink>) -> (Self, Inbox<M>) {
        let (outbox, rx) = mpsc::unbounded_channel();
        let channel = Self {
            transport: Arc::new(transport),
            runtime,
            outbox,
            toasts: Arc::clone(&toasts),
            toast_ids: Arc::new(AtomicU64::new(1)),
        };
        (channel, Inbox { rx, toasts })
    }

    /// A new logical caller for `method path`.
    pub fn endpoint(&self, method: Method, path: impl Into<String>) -> Endpoint<T, M> {
        Endpoint {
            channel: self.clone(),
            method,
            path: path.into(),
            abort_on_unmount: false,
            scope: CancellationToken::new(),
            inflight: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_toast_id(&self) -> ToastId {
        ToastId(self.toast_ids.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-call parameters.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    query: Vec<(String, String)>,
    body: Option<Value>,
    body_error: Option<String>,
    loading_message: Option<String>,
    success_message: Option<String>,
    toast_errors: bool,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Flat JSON body. An encoding failure is delivered as a transport error.
    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.body_error = Some(e.to_string()),
        }
        self
    }

    /// Show a loading toast at dispatch; it is replaced when the call settles.
    pub fn loading_toast(mut self, message: impl Into<String>) -> Self {
        self.loading_message = Some(message.into());
        self
    }

    /// Toast `message` on success and the error text on failure.
    pub fn success_toast(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self.toast_errors = true;
        self
    }

    pub fn error_toast(mut self) -> Self {
        self.toast_errors = true;
        self
    }
}

/// One logical caller of one backend route.
pub struct Endpoint<T, M> {
    channel: RequestChannel<T, M>,
    method: Method,
    path: String,
    abort_on_unmount: bool,
    scope: CancellationToken,
    inflight: Option<CancellationToken>,
}

impl<T: Transport, M: Send + 'static> Endpoint<T, M> {
    /// When enabled, a new call supersedes (cancels) the previous one and
    /// dropping the endpoint cancels whatever is still in flight.
    pub fn abort_on_unmount(mut self, enabled: bool) -> Self {
        self.abort_on_unmount = enabled;
        self
    }

    /// Derive every call's token from `scope`, so cancelling it tears down
    /// all of this endpoint's calls.
    pub fn scoped(mut self, scope: &CancellationToken) -> Self {
        self.scope = scope.clone();
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Issue a call. `on_settle` maps the outcome into the owner's message
    /// type; it is not invoked for aborted calls.
    pub fn call<R, F>(&mut self, options: CallOptions, on_settle: F)
    where
        R: DeserializeOwned + Send + 'static,
        F: FnOnce(CallResult<R>) -> M + Send + 'static,
    {
        let token = self.scope.child_token();
        if self.abort_on_unmount {
            if let Some(previous) = self.inflight.replace(token.clone()) {
                if !previous.is_cancelled() {
                    debug!("superseding in-flight {} {}", self.method, self.path);
                }
                previous.cancel();
            }
        }

        let loading = options.loading_message.map(|message| {
            let id = self.channel.next_toast_id();
            self.channel.toasts.show(Toast {
                id,
                kind: ToastKind::Loading,
                message,
            });
            id
        });
        let settle = SettlePolicy {
            toast_id: loading.unwrap_or_else(|| self.channel.next_toast_id()),
            has_loading: loading.is_some(),
            success_message: options.success_message,
            toast_errors: options.toast_errors,
        };

        let request = ApiRequest {
            method: self.method,
            path: self.path.clone(),
            query: options.query,
            body: options.body,
        };
        let route = request.route();
        let body_error = options.body_error;
        let transport = Arc::clone(&self.channel.transport);
        let outbox = self.channel.outbox.clone();
        let toasts = Arc::clone(&self.channel.toasts);

        debug!("dispatching {route}");
        self.channel.runtime.spawn(async move {
            let aborted = token.clone();
            let sent = async {
                if let Some(err) = body_error {
                    return Err(CallError::Transport(format!(
                        "failed to encode request body: {err}"
                    )));
                }
                transport.send(request).await
            };

            let payload = tokio::select! {
                biased;
                _ = aborted.cancelled() => {
                    debug!("{route} aborted");
                    // The inbox may be gone with its owner, so dismiss here.
                    if settle.has_loading {
                        toasts.dismiss(settle.toast_id);
                    }
                    return;
                }
                payload = sent => payload,
            };

            let result = payload.and_then(decode::<R>);
            match &result {
                Ok(_) => debug!("{route} settled"),
                Err(CallError::Domain(msg)) => debug!("{route} rejected: {msg}"),
                Err(CallError::Transport(msg)) => warn!("{route} failed: {msg}"),
            }
            let toast = settle.update_for(&result);
            let _ = outbox.send(Delivery {
                token,
                route,
                message: Some(on_settle(result)),
                toast,
            });
        });
    }

    /// Cancel the in-flight call tracked by an aborting endpoint.
    pub fn cancel(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl<T, M> Drop for Endpoint<T, M> {
    fn drop(&mut self) {
        if self.abort_on_unmount {
            if let Some(token) = self.inflight.take() {
                token.cancel();
            }
        }
    }
}

/// Classify a successful round trip: an `error` field makes it a domain
/// error, anything else must decode as the success shape.
pub fn decode<R: DeserializeOwned>(payload: Value) -> CallResult<R> {
    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(CallError::Domain(message));
    }
    serde_json::from_value(payload)
        .map_err(|e| CallError::Transport(format!("unexpected response shape: {e}")))
}

struct SettlePolicy {
    toast_id: ToastId,
    has_loading: bool,
    success_message: Option<String>,
    toast_errors: bool,
}

impl SettlePolicy {
    fn update_for<R>(&self, result: &CallResult<R>) -> Option<ToastUpdate> {
        match result {
            Ok(_) => match &self.success_message {
                Some(message) => Some(ToastUpdate::Show(Toast {
                    id: self.toast_id,
                    kind: ToastKind::Success,
                    message: message.clone(),
                })),
                None if self.has_loading => Some(ToastUpdate::Dismiss(self.toast_id)),
                None => None,
            },
            Err(e) if self.toast_errors || self.has_loading => Some(ToastUpdate::Show(Toast {
                id: self.toast_id,
                kind: ToastKind::Error,
                message: e.message().to_string(),
            })),
            Err(_) => None,
        }
    }
}

enum ToastUpdate {
    Show(Toast),
    Dismiss(ToastId),
}

impl ToastUpdate {
    fn id(&self) -> ToastId {
        match self {
            Self::Show(toast) => toast.id,
            Self::Dismiss(id) => *id,
        }
    }
}

struct Delivery<M> {
    token: CancellationToken,
    route: String,
    message: Option<M>,
    toast: Option<ToastUpdate>,
}

/// Receiving half of the channel, drained by the owner.
pub struct Inbox<M> {
    rx: mpsc::UnboundedReceiver<Delivery<M>>,
    toasts: Arc<dyn ToastSink>,
}

impl<M> Inbox<M> {
    /// Next live message without waiting.
    pub fn try_next(&mut self) -> Option<M> {
        while let Ok(delivery) = self.rx.try_recv() {
            if let Some(message) = self.open(delivery) {
                return Some(message);
            }
        }
        None
    }

    /// Wait for the next live message.
    pub async fn next(&mut self) -> Option<M> {
        while let Some(delivery) = self.rx.recv().await {
            if let Some(message) = self.open(delivery) {
                return Some(message);
            }
        }
        None
    }

    fn open(&self, delivery: Delivery<M>) -> Option<M> {
        if delivery.token.is_cancelled() {
            if delivery.message.is_some() {
                debug!("dropping superseded response for {}", delivery.route);
            }
            if let Some(update) = &delivery.toast {
                self.toasts.dismiss(update.id());
            }
            return None;
        }
        match delivery.toast {
            Some(ToastUpdate::Show(toast)) => self.toasts.show(toast),
            Some(ToastUpdate::Dismiss(id)) => self.toasts.dismiss(id),
            None => {}
        }
        delivery.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::toast::ToastLog;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        name: String,
    }

    type Channel = RequestChannel<ScriptedTransport, (&'static str, CallResult<Echo>)>;

    fn channel(
        transport: &ScriptedTransport,
    ) -> (
        Channel,
        Inbox<(&'static str, CallResult<Echo>)>,
        Arc<ToastLog>,
    ) {
        let toasts = Arc::new(ToastLog::new());
        let (channel, inbox) =
            RequestChannel::new(transport.clone(), Handle::current(), toasts.clone());
        (channel, inbox, toasts)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn success_payload_is_decoded() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Get, "/player", json!({"name": "tabby"}));
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Get, "/player");
        endpoint.call(
            CallOptions::new().query(vec![("license".into(), "abc".into())]),
            |r| ("a", r),
        );

        let (tag, result) = inbox.next().await.unwrap();
        assert_eq!(tag, "a");
        assert_eq!(result.unwrap().name, "tabby");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].query_value("license"), Some("abc"));
    }

    #[tokio::test]
    async fn error_field_is_a_domain_error() {
        let transport = ScriptedTransport::new();
        transport.reply(
            Method::Post,
            "/player/save_note",
            json!({"error": "player not registered"}),
        );
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Post, "/player/save_note");
        endpoint.call(CallOptions::new().json(&json!({"note": "x"})), |r| ("n", r));

        let (_, result) = inbox.next().await.unwrap();
        assert_eq!(
            result.unwrap_err(),
            CallError::Domain("player not registered".into())
        );
        assert_eq!(transport.sent()[0].body, Some(json!({"note": "x"})));
    }

    #[tokio::test]
    async fn transport_failure_is_not_a_domain_error() {
        let transport = ScriptedTransport::new();
        transport.fail(Method::Get, "/player", "connection reset");
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Get, "/player");
        endpoint.call(CallOptions::new(), |r| ("a", r));

        let (_, result) = inbox.next().await.unwrap();
        assert_eq!(
            result.unwrap_err(),
            CallError::Transport("connection reset".into())
        );
    }

    #[tokio::test]
    async fn new_call_supersedes_pending_call_on_aborting_endpoint() {
        let transport = ScriptedTransport::new();
        let first = transport.gate(Method::Get, "/player");
        transport.reply(Method::Get, "/player", json!({"name": "second"}));
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Get, "/player").abort_on_unmount(true);
        endpoint.call(CallOptions::new(), |r| ("first", r));
        endpoint.call(CallOptions::new(), |r| ("second", r));

        let (tag, result) = inbox.next().await.unwrap();
        assert_eq!(tag, "second");
        assert_eq!(result.unwrap().name, "second");

        first.resolve(json!({"name": "first"}));
        settle().await;
        assert!(inbox.try_next().is_none());
    }

    #[tokio::test]
    async fn queued_result_is_dropped_once_cancelled() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Get, "/player", json!({"name": "stale"}));
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Get, "/player").abort_on_unmount(true);
        endpoint.call(CallOptions::new(), |r| ("stale", r));
        settle().await;
        endpoint.cancel();

        assert!(inbox.try_next().is_none());
    }

    #[tokio::test]
    async fn non_aborting_endpoint_delivers_every_call() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, "/player/whitelist", json!({"name": "one"}));
        transport.reply(Method::Post, "/player/whitelist", json!({"name": "two"}));
        let (channel, mut inbox, _) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Post, "/player/whitelist");
        endpoint.call(CallOptions::new(), |r| ("1", r));
        endpoint.call(CallOptions::new(), |r| ("2", r));

        let mut tags = vec![inbox.next().await.unwrap().0, inbox.next().await.unwrap().0];
        tags.sort();
        assert_eq!(tags, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn scope_cancellation_tears_down_calls() {
        let transport = ScriptedTransport::new();
        let gate = transport.gate(Method::Post, "/player/ban");
        let (channel, mut inbox, _) = channel(&transport);
        let scope = CancellationToken::new();

        let mut endpoint = channel.endpoint(Method::Post, "/player/ban").scoped(&scope);
        endpoint.call(CallOptions::new(), |r| ("ban", r));
        scope.cancel();
        gate.resolve(json!({"name": "late"}));
        settle().await;

        assert!(inbox.try_next().is_none());
    }

    #[tokio::test]
    async fn teardown_dismisses_loading_toast_without_an_inbox() {
        let transport = ScriptedTransport::new();
        let _gate = transport.gate(Method::Post, "/player/ban");
        let (channel, inbox, toasts) = channel(&transport);
        let scope = CancellationToken::new();

        let mut endpoint = channel.endpoint(Method::Post, "/player/ban").scoped(&scope);
        endpoint.call(
            CallOptions::new().loading_toast("Banning player..."),
            |r| ("ban", r),
        );
        assert_eq!(toasts.visible().len(), 1);

        drop(inbox);
        scope.cancel();
        settle().await;

        assert!(toasts.visible().is_empty());
    }

    #[tokio::test]
    async fn loading_toast_is_replaced_on_settle() {
        let transport = ScriptedTransport::new();
        let gate = transport.gate(Method::Post, "/player/whitelist");
        let (channel, mut inbox, toasts) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Post, "/player/whitelist");
        endpoint.call(
            CallOptions::new()
                .loading_toast("Updating whitelist...")
                .success_toast("Whitelist changed."),
            |r| ("wl", r),
        );
        let loading = toasts.latest().unwrap();
        assert_eq!(loading.kind, ToastKind::Loading);

        gate.resolve(json!({"name": "ok"}));
        inbox.next().await.unwrap();

        let visible = toasts.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, loading.id);
        assert_eq!(visible[0].kind, ToastKind::Success);
        assert_eq!(visible[0].message, "Whitelist changed.");
    }

    #[tokio::test]
    async fn domain_error_replaces_loading_toast_with_message() {
        let transport = ScriptedTransport::new();
        transport.reply(
            Method::Post,
            "/player/whitelist",
            json!({"error": "no permission"}),
        );
        let (channel, mut inbox, toasts) = channel(&transport);

        let mut endpoint = channel.endpoint(Method::Post, "/player/whitelist");
        endpoint.call(
            CallOptions::new()
                .loading_toast("Updating whitelist...")
                .success_toast("Whitelist changed."),
            |r| ("wl", r),
        );
        inbox.next().await.unwrap();

        let latest = toasts.latest().unwrap();
        assert_eq!(latest.kind, ToastKind::Error);
        assert_eq!(latest.message, "no permission");
    }

    #[test]
    fn decode_ignores_null_error_field() {
        let echo: Echo = decode(json!({"name": "x", "error": null})).unwrap();
        assert_eq!(echo.name, "x");
        let err = decode::<Echo>(json!({"unexpected": true})).unwrap_err();
        assert!(!err.is_domain());
    }
}
