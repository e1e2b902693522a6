use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use txpanel_api::{GenericOk, PlayerRef, PlayerSnapshot, WHITELIST_PATH, WhitelistRequest};
use txpanel_api_client::{CallOptions, CallResult, Endpoint, Method, RequestChannel, Transport};

use crate::error::DispatchError;
use crate::modal::ModalEvent;
use crate::perms::{Capabilities, PERM_WHITELIST};

/// Whitelist button of the Info tab. Sends the inverse of the snapshot's
/// whitelisted flag; a successful change must refresh the session.
pub struct WhitelistToggle<T: Transport> {
    toggle: Endpoint<T, ModalEvent>,
}

impl<T: Transport> WhitelistToggle<T> {
    pub fn new(channel: &RequestChannel<T, ModalEvent>, scope: &CancellationToken) -> Self {
        Self {
            toggle: channel.endpoint(Method::Post, WHITELIST_PATH).scoped(scope),
        }
    }

    pub fn label(player: &PlayerSnapshot) -> &'static str {
        if player.is_whitelisted() {
            "Remove"
        } else {
            "Add WL"
        }
    }

    pub fn is_enabled(perms: &dyn Capabilities) -> bool {
        perms.has_perm(PERM_WHITELIST)
    }

    pub fn toggle(
        &mut self,
        reference: &PlayerRef,
        player: &PlayerSnapshot,
        perms: &dyn Capabilities,
    ) -> Result<(), DispatchError> {
        if !Self::is_enabled(perms) {
            debug!("whitelist toggle ignored: missing {PERM_WHITELIST}");
            return Err(DispatchError::Forbidden(PERM_WHITELIST));
        }
        let status = !player.is_whitelisted();
        info!(status, "changing whitelist for {reference}");
        self.toggle.call(
            CallOptions::new()
                .query(reference.query_pairs())
                .json(&WhitelistRequest { status })
                .loading_toast("Updating whitelist...")
                .success_toast("Whitelist changed."),
            ModalEvent::WhitelistChanged,
        );
        Ok(())
    }

    /// Whether the settled call asks for a session refresh.
    pub fn on_changed(result: &CallResult<GenericOk>) -> bool {
        matches!(result, Ok(GenericOk { success: true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perms::AdminPerms;
    use crate::testing::{error_payload, ok_payload, player};
    use std::sync::Arc;
    use tokio::runtime::Handle;
    use txpanel_api_client::testing::ScriptedTransport;
    use txpanel_api_client::{ToastKind, ToastLog};

    #[tokio::test]
    async fn sends_inverse_flag_and_requests_refresh() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Post, WHITELIST_PATH, ok_payload());
        let toasts = Arc::new(ToastLog::new());
        let (channel, mut inbox) =
            RequestChannel::new(transport.clone(), Handle::current(), toasts.clone());
        let scope = CancellationToken::new();
        let mut wl = WhitelistToggle::new(&channel, &scope);

        let p = player("tabby");
        assert_eq!(WhitelistToggle::<ScriptedTransport>::label(&p), "Add WL");
        wl.toggle(
            &PlayerRef::license("abc"),
            &p,
            &AdminPerms::new([PERM_WHITELIST]),
        )
        .unwrap();
        assert_eq!(toasts.latest().unwrap().message, "Updating whitelist...");

        let Some(ModalEvent::WhitelistChanged(result)) = inbox.next().await else {
            panic!("expected whitelist result");
        };
        assert!(WhitelistToggle::<ScriptedTransport>::on_changed(&result));
        assert_eq!(
            transport.sent()[0].body,
            Some(serde_json::json!({"status": true}))
        );
        let toast = toasts.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Whitelist changed.");
    }

    #[tokio::test]
    async fn missing_capability_dispatches_nothing() {
        let transport = ScriptedTransport::new();
        let toasts = Arc::new(ToastLog::new());
        let (channel, _inbox) =
            RequestChannel::new(transport.clone(), Handle::current(), toasts.clone());
        let scope = CancellationToken::new();
        let mut wl = WhitelistToggle::new(&channel, &scope);

        let deny = |_: &str| false;
        let err = wl
            .toggle(&PlayerRef::license("abc"), &player("tabby"), &deny)
            .unwrap_err();
        assert_eq!(err, DispatchError::Forbidden(PERM_WHITELIST));
        tokio::task::yield_now().await;
        assert!(transport.sent().is_empty());
        assert!(toasts.visible().is_empty());
    }

    #[test]
    fn domain_error_does_not_refresh() {
        let result: CallResult<GenericOk> =
            txpanel_api_client::channel::decode(error_payload("no permission"));
        assert!(!WhitelistToggle::<ScriptedTransport>::on_changed(&result));
    }
}
