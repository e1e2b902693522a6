use tokio_util::sync::CancellationToken;
use tracing::info;
use txpanel_api::{ActionKind, GenericOk, PlayerSnapshot, REVOKE_ACTION_PATH, RevokeActionRequest};
use txpanel_api_client::{CallOptions, CallResult, Endpoint, Method, RequestChannel, Transport};

use crate::error::DispatchError;
use crate::modal::ModalEvent;
use crate::perms::{ALL_PERMISSIONS, Capabilities, PERM_BAN, PERM_WARN};

/// Permission needed to revoke an action of `kind`.
pub fn revoke_permission(kind: &ActionKind) -> &'static str {
    match kind {
        ActionKind::Ban => PERM_BAN,
        ActionKind::Warn => PERM_WARN,
        ActionKind::Other(_) => ALL_PERMISSIONS,
    }
}

/// Revoke button of the History tab.
pub struct RevokeAction<T: Transport> {
    revoke: Endpoint<T, ModalEvent>,
}

impl<T: Transport> RevokeAction<T> {
    pub fn new(channel: &RequestChannel<T, ModalEvent>, scope: &CancellationToken) -> Self {
        Self {
            revoke: channel
                .endpoint(Method::Post, REVOKE_ACTION_PATH)
                .scoped(scope),
        }
    }

    pub fn can_revoke(
        player: &PlayerSnapshot,
        action_id: &str,
        perms: &dyn Capabilities,
    ) -> bool {
        player
            .action_history
            .iter()
            .find(|a| a.id == action_id)
            .is_some_and(|a| !a.is_revoked() && perms.has_perm(revoke_permission(&a.kind)))
    }

    pub fn revoke(
        &mut self,
        player: &PlayerSnapshot,
        action_id: &str,
        perms: &dyn Capabilities,
    ) -> Result<(), DispatchError> {
        let action = player
            .action_history
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| DispatchError::UnknownAction(action_id.to_string()))?;
        if action.is_revoked() {
            return Err(DispatchError::AlreadyRevoked(action_id.to_string()));
        }
        let perm = revoke_permission(&action.kind);
        if !perms.has_perm(perm) {
            return Err(DispatchError::Forbidden(perm));
        }

        info!(kind = %action.kind, "revoking action {action_id}");
        self.revoke.call(
            CallOptions::new()
                .json(&RevokeActionRequest {
                    action_id: action_id.to_string(),
                })
                .loading_toast("Revoking action...")
                .success_toast("Action revoked."),
            ModalEvent::ActionRevoked,
        );
        Ok(())
    }

    pub fn on_revoked(result: &CallResult<GenericOk>) -> bool {
        result.is_ok()
    }
}
