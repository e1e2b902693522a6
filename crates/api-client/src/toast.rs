use std::sync::Mutex;

/// Identifies a toast so a loading toast can be replaced when its call settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

/// Receiver of toast notifications. Showing a toast with an id that is
/// already displayed replaces it.
pub trait ToastSink: Send + Sync {
    fn show(&self, toast: Toast);
    fn dismiss(&self, id: ToastId);
}

/// In-memory sink keeping the visible toasts in display order.
#[derive(Debug, Default)]
pub struct ToastLog {
    visible: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.visible
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    /// Most recent toast, if any.
    pub fn latest(&self) -> Option<Toast> {
        self.visible
            .lock()
            .ok()
            .and_then(|toasts| toasts.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut toasts) = self.visible.lock() {
            toasts.clear();
        }
    }
}

impl ToastSink for ToastLog {
    fn show(&self, toast: Toast) {
        let Ok(mut toasts) = self.visible.lock() else {
            return;
        };
        match toasts.iter_mut().find(|t| t.id == toast.id) {
            Some(existing) => *existing = toast,
            None => toasts.push(toast),
        }
    }

    fn dismiss(&self, id: ToastId) {
        if let Ok(mut toasts) = self.visible.lock() {
            toasts.retain(|t| t.id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u64, kind: ToastKind, message: &str) -> Toast {
        Toast {
            id: ToastId(id),
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn same_id_replaces_in_place() {
        let log = ToastLog::new();
        log.show(toast(1, ToastKind::Loading, "Updating whitelist..."));
        log.show(toast(2, ToastKind::Error, "other"));
        log.show(toast(1, ToastKind::Success, "Whitelist changed."));

        let visible = log.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].kind, ToastKind::Success);
        assert_eq!(visible[0].message, "Whitelist changed.");
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let log = ToastLog::new();
        log.show(toast(1, ToastKind::Loading, "a"));
        log.show(toast(2, ToastKind::Loading, "b"));
        log.dismiss(ToastId(1));
        assert_eq!(log.latest().map(|t| t.id), Some(ToastId(2)));
        assert_eq!(log.visible().len(), 1);
    }
}
