pub mod channel;
pub mod client;
pub mod error;
pub mod request;
pub mod toast;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use channel::{CallOptions, Endpoint, Inbox, RequestChannel};
pub use client::ApiClient;
pub use error::{CallError, CallResult};
pub use request::{ApiRequest, Method};
pub use toast::{Toast, ToastId, ToastKind, ToastLog, ToastSink};
pub use transport::Transport;
pub use txpanel_api;
