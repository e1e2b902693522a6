use std::future::Future;

use serde_json::Value;

use crate::error::CallResult;
use crate::request::ApiRequest;

/// Something that can carry an [`ApiRequest`] to the backend.
///
/// Implementations resolve to the decoded JSON body on a successful round
/// trip and to [`crate::CallError::Transport`] otherwise. Classifying an
/// `{"error": ...}` body as a domain error is the channel's job, not the
/// transport's.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: ApiRequest) -> impl Future<Output = CallResult<Value>> + Send;
}
