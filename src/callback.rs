//! Completion-callback adapter for callers that expect one
//!
//! Operations are plain futures. Callers that want a callback wrap the
//! future; the callback sees exactly the outcome the future resolves to.

use crate::error::UserResult;
use std::future::Future;

/// Await `future`, hand its outcome to `callback`, then return it
pub async fn with_callback<T, F, C>(future: F, callback: C) -> UserResult<T>
where
    F: Future<Output = UserResult<T>>,
    C: FnOnce(&UserResult<T>),
{
    let result = future.await;
    callback(&result);
    result
}
