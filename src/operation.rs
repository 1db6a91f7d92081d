//! Uniform failure reporting for service operations.
//!
//! Every service operation runs through [`handle_api_operation`], so callers
//! see one error type whatever the underlying client reported. The original
//! error stays reachable through [`std::error::Error::source`].

use std::error::Error as StdError;
use std::future::Future;

use thiserror::Error;

/// Boxed cause of an [`OperationError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failed operation, tagged with what the caller was trying to do.
///
/// Displays as `"<context>: <cause>"`.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct OperationError {
    context: String,
    #[source]
    source: BoxError,
}

impl OperationError {
    /// Wrap `cause` under a context message.
    pub fn new(context: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            context: context.into(),
            source: cause.into(),
        }
    }

    /// The context message supplied by the operation.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The underlying failure.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// The underlying failure as a concrete type, if it is one.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    /// Take the underlying failure back out.
    pub fn into_cause(self) -> BoxError {
        self.source
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Run `operation` and normalize its failure under `context`.
///
/// A successful result is returned untouched. A failure becomes an
/// [`OperationError`] that owns the original error as its source. Nothing is
/// retried or logged here.
pub async fn handle_api_operation<F, Fut, T, E>(operation: F, context: &str) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: StdError + Send + Sync + 'static,
{
    operation()
        .await
        .map_err(|cause| OperationError::new(context, cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("boom #{0}")]
    struct Boom(u32);

    #[test]
    fn test_success_passes_value_through() {
        let value = vec![1, 2, 3];
        let expected = value.clone();
        let result = tokio_test::block_on(handle_api_operation(
            move || async move { Ok::<_, Boom>(value) },
            "Error doing things",
        ));
        assert_eq!(result.unwrap(), expected);
    }

    #[test]
    fn test_failure_message_combines_context_and_cause() {
        let err = tokio_test::block_on(handle_api_operation(
            || async { Err::<(), _>(Boom(7)) },
            "Error doing things",
        ))
        .unwrap_err();

        assert_eq!(err.to_string(), "Error doing things: boom #7");
        assert_eq!(err.context(), "Error doing things");
    }

    #[test]
    fn test_failure_keeps_original_cause() {
        let err = tokio_test::block_on(handle_api_operation(
            || async { Err::<(), _>(Boom(42)) },
            "Error fetching issue",
        ))
        .unwrap_err();

        assert_eq!(err.downcast_ref::<Boom>(), Some(&Boom(42)));
        let source = StdError::source(&err).unwrap();
        assert_eq!(source.to_string(), "boom #42");
        assert_eq!(err.into_cause().downcast::<Boom>().unwrap(), Box::new(Boom(42)));
    }

    #[test]
    fn test_cause_is_not_stringified() {
        let err = tokio_test::block_on(handle_api_operation(
            || async { Err::<(), _>(ApiError::NotFound("A-1".to_string())) },
            "Error fetching issue",
        ))
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotFound(key)) if key == "A-1"
        ));
        assert!(err.downcast_ref::<Boom>().is_none());
    }

    #[test]
    fn test_operation_runs_once() {
        let mut calls = 0;
        let result = tokio_test::block_on(handle_api_operation(
            || {
                calls += 1;
                async { Err::<(), _>(Boom(1)) }
            },
            "Error",
        ));
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
