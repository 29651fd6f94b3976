use std::future::Future;

use super::error::BoxError;

/// Typed per-item work contract: `I -> Result<Output, Error>`.
///
/// Implemented for any `Fn(I) -> impl Future<Output = Result<O, E>>`, so plain async closures
/// can be passed wherever a processor is expected.
pub trait Processor<I>: Send + Sync {
    type Output: Send;
    type Error: Into<BoxError> + Send;

    fn process(&self, item: I) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<I, F, Fut, O, E> Processor<I> for F
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
    O: Send,
    E: Into<BoxError> + Send,
{
    type Output = O;
    type Error = E;

    fn process(&self, item: I) -> impl Future<Output = Result<O, E>> + Send {
        self(item)
    }
}
