use std::future::Future;

/// A unit of work against the remote session.
///
/// An operation may be invoked any number of times; each invocation starts
/// from scratch. Any `FnMut() -> impl Future<Output = Result<T, E>>` closure is
/// an operation. For record sequences, `Output` is a
/// `Stream<Item = Result<Record, Error>>`.
pub trait Operation {
    /// Value produced by a successful invocation
    type Output;
    /// Failure reported by an invocation
    type Error;

    /// Start one invocation.
    fn invoke(&mut self) -> impl Future<Output = Result<Self::Output, Self::Error>>;
}

impl<F, Fut, T, E> Operation for F
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Output = T;
    type Error = E;

    fn invoke(&mut self) -> impl Future<Output = Result<T, E>> {
        (self)()
    }
}
