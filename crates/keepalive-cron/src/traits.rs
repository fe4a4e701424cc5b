use std::future::Future;

/// Work fired by the [`Scheduler`](crate::Scheduler) at every due tick.
pub trait Job: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    fn run(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
