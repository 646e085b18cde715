use std::sync::Arc;

use futures_util::Future;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Bounded background executor for community service requests.
///
/// At most `max_in_flight` futures run at once; the rest wait for a permit.
/// Dropping the pool (or calling [`TaskPool::shutdown`]) cancels everything
/// still queued or running. A cancelled request never reports back, which the
/// settings widget already tolerates since it has no cancellation of its own.
#[derive(Clone)]
pub struct TaskPool {
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl TaskPool {
    pub fn new(max_in_flight: usize) -> TaskPool {
        TaskPool {
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawns `func` on the current tokio runtime once a permit is free.
    pub fn execute<F, T>(&self, func: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send,
    {
        let semaphore = self.semaphore.clone();
        let token = self.cancel_token.clone();
        tokio::spawn(async move {
            let main = async {
                let Ok(_permit) = semaphore.acquire().await else {
                    log::debug!("Task pool closed before request could start");
                    return;
                };
                func.await;
            };

            tokio::select! {
                () = main => {},
                () = token.cancelled() => {
                    log::debug!("Pending request cancelled by task pool shutdown");
                }
            }
        });
    }

    /// Stops accepting work and cancels queued and running requests.
    pub fn shutdown(&self) {
        self.semaphore.close();
        self.cancel_token.cancel();
    }
}
