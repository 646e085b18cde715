use crate::components::common::{LoadingActivityMsg, Msg};
use crate::error::{AppError, ErrorReporter};
use server::taskpool::TaskPool;
use std::fmt::Display;
use std::future::Future;
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Default upper bound for a single background operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs community service calls on the task pool, bracketed by loading
/// messages, with a timeout and error reporting.
#[derive(Clone)]
pub struct TaskManager {
    taskpool: TaskPool,
    tx_to_main: Sender<Msg>,
    error_reporter: ErrorReporter,
    timeout: Duration,
}

impl TaskManager {
    pub fn new(taskpool: TaskPool, tx_to_main: Sender<Msg>, error_reporter: ErrorReporter) -> Self {
        Self {
            taskpool,
            tx_to_main,
            error_reporter,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn error_reporter(&self) -> &ErrorReporter {
        &self.error_reporter
    }

    /// Execute an async operation with loading indicator and timeout support.
    ///
    /// `Start` is queued before this returns. `Stop` is always the last
    /// message the operation produces.
    pub fn execute<F, R>(&self, loading_message: impl Display, operation: F)
    where
        F: Future<Output = Result<R, AppError>> + Send + 'static,
        R: Send + 'static,
    {
        let timeout = self.timeout;

        Self::send_message_or_report_error(
            &self.tx_to_main,
            Msg::LoadingActivity(LoadingActivityMsg::Start(loading_message.to_string())),
            "loading start",
            &self.error_reporter,
        );

        let tx_to_main = self.tx_to_main.clone();
        let error_reporter = self.error_reporter.clone();

        self.taskpool.execute(async move {
            let result = tokio::time::timeout(timeout, operation).await;

            let final_result = match result {
                Ok(operation_result) => operation_result,
                Err(_) => {
                    log::warn!("Operation timed out after {timeout:?}");
                    Err(AppError::Remote(format!(
                        "Operation timed out after {} seconds",
                        timeout.as_secs()
                    )))
                }
            };

            // Error reports must precede Stop
            if let Err(error) = final_result {
                error_reporter.report_simple(error, "TaskManager", "async_operation");
            }

            Self::send_message_or_report_error(
                &tx_to_main,
                Msg::LoadingActivity(LoadingActivityMsg::Stop),
                "loading stop",
                &error_reporter,
            );
        });
    }

    /// Helper method to send a message to the main thread or report error if it fails
    pub fn send_message_or_report_error(
        tx: &Sender<Msg>,
        msg: Msg,
        context: &str,
        error_reporter: &ErrorReporter,
    ) {
        if let Err(e) = tx.send(msg) {
            error_reporter.report_send_error(context, e);
        }
    }

    pub fn shutdown(&self) {
        self.taskpool.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::common::PopupActivityMsg;
    use claims::*;
    use std::sync::mpsc;
    use tokio::time::sleep;

    mod helpers {
        use super::*;

        pub fn create_test_setup() -> (TaskManager, mpsc::Receiver<Msg>) {
            let taskpool = TaskPool::new(4);
            let (tx, rx) = mpsc::channel();
            let error_reporter = ErrorReporter::new(tx.clone());
            let task_manager = TaskManager::new(taskpool, tx, error_reporter);
            (task_manager, rx)
        }

        pub fn collect_messages_with_timeout(
            rx: &mpsc::Receiver<Msg>,
            expected_count: usize,
            timeout_ms: u64,
        ) -> Vec<Msg> {
            let mut messages = Vec::new();
            let start = std::time::Instant::now();

            while messages.len() < expected_count
                && start.elapsed().as_millis() < timeout_ms as u128
            {
                match rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(msg) => messages.push(msg),
                    Err(mpsc::RecvTimeoutError::Timeout) => continue,
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }

            messages
        }
    }

    use helpers::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_execute_sends_start_before_returning() {
        let (task_manager, rx) = create_test_setup();

        task_manager.execute("Testing connection", async move {
            sleep(Duration::from_millis(50)).await;
            Ok::<(), AppError>(())
        });

        let first = assert_ok!(rx.try_recv());
        assert_matches!(
            first,
            Msg::LoadingActivity(LoadingActivityMsg::Start(ref text)) if text == "Testing connection"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_execute_sends_stop_message_on_success() {
        let (task_manager, rx) = create_test_setup();

        task_manager.execute("Test", async move { Ok::<(), AppError>(()) });

        let messages = collect_messages_with_timeout(&rx, 2, 1000);
        assert_eq!(messages.len(), 2);
        assert_matches!(&messages[1], Msg::LoadingActivity(LoadingActivityMsg::Stop));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_execute_reports_error_before_stop() {
        let (task_manager, rx) = create_test_setup();

        task_manager.execute("Test", async move {
            Err::<(), AppError>(AppError::Remote("connection refused".to_string()))
        });

        let messages = collect_messages_with_timeout(&rx, 3, 1000);
        assert_eq!(messages.len(), 3);
        assert_matches!(&messages[2], Msg::LoadingActivity(LoadingActivityMsg::Stop));
        assert_eq!(
            messages[1],
            Msg::PopupActivity(PopupActivityMsg::ShowError(AppError::Remote(
                "connection refused".to_string()
            )))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_execute_times_out() {
        let (task_manager, rx) = create_test_setup();
        let task_manager = task_manager.with_timeout(Duration::from_millis(20));

        task_manager.execute("Slow", async move {
            sleep(Duration::from_secs(5)).await;
            Ok::<(), AppError>(())
        });

        let messages = collect_messages_with_timeout(&rx, 3, 2000);
        assert_eq!(messages.len(), 3);
        assert_matches!(
            &messages[1],
            Msg::PopupActivity(PopupActivityMsg::ShowError(AppError::Remote(_)))
        );
    }

    #[test]
    fn test_send_message_or_report_error_failure() {
        let (tx, rx) = mpsc::channel();
        let error_reporter = ErrorReporter::new(tx.clone());
        drop(rx);

        TaskManager::send_message_or_report_error(
            &tx,
            Msg::LoadingActivity(LoadingActivityMsg::Stop),
            "test",
            &error_reporter,
        );
    }
}
