use crate::app::task_manager::TaskManager;
use crate::components::common::{LoadingActivityMsg, Msg, PopupActivityMsg, RemoteActivityMsg};
use crate::components::community::{
    CommunityWidget, ConfigDocument, Field, FormSurface, InputRules, WidgetEvent,
};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ErrorContext, ErrorReporter, ErrorSeverity};
use server::common::HttpError;
use server::community::{CommunityService, ConnectionTarget, ValidationResult};
use server::taskpool::TaskPool;
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Extra time granted to a task on top of the request timeout, so the task
/// can still report its outcome after the request gives up.
const TASK_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Awaits a community call for at most `timeout`.
async fn call_with_timeout<T>(
    timeout: Duration,
    what: &str,
    call: impl Future<Output = Result<T, HttpError>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Remote(format!(
            "{what} timed out after {} seconds",
            timeout.as_secs()
        ))),
    }
}

/// Hosts a [`CommunityWidget`] and answers its requests with a
/// [`CommunityService`].
///
/// Widget events, finished round trips and loading notifications all arrive
/// on one channel and are applied on the thread that owns the session, so the
/// widget itself never needs locking. Remote calls run on a tokio runtime,
/// which must be multi-threaded when [`SettingsSession::run_until_idle`] is
/// called from async code.
pub struct SettingsSession {
    widget: CommunityWidget<FormSurface>,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
    task_manager: TaskManager,
    service: Arc<dyn CommunityService>,
    config_item: String,
    request_timeout: Duration,
    in_flight: usize,
    errors: Vec<AppError>,
    warnings: Vec<String>,
}

impl SettingsSession {
    pub fn new(service: Arc<dyn CommunityService>, config: &AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let community = config.community();

        let taskpool = TaskPool::new(community.max_concurrent_requests());
        let error_reporter = ErrorReporter::new(tx.clone());
        let task_manager = TaskManager::new(taskpool, tx.clone(), error_reporter)
            .with_timeout(community.request_timeout() + TASK_TIMEOUT_MARGIN);

        let widget = CommunityWidget::new(FormSurface::new(), tx.clone())
            .with_rules(InputRules::from_config(config.validation()));

        Self {
            widget,
            tx,
            rx,
            task_manager,
            service,
            config_item: community.config_item().to_string(),
            request_timeout: community.request_timeout(),
            in_flight: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn widget(&self) -> &CommunityWidget<FormSurface> {
        &self.widget
    }

    pub fn load(&mut self, document: ConfigDocument) {
        self.widget.update_config(document);
    }

    pub fn input(&mut self, field: Field, raw: &str) {
        self.widget.on_input(field, raw);
    }

    /// Starts a connection test. The outcome is applied by the message loop.
    pub fn test_connection(&mut self) {
        self.widget.test_connection();
    }

    /// Number of remote calls started and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Errors reported while the session ran.
    pub fn errors(&self) -> &[AppError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Applies every queued message without waiting. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.handle(msg);
            handled += 1;
        }
        handled
    }

    /// Applies messages until nothing is queued and no remote call is running.
    pub fn run_until_idle(&mut self, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;

        loop {
            self.process_pending();
            if self.in_flight == 0 {
                return Ok(());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(AppError::State(format!(
                    "{} community request(s) still running after {timeout:?}",
                    self.in_flight
                )));
            }

            match self.rx.recv_timeout(remaining) {
                Ok(msg) => self.handle(msg),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AppError::Channel("Session channel disconnected".to_string()));
                }
            }
        }
    }

    /// Dispatches one message.
    pub fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Widget(WidgetEvent::Validate) => self.start_validation(),
            Msg::Widget(WidgetEvent::FetchSecurityTypes(target)) => {
                self.start_security_types(target)
            }
            Msg::RemoteActivity(RemoteActivityMsg::ValidationCompleted { requested, result }) => {
                self.widget.handle_validation(&requested, &result);
            }
            Msg::RemoteActivity(RemoteActivityMsg::SecurityTypesLoaded { target, types }) => {
                self.widget.handle_security_types(&target, types);
            }
            Msg::RemoteActivity(RemoteActivityMsg::SecurityTypesFailed { target }) => {
                self.widget.handle_security_types_failed(&target);
            }
            Msg::LoadingActivity(LoadingActivityMsg::Start(message)) => {
                log::debug!("{message}");
            }
            Msg::LoadingActivity(LoadingActivityMsg::Stop) => {
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            Msg::PopupActivity(PopupActivityMsg::ShowError(error)) => self.errors.push(error),
            Msg::PopupActivity(PopupActivityMsg::ShowWarning(warning)) => {
                self.warnings.push(warning)
            }
        }
    }

    pub fn shutdown(&self) {
        self.task_manager.shutdown();
    }

    fn start_validation(&mut self) {
        if !self.widget.validate_inputs() {
            log::info!("Connection test skipped: client-side validation failed");
            return;
        }

        let requested = self.widget.get_config();
        let document = requested.to_json_value();
        let config_item = self.config_item.clone();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let timeout = self.request_timeout;

        self.in_flight += 1;
        self.task_manager
            .execute(format!("Testing connection to {}", requested.target()), async move {
                let call = service.validate(&config_item, document);
                let outcome = call_with_timeout(timeout, "Connection test", call).await;
                let (result, failure) = match outcome {
                    Ok(result) => (result, None),
                    Err(e) => {
                        log::warn!("Validation request failed: {e}");
                        (ValidationResult::invalid(e.to_string()), Some(e))
                    }
                };

                tx.send(Msg::RemoteActivity(RemoteActivityMsg::ValidationCompleted {
                    requested,
                    result,
                }))
                .map_err(|e| AppError::Channel(e.to_string()))?;

                match failure {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            });
    }

    fn start_security_types(&mut self, target: ConnectionTarget) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let reporter = self.task_manager.error_reporter().clone();
        let timeout = self.request_timeout;

        self.in_flight += 1;
        self.task_manager
            .execute(format!("Loading login methods for {target}"), async move {
                let call = service.security_types(&target);
                let msg = match call_with_timeout(timeout, "Login method list", call).await {
                    Ok(types) => RemoteActivityMsg::SecurityTypesLoaded { target, types },
                    Err(e) => {
                        let context = ErrorContext::new("CommunityService", "security_types")
                            .with_message(&format!("Could not load login methods for {target}"))
                            .with_technical_details(&e.to_string())
                            .with_suggestion("Test the connection again to retry")
                            .with_severity(ErrorSeverity::Warning);
                        reporter.report(e, context);
                        RemoteActivityMsg::SecurityTypesFailed { target }
                    }
                };
                tx.send(Msg::RemoteActivity(msg))
                    .map_err(|e| AppError::Channel(e.to_string()))
            });
    }
}

impl Drop for SettingsSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::community::{CommunityConfig, LoginMethod, RegionStatus};
    use async_trait::async_trait;
    use claims::*;
    use serde_json::Value;
    use server::common::HttpError;
    use server::community::Protocol;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedService {
        valid: bool,
        fail_transport: bool,
        fail_types: bool,
        delay: Option<Duration>,
        types: Vec<String>,
        validated: Mutex<Vec<Value>>,
        fetched: Mutex<Vec<ConnectionTarget>>,
    }

    #[async_trait]
    impl CommunityService for ScriptedService {
        async fn validate(
            &self,
            config_item: &str,
            document: Value,
        ) -> Result<ValidationResult, HttpError> {
            assert_eq!(config_item, "login");
            self.validated.lock().unwrap().push(document);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_transport {
                return Err(HttpError::RequestFailed {
                    url: "http://localhost:8080/api/config/validate".to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(if self.valid {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid("UNREACHABLE")
            })
        }

        async fn security_types(
            &self,
            target: &ConnectionTarget,
        ) -> Result<Vec<String>, HttpError> {
            self.fetched.lock().unwrap().push(target.clone());
            if self.fail_types {
                return Err(HttpError::RequestFailed {
                    url: "http://localhost:8080/api/securitytypes".to_string(),
                    reason: "HTTP 503".to_string(),
                });
            }
            Ok(self.types.clone())
        }
    }

    fn document() -> ConfigDocument {
        ConfigDocument::new(
            CommunityConfig::new("example.com", 9003, Protocol::Https),
            Some(LoginMethod::from("LDAP")),
        )
    }

    fn session(service: Arc<ScriptedService>) -> SettingsSession {
        let mut session = SettingsSession::new(service, &AppConfig::default());
        session.load(document());
        session
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_successful_test_enables_selector() {
        let service = Arc::new(ScriptedService {
            valid: true,
            types: vec!["LDAP".to_string(), "autonomy".to_string()],
            ..Default::default()
        });
        let mut session = session(service.clone());

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        let widget = session.widget();
        assert_eq!(widget.region_status(), RegionStatus::Success);
        assert!(widget.method_selector_enabled());
        assert_eq!(
            widget.surface().method_options(),
            &["LDAP".to_string(), "autonomy".to_string()]
        );
        assert_eq!(service.validated.lock().unwrap().len(), 1);
        assert_eq!(
            *service.fetched.lock().unwrap(),
            vec![document().target()]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_invalid_result_does_not_fetch() {
        let service = Arc::new(ScriptedService::default());
        let mut session = session(service.clone());

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        assert_eq!(session.widget().region_status(), RegionStatus::Error);
        assert!(service.fetched.lock().unwrap().is_empty());
        assert!(session.errors().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_transport_failure_becomes_invalid_result() {
        let service = Arc::new(ScriptedService {
            fail_transport: true,
            ..Default::default()
        });
        let mut session = session(service);

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        assert_eq!(session.widget().region_status(), RegionStatus::Error);
        assert_eq!(session.errors().len(), 1);
        assert_matches!(&session.errors()[0], AppError::Remote(_));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_client_failure_skips_round_trip() {
        let service = Arc::new(ScriptedService {
            valid: true,
            ..Default::default()
        });
        let mut session = session(service.clone());

        session.input(Field::Host, "");
        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        assert_eq!(session.widget().region_status(), RegionStatus::Error);
        assert_some!(session.widget().surface().client_message());
        assert!(service.validated.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_validation_is_answered_as_invalid() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"[community]\nrequest_timeout_secs = 1\n").unwrap();
        let config = assert_ok!(crate::config::load_config(Some(file.path())).into_result());

        let service = Arc::new(ScriptedService {
            valid: true,
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let mut session = SettingsSession::new(service, &config);
        session.load(document());

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        assert_eq!(session.widget().region_status(), RegionStatus::Error);
        assert!(!session.widget().method_selector_enabled());
        assert_eq!(session.errors().len(), 1);
        assert_matches!(&session.errors()[0], AppError::Remote(_));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_method_list_is_fetched_on_next_success() {
        let service = Arc::new(ScriptedService {
            valid: true,
            fail_types: true,
            ..Default::default()
        });
        let mut session = session(service.clone());

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));
        assert_eq!(session.warnings().len(), 1);
        assert!(session.warnings()[0].starts_with("Could not load login methods"));
        assert!(session.warnings()[0].ends_with("Test the connection again to retry"));
        assert!(!session.widget().method_selector_enabled());

        session.test_connection();
        assert_ok!(session.run_until_idle(Duration::from_secs(5)));

        assert_eq!(service.fetched.lock().unwrap().len(), 2);
        assert_eq!(session.warnings().len(), 2);
        assert_eq!(session.widget().region_status(), RegionStatus::Success);
    }

    #[test]
    fn test_stop_never_underflows() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();
        let mut session = session(Arc::new(ScriptedService::default()));

        session.handle(Msg::LoadingActivity(LoadingActivityMsg::Stop));
        assert_eq!(session.in_flight(), 0);
    }
}
