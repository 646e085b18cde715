use super::binding::{Field, FieldBinding, FieldChange};
use super::document::{ConfigDocument, LoginMethod};
use super::events::{EventSink, WidgetEvent};
use super::method_list::MethodListSynchronizer;
use super::rules::InputRules;
use super::surface::{FormSurface, RegionStatus, Surface};
use super::validation_state::{TrackerState, ValidationStateTracker};
use crate::components::validation_patterns::ValidationState;
use crate::validation::Validator;
use server::community::{ConnectionTarget, ValidationResult};

/// Settings widget for the community connection.
///
/// Keeps a [`ConfigDocument`] in sync with the form fields of a [`Surface`],
/// tracks whether the displayed connection has been confirmed by the
/// community service, and gates the login method selector on that
/// confirmation plus a method list fetched for the same target.
///
/// The widget never talks to the network. It emits [`WidgetEvent`]s and
/// expects the host to call back with [`CommunityWidget::handle_validation`]
/// and [`CommunityWidget::on_list_changed`] whenever results arrive, in any
/// order and possibly long after the user has changed the inputs.
///
/// # Examples
///
/// ```no_run
/// use community_settings::components::community::{
///     CommunityWidget, ConfigDocument, FormSurface, WidgetEvent,
/// };
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel::<WidgetEvent>();
/// let mut widget = CommunityWidget::new(FormSurface::new(), tx);
/// widget.update_config(ConfigDocument::default());
/// widget.test_connection();
/// assert_eq!(rx.try_iter().count(), 1);
/// ```
pub struct CommunityWidget<S: Surface = FormSurface> {
    document: ConfigDocument,
    bindings: [FieldBinding; 4],
    surface: S,
    tracker: ValidationStateTracker,
    methods: MethodListSynchronizer,
    rules: InputRules,
    client_validation: ValidationState,
    events: Box<dyn EventSink>,
}

impl<S: Surface> CommunityWidget<S> {
    /// Creates the widget and renders an empty, unvalidated form.
    pub fn new(surface: S, events: impl EventSink + 'static) -> Self {
        let mut widget = Self {
            document: ConfigDocument::default(),
            bindings: FieldBinding::all(),
            surface,
            tracker: ValidationStateTracker::new(),
            methods: MethodListSynchronizer::new(),
            rules: InputRules::default(),
            client_validation: ValidationState::valid(),
            events: Box::new(events),
        };
        widget.render();
        widget
    }

    pub fn with_rules(mut self, rules: InputRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the live document and rewrites every field.
    ///
    /// Any previous validation result, client-side error and method list is
    /// dropped. Nothing is fetched.
    pub fn update_config(&mut self, document: ConfigDocument) {
        log::debug!(
            "Loading community configuration for {}",
            document.target()
        );

        self.document = document;
        self.tracker.reset();
        self.methods.reset();
        self.client_validation = ValidationState::valid();
        self.render();
    }

    /// Current document, identical to the last loaded one when nothing was edited.
    pub fn get_config(&self) -> ConfigDocument {
        self.document.clone()
    }

    /// Runs the client-side rules against the live document.
    ///
    /// On failure the region shows an error and the inline message is shown.
    /// On success both are cleared; that says nothing about the service.
    pub fn validate_inputs(&mut self) -> bool {
        let result = self
            .rules
            .validate(&self.document)
            .map_err(|e| e.user_message());

        if let Err(message) = &result {
            log::debug!("Client-side validation failed: {message}");
        }

        self.client_validation = ValidationState::from_result(result);
        self.refresh_status();
        self.client_validation.is_valid
    }

    /// User asked to test the connection. The host performs the round trip.
    pub fn test_connection(&mut self) {
        let target = self.document.target();
        log::info!("Connection test requested for {target}");

        self.tracker.mark_pending(target);
        self.events.emit(WidgetEvent::Validate);
        self.refresh_status();
        self.refresh_methods();
    }

    /// Delivers the outcome of a validation round trip for `requested`.
    ///
    /// The result is kept for the requested target but only shown while the
    /// live target is that same target. A confirmed live target gets its
    /// method list requested unless it is already held or on its way.
    pub fn handle_validation(&mut self, requested: &ConfigDocument, result: &ValidationResult) {
        let target = requested.target();
        let live = self.document.target();
        self.tracker.record(target.clone(), result.valid);

        if target != live {
            log::debug!("Ignoring validation result for {target}: form now shows {live}");
        } else {
            log::info!(
                "Validation result for {target}: {}",
                if result.valid { "valid" } else { "invalid" }
            );
            if result.valid {
                self.methods.request_for(&target, self.events.as_ref());
            }
        }

        self.refresh_status();
        self.refresh_methods();
    }

    /// New login methods from the collaborator, for the last requested target.
    pub fn on_list_changed(&mut self, items: Vec<String>) {
        self.methods.on_list_changed(items);
        self.refresh_methods();
    }

    /// Like [`CommunityWidget::on_list_changed`], but drops deliveries for any
    /// target other than the one most recently requested.
    pub fn handle_security_types(&mut self, target: &ConnectionTarget, items: Vec<String>) -> bool {
        if self.methods.last_requested() != Some(target) {
            log::debug!("Ignoring security types for {target}: superseded by a newer request");
            self.methods.on_fetch_finished(target);
            return false;
        }

        self.on_list_changed(items);
        true
    }

    /// The method list fetch for `target` failed. The selector stays as it
    /// is, and the next confirmation of `target` fetches again.
    pub fn handle_security_types_failed(&mut self, target: &ConnectionTarget) {
        log::debug!("Security types for {target} could not be loaded");
        self.methods.on_fetch_finished(target);
        self.refresh_methods();
    }

    /// A user edit of `field`.
    ///
    /// The field is rewritten with the value the document now holds, so a
    /// coerced port or protocol shows as it will be saved. Connection edits
    /// clear the client-side error and re-evaluate status and the selector
    /// against the new target. Method edits only rebuild the selector options.
    pub fn on_input(&mut self, field: Field, raw: &str) {
        let Some(binding) = self.bindings.iter().copied().find(|b| b.field() == field) else {
            self.surface.write_field(field, raw);
            return;
        };

        let change = binding.apply(&mut self.document, raw);
        binding.push(&self.document, &mut self.surface);

        match change {
            Some(FieldChange::Connection) => {
                self.client_validation = ValidationState::valid();
                self.refresh_status();
                self.refresh_methods();
            }
            Some(FieldChange::Method) => self.refresh_methods(),
            None => {}
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn validation_state(&self) -> TrackerState {
        self.tracker.state_for(&self.document.target())
    }

    pub fn region_status(&self) -> RegionStatus {
        if self.client_validation.is_valid {
            self.tracker.region_status_for(&self.document.target())
        } else {
            RegionStatus::Error
        }
    }

    pub fn method_options(&self) -> Vec<LoginMethod> {
        self.methods.options(self.document.method.as_ref())
    }

    pub fn method_selector_enabled(&self) -> bool {
        let live = self.document.target();
        self.methods.selector_enabled(
            &live,
            self.document.method.as_ref(),
            self.tracker.is_confirmed(&live),
        )
    }

    fn render(&mut self) {
        for binding in &self.bindings {
            binding.push(&self.document, &mut self.surface);
        }
        self.refresh_status();
        self.refresh_methods();
    }

    fn refresh_status(&mut self) {
        let status = self.region_status();
        self.surface.set_region_status(status);
        self.surface
            .set_client_message(self.client_validation.error_message.as_deref());
    }

    fn refresh_methods(&mut self) {
        let options = self.method_options();
        let enabled = self.method_selector_enabled();
        self.surface.set_method_options(&options);
        self.surface.set_method_selector_enabled(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::community::document::CommunityConfig;
    use server::community::Protocol;
    use std::sync::mpsc::{self, Receiver};

    fn initial_config() -> ConfigDocument {
        ConfigDocument::new(
            CommunityConfig::new("example.com", 9003, Protocol::Https),
            Some(LoginMethod::from("LDAP")),
        )
    }

    fn loaded_widget() -> (CommunityWidget, Receiver<WidgetEvent>) {
        let (tx, rx) = mpsc::channel::<WidgetEvent>();
        let mut widget = CommunityWidget::new(FormSurface::new(), tx);
        widget.update_config(initial_config());
        (widget, rx)
    }

    #[test]
    fn test_fresh_widget_renders_empty_form() {
        let (tx, _rx) = mpsc::channel::<WidgetEvent>();
        let widget = CommunityWidget::new(FormSurface::new(), tx);
        let surface = widget.surface();

        assert_eq!(surface.value(Field::Host), "");
        assert_eq!(surface.value(Field::Port), "0");
        assert_eq!(surface.value(Field::Protocol), "HTTP");
        assert_eq!(surface.value(Field::Method), "");
        assert!(!surface.method_selector_enabled());
        assert_eq!(surface.region_status(), RegionStatus::Neutral);
    }

    #[test]
    fn test_load_then_read_is_identity() {
        let (widget, _rx) = loaded_widget();
        assert_eq!(widget.get_config(), initial_config());
    }

    #[test]
    fn test_load_does_not_fetch() {
        let (widget, rx) = loaded_widget();
        assert!(!widget.method_selector_enabled());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_failed_validation_shows_error_without_fetch() {
        let (mut widget, rx) = loaded_widget();
        widget.handle_validation(&initial_config(), &ValidationResult::invalid("BAD_HOST"));

        assert_eq!(widget.region_status(), RegionStatus::Error);
        assert_eq!(widget.validation_state(), TrackerState::AppliedFailure);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_method_edit_keeps_status_and_never_fetches() {
        let (mut widget, rx) = loaded_widget();
        widget.handle_validation(&initial_config(), &ValidationResult::valid());
        let _ = rx.try_iter().count();

        widget.on_input(Field::Method, "autonomy");

        assert_eq!(widget.region_status(), RegionStatus::Success);
        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(
            widget.get_config().method,
            Some(LoginMethod::from("autonomy"))
        );
    }

    #[test]
    fn test_test_connection_emits_validate_and_marks_pending() {
        let (mut widget, rx) = loaded_widget();
        widget.handle_validation(&initial_config(), &ValidationResult::valid());
        let _ = rx.try_iter().count();

        widget.test_connection();

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![WidgetEvent::Validate]);
        assert_eq!(widget.region_status(), RegionStatus::Neutral);
    }

    #[test]
    fn test_port_field_shows_coerced_value() {
        let (mut widget, _rx) = loaded_widget();

        widget.on_input(Field::Port, "abc");
        assert_eq!(widget.surface().value(Field::Port), "0");
        assert_eq!(widget.get_config().community.port, 0);

        widget.on_input(Field::Port, " 9443 ");
        assert_eq!(widget.surface().value(Field::Port), "9443");

        widget.on_input(Field::Protocol, "https");
        assert_eq!(widget.surface().value(Field::Protocol), "HTTPS");
    }

    #[test]
    fn test_failed_security_types_fetch_is_retried() {
        let (mut widget, rx) = loaded_widget();
        let live = initial_config().target();
        widget.handle_validation(&initial_config(), &ValidationResult::valid());

        widget.handle_security_types_failed(&live);
        assert!(!widget.method_selector_enabled());

        widget.handle_validation(&initial_config(), &ValidationResult::valid());
        let fetched: Vec<WidgetEvent> = rx.try_iter().collect();
        assert_eq!(
            fetched,
            vec![
                WidgetEvent::FetchSecurityTypes(live.clone()),
                WidgetEvent::FetchSecurityTypes(live),
            ]
        );
    }

    #[test]
    fn test_superseded_security_types_are_dropped() {
        let (mut widget, _rx) = loaded_widget();
        widget.handle_validation(&initial_config(), &ValidationResult::valid());

        let other = ConnectionTarget::new("other.com", 9003, Protocol::Https);
        assert!(!widget.handle_security_types(&other, vec!["LDAP".to_string()]));
        assert!(!widget.method_selector_enabled());

        let live = initial_config().target();
        assert!(widget.handle_security_types(&live, vec!["LDAP".to_string()]));
        assert!(widget.method_selector_enabled());
    }
}
