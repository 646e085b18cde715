use server::community::ConnectionTarget;
use std::sync::mpsc::Sender;

/// Requests the widget hands to whoever hosts it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The user asked to test the connection. The host reads the document
    /// with `get_config()` and later answers through `handle_validation`.
    Validate,
    /// The login methods of a newly confirmed target are needed. The host
    /// answers through `on_list_changed` or `handle_security_types`.
    FetchSecurityTypes(ConnectionTarget),
}

/// Destination for [`WidgetEvent`]s. Emitting never blocks and never fails
/// from the widget's point of view.
pub trait EventSink {
    fn emit(&self, event: WidgetEvent);
}

impl EventSink for Sender<WidgetEvent> {
    fn emit(&self, event: WidgetEvent) {
        if let Err(e) = self.send(event) {
            log::error!("Failed to deliver widget event: {e}");
        }
    }
}
