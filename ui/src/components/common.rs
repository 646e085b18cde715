use crate::components::community::{ConfigDocument, EventSink, WidgetEvent};
use crate::error::AppError;
use server::community::{ConnectionTarget, ValidationResult};
use std::sync::mpsc::Sender;

/// Messages delivered to the settings session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Request raised by the widget.
    Widget(WidgetEvent),
    /// A community service round trip finished.
    RemoteActivity(RemoteActivityMsg),
    LoadingActivity(LoadingActivityMsg),
    PopupActivity(PopupActivityMsg),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteActivityMsg {
    ValidationCompleted {
        requested: ConfigDocument,
        result: ValidationResult,
    },
    SecurityTypesLoaded {
        target: ConnectionTarget,
        types: Vec<String>,
    },
    /// The method list fetch failed; the target may be fetched again.
    SecurityTypesFailed { target: ConnectionTarget },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadingActivityMsg {
    Start(String),
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupActivityMsg {
    ShowError(AppError),
    ShowWarning(String),
}

impl EventSink for Sender<Msg> {
    fn emit(&self, event: WidgetEvent) {
        if let Err(e) = self.send(Msg::Widget(event)) {
            log::error!("Failed to deliver widget event to session: {e}");
        }
    }
}
