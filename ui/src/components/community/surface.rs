use super::binding::Field;
use super::document::LoginMethod;
use std::collections::HashMap;
use std::fmt;

/// Presentation state of the connection-details region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionStatus {
    #[default]
    Neutral,
    Success,
    Error,
}

impl RegionStatus {
    /// Style class the status maps to, if any.
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            RegionStatus::Neutral => None,
            RegionStatus::Success => Some("success"),
            RegionStatus::Error => Some("error"),
        }
    }
}

/// Rendering surface the widget writes into.
///
/// The widget core owns all state; a surface only displays it. User input
/// travels the other way, through the widget's `on_input`.
pub trait Surface {
    fn write_field(&mut self, field: Field, value: &str);
    fn set_region_status(&mut self, status: RegionStatus);
    fn set_client_message(&mut self, message: Option<&str>);
    fn set_method_options(&mut self, options: &[LoginMethod]);
    fn set_method_selector_enabled(&mut self, enabled: bool);
}

/// In-memory surface holding exactly what a form would display.
///
/// Used by the command line shell and by tests to observe the widget.
#[derive(Clone, Debug, Default)]
pub struct FormSurface {
    values: HashMap<Field, String>,
    region_status: RegionStatus,
    client_message: Option<String>,
    method_options: Vec<String>,
    method_selector_enabled: bool,
}

impl FormSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn region_status(&self) -> RegionStatus {
        self.region_status
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.region_status.class_name() == Some(class_name)
    }

    pub fn client_message(&self) -> Option<&str> {
        self.client_message.as_deref()
    }

    /// `true` while the inline client-validation message is hidden.
    pub fn client_message_hidden(&self) -> bool {
        self.client_message.is_none()
    }

    pub fn method_options(&self) -> &[String] {
        &self.method_options
    }

    pub fn method_selector_enabled(&self) -> bool {
        self.method_selector_enabled
    }
}

impl Surface for FormSurface {
    fn write_field(&mut self, field: Field, value: &str) {
        self.values.insert(field, value.to_string());
    }

    fn set_region_status(&mut self, status: RegionStatus) {
        self.region_status = status;
    }

    fn set_client_message(&mut self, message: Option<&str>) {
        self.client_message = message.map(str::to_string);
    }

    fn set_method_options(&mut self, options: &[LoginMethod]) {
        self.method_options = options.iter().map(|m| m.as_str().to_string()).collect();
    }

    fn set_method_selector_enabled(&mut self, enabled: bool) {
        self.method_selector_enabled = enabled;
    }
}

impl fmt::Display for FormSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Host:       {}", self.value(Field::Host))?;
        writeln!(f, "Port:       {}", self.value(Field::Port))?;
        writeln!(f, "Protocol:   {}", self.value(Field::Protocol))?;
        writeln!(
            f,
            "Login type: {} ({})",
            self.value(Field::Method),
            if self.method_selector_enabled {
                "enabled"
            } else {
                "disabled"
            }
        )?;
        writeln!(f, "Options:    [{}]", self.method_options.join(", "))?;
        write!(
            f,
            "Status:     {}",
            self.region_status.class_name().unwrap_or("untested")
        )?;
        if let Some(message) = &self.client_message {
            write!(f, "\nMessage:    {message}")?;
        }
        Ok(())
    }
}
