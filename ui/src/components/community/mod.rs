//! Community connection settings widget.
//!
//! The widget edits where the application finds its community (directory)
//! service and which login method it uses, and keeps the connection test
//! result honest while the user keeps typing.
//!
//! - [`document`] - The settings document being edited
//! - [`binding`] - Field-by-field sync between document and surface
//! - [`surface`] - Rendering surface trait and an in-memory implementation
//! - [`validation_state`] - Which validation result applies to the live target
//! - [`method_list`] - Login method list fetch and selector gating
//! - [`rules`] - Client-side input rules
//! - [`events`] - Requests the widget makes of its host
//! - [`widget`] - The widget tying it all together

pub mod binding;
pub mod document;
pub mod events;
pub mod method_list;
pub mod rules;
pub mod surface;
pub mod validation_state;
pub mod widget;

pub use binding::{Field, FieldBinding, FieldChange, coerce_port};
pub use document::{CommunityConfig, ConfigDocument, EXTERNAL_METHODS, LoginMethod};
pub use events::{EventSink, WidgetEvent};
pub use method_list::{MethodList, MethodListSynchronizer};
pub use rules::{HostRequiredRule, InputRules, PortRangeRule};
pub use surface::{FormSurface, RegionStatus, Surface};
pub use validation_state::{
    TrackerState, ValidationOutcome, ValidationSnapshot, ValidationStateTracker,
};
pub use widget::CommunityWidget;
