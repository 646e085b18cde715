use super::document::{ConfigDocument, LoginMethod};
use super::surface::Surface;
use server::community::Protocol;

/// Editable fields of the community settings form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Host,
    Port,
    Protocol,
    Method,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Host, Field::Port, Field::Protocol, Field::Method];

    /// Form control name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Host => "host",
            Field::Port => "port",
            Field::Protocol => "protocol",
            Field::Method => "login-type",
        }
    }

    /// Host, port and protocol make up the connection target.
    pub fn is_connection(&self) -> bool {
        !matches!(self, Field::Method)
    }
}

/// What a user edit touched, so the editor knows which recomputation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldChange {
    Connection,
    Method,
}

/// Parses port text from the surface. Anything that is not a valid port
/// number, including empty input, becomes `0`.
pub fn coerce_port(raw: &str) -> u16 {
    raw.trim().parse().unwrap_or(0)
}

/// Two-way link between one document field and one surface element.
#[derive(Clone, Copy, Debug)]
pub struct FieldBinding {
    field: Field,
}

impl FieldBinding {
    pub fn new(field: Field) -> Self {
        Self { field }
    }

    /// One binding per editable field.
    pub fn all() -> [FieldBinding; 4] {
        Field::ALL.map(FieldBinding::new)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Surface representation of the bound document value.
    pub fn read(&self, document: &ConfigDocument) -> String {
        match self.field {
            Field::Host => document.community.host.clone(),
            Field::Port => document.community.port.to_string(),
            Field::Protocol => document.community.protocol.as_str().to_string(),
            Field::Method => document
                .method
                .as_ref()
                .map(|method| method.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Coerces surface input and writes it into the document.
    ///
    /// Returns the kind of change when the stored value actually changed, and
    /// `None` when the input coerced to the value already held.
    pub fn apply(&self, document: &mut ConfigDocument, raw: &str) -> Option<FieldChange> {
        let changed = match self.field {
            Field::Host => replace_if_changed(&mut document.community.host, raw.to_string()),
            Field::Port => replace_if_changed(&mut document.community.port, coerce_port(raw)),
            Field::Protocol => replace_if_changed(
                &mut document.community.protocol,
                Protocol::from_input(raw),
            ),
            Field::Method => {
                let method = (!raw.is_empty()).then(|| LoginMethod::new(raw));
                replace_if_changed(&mut document.method, method)
            }
        };

        changed.then_some(if self.field.is_connection() {
            FieldChange::Connection
        } else {
            FieldChange::Method
        })
    }

    /// Programmatic write into the surface. Does not go through the user-edit
    /// path, so no status is cleared and nothing is re-validated.
    pub fn push<S: Surface + ?Sized>(&self, document: &ConfigDocument, surface: &mut S) {
        surface.write_field(self.field, &self.read(document));
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
