/// Outgoing player intents and their wire encoding.

use serde::Serialize;

use crate::domain::snapshot::ScreenKind;

/// What the player chose. The variant is decided by the screen being answered.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    MenuOption(String),
    TextInput(String),
    /// Answer with no value at all, sent as a null text input.
    Cancel,
}

impl Command {
    /// Only the plain menu screen answers with `menu_option`; every other
    /// screen (including unknown ones) answers with free text.
    pub fn for_kind(kind: &ScreenKind, value: impl Into<String>) -> Self {
        match kind {
            ScreenKind::Menu => Command::MenuOption(value.into()),
            _ => Command::TextInput(value.into()),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Command::MenuOption(v) | Command::TextInput(v) => v,
            Command::Cancel => "",
        }
    }
}

/// One JSON message sent to the server.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    GetGameState,
    MenuOption { option: String },
    TextInput { text: Option<String> },
}

impl Request {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Command> for Request {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::MenuOption(option) => Request::MenuOption { option },
            Command::TextInput(text) => Request::TextInput { text: Some(text) },
            Command::Cancel => Request::TextInput { text: None },
        }
    }
}
