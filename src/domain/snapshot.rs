/// Validated game snapshot.
///
/// The server sends one loosely-shaped JSON object per state change. `wire`
/// turns it into this closed union once, so renderers can match on the
/// screen kind exhaustively and never test for optional fields.

use std::collections::BTreeMap;

use crate::domain::character::Character;

/// Screen discriminant, taken from the `input_type` field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ScreenKind {
    Title,
    Menu,
    Battle,
    BattleTarget,
    Message,
    MessageMini,
    Dialogue,
    BattleMessage,
    StatsMessage,
    Text,
    Travel,
    Conversation,
    Unknown(String),
}

impl ScreenKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => ScreenKind::Title,
            "menu" => ScreenKind::Menu,
            "battle" => ScreenKind::Battle,
            "battle_target" => ScreenKind::BattleTarget,
            "message" => ScreenKind::Message,
            "message_mini" => ScreenKind::MessageMini,
            "dialogue" => ScreenKind::Dialogue,
            "battle_message" => ScreenKind::BattleMessage,
            "stats_message" => ScreenKind::StatsMessage,
            "text" => ScreenKind::Text,
            "travel" => ScreenKind::Travel,
            "conversation" => ScreenKind::Conversation,
            other => ScreenKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScreenKind::Title => "title",
            ScreenKind::Menu => "menu",
            ScreenKind::Battle => "battle",
            ScreenKind::BattleTarget => "battle_target",
            ScreenKind::Message => "message",
            ScreenKind::MessageMini => "message_mini",
            ScreenKind::Dialogue => "dialogue",
            ScreenKind::BattleMessage => "battle_message",
            ScreenKind::StatsMessage => "stats_message",
            ScreenKind::Text => "text",
            ScreenKind::Travel => "travel",
            ScreenKind::Conversation => "conversation",
            ScreenKind::Unknown(tag) => tag,
        }
    }
}

/// Selectable options plus their index-aligned extras.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Choices {
    pub options: Vec<String>,
    /// May be shorter than `options`; missing entries have no detail.
    pub details: Vec<String>,
    pub portraits: BTreeMap<usize, String>,
}

impl Choices {
    pub fn detail(&self, index: usize) -> Option<&str> {
        self.details.get(index).map(String::as_str).filter(|d| !d.is_empty())
    }

    pub fn portrait(&self, index: usize) -> Option<&str> {
        self.portraits.get(&index).map(String::as_str).filter(|p| !p.is_empty())
    }

    pub fn has_portraits(&self) -> bool {
        self.portraits.values().any(|p| !p.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}

/// The common text/portrait/options shape shared by menu-like screens.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Prompt {
    pub main_text: String,
    pub sub_text: String,
    pub portrait: Option<String>,
    pub choices: Choices,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct BattleState {
    pub main_text: String,
    pub players: Vec<Character>,
    pub enemies: Vec<Character>,
    /// Actions of the active character.
    pub choices: Choices,
}

impl BattleState {
    pub fn active_player(&self) -> Option<usize> {
        self.players.iter().position(|c| c.active_turn)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageStyle {
    Standard,
    Mini,
    Dialogue,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// A menu option naming a direction. Only the exact labels count.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "North" => Some(Direction::North),
            "South" => Some(Direction::South),
            "East" => Some(Direction::East),
            "West" => Some(Direction::West),
            _ => None,
        }
    }

    /// A `movement_text` key, matched case-insensitively.
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::North => '↑',
            Direction::South => '↓',
            Direction::East => '→',
            Direction::West => '←',
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct TravelState {
    pub prompt: Prompt,
    /// `(row, col)` inside the 3x3 locator, when the server sends one.
    pub position: Option<(usize, usize)>,
    pub movement_text: BTreeMap<Direction, String>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct ConversationState {
    pub main_text: String,
    pub npc_text: String,
    pub player_text: String,
    pub npc_portrait: Option<String>,
    pub player_portrait: Option<String>,
    pub choices: Choices,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct BattleMessageState {
    pub main_text: String,
    pub sub_text: String,
    pub portrait: Option<String>,
    pub npc_portrait: Option<String>,
}

impl BattleMessageState {
    /// The right-hand portrait is only shown when it is a different image.
    pub fn second_portrait(&self) -> Option<&str> {
        match (&self.portrait, &self.npc_portrait) {
            (Some(a), Some(b)) if a == b => None,
            (_, Some(b)) => Some(b),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum ScreenState {
    Title(Prompt),
    Menu(Prompt),
    Battle(BattleState),
    BattleTarget(BattleState),
    Message { style: MessageStyle, prompt: Prompt },
    BattleMessage(BattleMessageState),
    StatsMessage(Character),
    TextEntry(Prompt),
    Travel(TravelState),
    Conversation(ConversationState),
    Unknown { tag: String, prompt: Prompt },
}

impl ScreenState {
    pub fn kind(&self) -> ScreenKind {
        match self {
            ScreenState::Title(_) => ScreenKind::Title,
            ScreenState::Menu(_) => ScreenKind::Menu,
            ScreenState::Battle(_) => ScreenKind::Battle,
            ScreenState::BattleTarget(_) => ScreenKind::BattleTarget,
            ScreenState::Message { style: MessageStyle::Standard, .. } => ScreenKind::Message,
            ScreenState::Message { style: MessageStyle::Mini, .. } => ScreenKind::MessageMini,
            ScreenState::Message { style: MessageStyle::Dialogue, .. } => ScreenKind::Dialogue,
            ScreenState::BattleMessage(_) => ScreenKind::BattleMessage,
            ScreenState::StatsMessage(_) => ScreenKind::StatsMessage,
            ScreenState::TextEntry(_) => ScreenKind::Text,
            ScreenState::Travel(_) => ScreenKind::Travel,
            ScreenState::Conversation(_) => ScreenKind::Conversation,
            ScreenState::Unknown { tag, .. } => ScreenKind::Unknown(tag.clone()),
        }
    }
}

/// One complete, self-describing game state.
#[derive(Clone, PartialEq, Debug)]
pub struct Snapshot {
    pub background: Option<String>,
    pub state: ScreenState,
}

impl Snapshot {
    pub fn kind(&self) -> ScreenKind {
        self.state.kind()
    }
}
