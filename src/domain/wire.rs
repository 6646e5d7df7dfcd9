/// Snapshot JSON decoding.
///
/// Every field is optional and `null` is treated like absence. Decoding
/// only fails when the payload is not a JSON object at all; anything
/// shape-tolerant lands in a default instead.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::character::{Character, EnemyType, Stats};
use crate::domain::snapshot::{
    BattleMessageState, BattleState, Choices, ConversationState, Direction, MessageStyle, Prompt,
    ScreenKind, ScreenState, Snapshot, TravelState,
};

#[derive(Deserialize, Debug, Default)]
struct RawSnapshot {
    input_type: Option<String>,
    main_text: Option<String>,
    sub_text: Option<String>,
    menu_options: Option<Vec<Option<String>>>,
    option_details: Option<Vec<Option<String>>>,
    option_portraits: Option<RawPortraits>,
    player_party: Option<RawParty>,
    enemy_party: Option<RawParty>,
    background_image_url: Option<String>,
    portrait_image_url: Option<String>,
    npc_text: Option<String>,
    player_text: Option<String>,
    npc_portrait_url: Option<String>,
    player_portrait_url: Option<String>,
    movement_text: Option<BTreeMap<String, Option<String>>>,
    travel_position: Option<serde_json::Value>,
    character_info: Option<RawCharacter>,
}

/// The server has sent portraits both as a positional list and as an
/// object keyed by the decimal option index.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawPortraits {
    List(Vec<Option<String>>),
    Map(BTreeMap<String, Option<String>>),
}

#[derive(Deserialize, Debug, Default)]
struct RawParty {
    characters: Option<Vec<RawCharacter>>,
}

#[derive(Deserialize, Debug, Default)]
struct RawCharacter {
    name: Option<String>,
    portrait: Option<String>,
    stats: Option<RawStats>,
    active_turn: Option<bool>,
    enemy_type: Option<String>,
    level: Option<f64>,
    job_class: Option<String>,
    description: Option<String>,
    experience: Option<f64>,
    exp_goal: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
struct RawStats {
    hp: Option<f64>,
    max_hp: Option<f64>,
    mp: Option<f64>,
    max_mp: Option<f64>,
    sp: Option<f64>,
    max_sp: Option<f64>,
    attack: Option<f64>,
    defense: Option<f64>,
    intelligence: Option<f64>,
    wisdom: Option<f64>,
    speed: Option<f64>,
    luck: Option<f64>,
}

/// Decode one server frame.
pub fn decode(text: &str) -> Result<Snapshot, serde_json::Error> {
    let raw: RawSnapshot = serde_json::from_str(text)?;
    Ok(raw.into_snapshot())
}

// ── Conversion ──

fn text(s: Option<String>) -> String {
    s.unwrap_or_default()
}

fn url(s: Option<String>) -> Option<String> {
    s.filter(|u| !u.trim().is_empty())
}

fn int(v: Option<f64>) -> i64 {
    v.filter(|n| n.is_finite()).map(|n| n.round() as i64).unwrap_or(0)
}

fn strings(v: Option<Vec<Option<String>>>) -> Vec<String> {
    v.unwrap_or_default().into_iter().map(Option::unwrap_or_default).collect()
}

fn portraits(raw: Option<RawPortraits>) -> BTreeMap<usize, String> {
    let pairs: Vec<(usize, Option<String>)> = match raw {
        None => Vec::new(),
        Some(RawPortraits::List(list)) => list.into_iter().enumerate().collect(),
        Some(RawPortraits::Map(map)) => map
            .into_iter()
            .filter_map(|(k, v)| k.trim().parse::<usize>().ok().map(|i| (i, v)))
            .collect(),
    };
    pairs
        .into_iter()
        .filter_map(|(i, v)| url(v).map(|u| (i, u)))
        .collect()
}

fn position(v: Option<serde_json::Value>) -> Option<(usize, usize)> {
    let arr = v?.as_array()?.clone();
    if arr.len() != 2 {
        return None;
    }
    let row = arr[0].as_u64()? as usize;
    let col = arr[1].as_u64()? as usize;
    (row < 3 && col < 3).then_some((row, col))
}

fn movement(v: Option<BTreeMap<String, Option<String>>>) -> BTreeMap<Direction, String> {
    v.unwrap_or_default()
        .into_iter()
        .filter_map(|(k, label)| {
            let dir = Direction::from_key(&k)?;
            let label = label.filter(|l| !l.is_empty())?;
            Some((dir, label))
        })
        .collect()
}

fn party(p: Option<RawParty>) -> Vec<Character> {
    p.and_then(|p| p.characters)
        .unwrap_or_default()
        .into_iter()
        .map(RawCharacter::into_character)
        .collect()
}

impl RawStats {
    fn into_stats(self) -> Stats {
        Stats {
            hp: int(self.hp),
            max_hp: int(self.max_hp),
            mp: int(self.mp),
            max_mp: int(self.max_mp),
            sp: int(self.sp),
            max_sp: int(self.max_sp),
            attack: int(self.attack),
            defense: int(self.defense),
            intelligence: int(self.intelligence),
            wisdom: int(self.wisdom),
            speed: int(self.speed),
            luck: int(self.luck),
        }
    }
}

impl RawCharacter {
    fn into_character(self) -> Character {
        Character {
            name: text(self.name),
            portrait: self.portrait.unwrap_or_default(),
            stats: self.stats.unwrap_or_default().into_stats(),
            active_turn: self.active_turn.unwrap_or(false),
            enemy_type: EnemyType::from_tag(self.enemy_type.as_deref()),
            level: int(self.level),
            job_class: text(self.job_class),
            description: text(self.description),
            experience: self.experience.map(|e| int(Some(e))),
            exp_goal: self.exp_goal.map(|e| int(Some(e))),
        }
    }
}

impl RawSnapshot {
    fn choices(&mut self) -> Choices {
        Choices {
            options: strings(self.menu_options.take()),
            details: strings(self.option_details.take()),
            portraits: portraits(self.option_portraits.take()),
        }
    }

    fn prompt(&mut self) -> Prompt {
        let choices = self.choices();
        Prompt {
            main_text: text(self.main_text.take()),
            sub_text: text(self.sub_text.take()),
            portrait: url(self.portrait_image_url.take()),
            choices,
        }
    }

    fn battle(&mut self) -> BattleState {
        BattleState {
            main_text: text(self.main_text.take()),
            players: party(self.player_party.take()),
            enemies: party(self.enemy_party.take()),
            choices: self.choices(),
        }
    }

    fn into_snapshot(mut self) -> Snapshot {
        let kind = ScreenKind::from_tag(self.input_type.as_deref().unwrap_or(""));
        let background = url(self.background_image_url.take());

        let state = match kind {
            ScreenKind::Title => ScreenState::Title(self.prompt()),
            ScreenKind::Menu => ScreenState::Menu(self.prompt()),
            ScreenKind::Battle => ScreenState::Battle(self.battle()),
            ScreenKind::BattleTarget => ScreenState::BattleTarget(self.battle()),
            ScreenKind::Message => ScreenState::Message { style: MessageStyle::Standard, prompt: self.prompt() },
            ScreenKind::MessageMini => ScreenState::Message { style: MessageStyle::Mini, prompt: self.prompt() },
            ScreenKind::Dialogue => ScreenState::Message { style: MessageStyle::Dialogue, prompt: self.prompt() },
            ScreenKind::BattleMessage => ScreenState::BattleMessage(BattleMessageState {
                main_text: text(self.main_text.take()),
                sub_text: text(self.sub_text.take()),
                portrait: url(self.portrait_image_url.take()),
                npc_portrait: url(self.npc_portrait_url.take()),
            }),
            ScreenKind::StatsMessage => ScreenState::StatsMessage(
                self.character_info.take().unwrap_or_default().into_character(),
            ),
            ScreenKind::Text => ScreenState::TextEntry(self.prompt()),
            ScreenKind::Travel => {
                let position = position(self.travel_position.take());
                let movement_text = movement(self.movement_text.take());
                ScreenState::Travel(TravelState { prompt: self.prompt(), position, movement_text })
            }
            ScreenKind::Conversation => ScreenState::Conversation(ConversationState {
                main_text: text(self.main_text.take()),
                npc_text: text(self.npc_text.take()),
                player_text: text(self.player_text.take()),
                npc_portrait: url(self.npc_portrait_url.take()),
                player_portrait: url(self.player_portrait_url.take()),
                choices: self.choices(),
            }),
            ScreenKind::Unknown(tag) => ScreenState::Unknown { tag, prompt: self.prompt() },
        };

        Snapshot { background, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_an_unknown_screen() {
        let snap = decode("{}").unwrap();
        assert_eq!(snap.kind(), ScreenKind::Unknown(String::new()));
        assert_eq!(snap.background, None);
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(decode("[1,2]").is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn nulls_read_as_defaults() {
        let snap = decode(
            r#"{"input_type":"menu","main_text":null,"menu_options":["Attack",null],
                "option_details":null,"background_image_url":""}"#,
        )
        .unwrap();
        match snap.state {
            ScreenState::Menu(p) => {
                assert_eq!(p.main_text, "");
                assert_eq!(p.choices.options, vec!["Attack".to_string(), String::new()]);
                assert!(p.choices.details.is_empty());
            }
            other => panic!("expected menu, got {other:?}"),
        }
        assert_eq!(snap.background, None);
    }

    #[test]
    fn battle_parties_and_liveness() {
        let snap = decode(
            r#"{"input_type":"battle_target",
                "player_party":{"characters":[{"name":"Ayla","stats":{"hp":30,"max_hp":30},"active_turn":true}]},
                "enemy_party":{"characters":[
                    {"name":"Slime","enemy_type":"regular","stats":{"hp":0,"max_hp":12}},
                    {"name":"Lich","enemy_type":"boss","stats":{"hp":80.0,"max_hp":80}}]}}"#,
        )
        .unwrap();
        let ScreenState::BattleTarget(b) = snap.state else { panic!("expected battle_target") };
        assert_eq!(b.active_player(), Some(0));
        assert!(b.enemies[0].is_dead());
        assert_eq!(b.enemies[0].enemy_type, EnemyType::Normal);
        assert!(b.enemies[1].is_boss());
        assert_eq!(b.enemies[1].stats.hp, 80);
    }

    #[test]
    fn portraits_accept_list_and_map() {
        let list = decode(r#"{"input_type":"menu","option_portraits":["a.png",null,"c.png"]}"#).unwrap();
        let map = decode(r#"{"input_type":"menu","option_portraits":{"0":"a.png","2":"c.png"}}"#).unwrap();
        let (ScreenState::Menu(a), ScreenState::Menu(b)) = (list.state, map.state) else {
            panic!("expected menus")
        };
        assert_eq!(a.choices.portraits, b.choices.portraits);
        assert_eq!(a.choices.portrait(2), Some("c.png"));
        assert_eq!(a.choices.portrait(1), None);
    }

    #[test]
    fn travel_position_and_movement_text() {
        let snap = decode(
            r#"{"input_type":"travel","travel_position":[2,1],
                "movement_text":{"North":"Forest","east":"Bridge","Up":"ignored"}}"#,
        )
        .unwrap();
        let ScreenState::Travel(t) = snap.state else { panic!("expected travel") };
        assert_eq!(t.position, Some((2, 1)));
        assert_eq!(t.movement_text.get(&Direction::North).map(String::as_str), Some("Forest"));
        assert_eq!(t.movement_text.get(&Direction::East).map(String::as_str), Some("Bridge"));
        assert_eq!(t.movement_text.len(), 2);
    }

    #[test]
    fn out_of_grid_position_is_dropped() {
        for pos in ["[3,0]", "[1]", "\"1,1\"", "[-1,0]"] {
            let snap = decode(&format!(r#"{{"input_type":"travel","travel_position":{pos}}}"#)).unwrap();
            let ScreenState::Travel(t) = snap.state else { panic!("expected travel") };
            assert_eq!(t.position, None, "{pos}");
        }
    }

    #[test]
    fn stats_sheet_fields() {
        let snap = decode(
            r#"{"input_type":"stats_message","character_info":{"name":"Ayla","level":4,
                "job_class":"Knight","experience":120,"exp_goal":200,"stats":{"hp":10,"max_hp":20}}}"#,
        )
        .unwrap();
        let ScreenState::StatsMessage(c) = snap.state else { panic!("expected stats_message") };
        assert_eq!(c.level, 4);
        assert_eq!(c.job_class, "Knight");
        assert_eq!(c.experience, Some(120));
        assert_eq!(c.exp_goal, Some(200));
    }

    #[test]
    fn turn_order_and_unknown_fields_are_ignored() {
        let snap = decode(r#"{"input_type":"title","turn_order":["a","b"],"extra":{"x":1}}"#).unwrap();
        assert_eq!(snap.kind(), ScreenKind::Title);
    }
}
