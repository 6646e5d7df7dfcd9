/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from dreamfront.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Cursor
///   A / Start             →  Confirm (Enter)
///   L1                    →  Previous (Left)
///   R1                    →  Next (Right)

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::session::client::InputEvent;
use crate::session::navigator::NavKey;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) plus press/release edges.
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
    just_released: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        if !held && self.held {
            self.just_released = true;
        }
        self.held = held;
    }

    fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    prev: Vec<Btn>,
    next: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            prev:    vec![Btn::L1],
            next:    vec![Btn::R1],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 10],

    // D-pad, indexed like `DIRECTIONS`
    dpad: [BtnState; 4],

    // Stick
    stick: [BtnState; 4],
    stick_x: f32,
    stick_y: f32,

    // Action mapping
    action_map: ActionMap,

    pub connected: bool,
}

const DIRECTIONS: [NavKey; 4] = [NavKey::Up, NavKey::Down, NavKey::Left, NavKey::Right];

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    #[cfg(feature = "gamepad")]
    pub fn new() -> Self {
        let mut state = Self::detached();
        match Gilrs::new() {
            Ok(g) => {
                state.connected = g.gamepads().next().is_some();
                state.gilrs = Some(g);
            }
            Err(e) => tracing::info!(error = %e, "gamepad support unavailable"),
        }
        state
    }

    #[cfg(not(feature = "gamepad"))]
    pub fn new() -> Self {
        Self::detached()
    }

    /// A tracker with no backend. Only edges set by hand are reported.
    fn detached() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            buttons: [BtnState::default(); 10],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let pv = parse_list(&cfg.prev);
        if !pv.is_empty() { map.prev = pv; }
        let nx = parse_list(&cfg.next);
        if !nx.is_empty() { map.next = nx; }
    }

    pub fn update(&mut self) {
        self.clear_edges();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    /// Translate this frame's edges into session input.
    pub fn events(&self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for (i, key) in DIRECTIONS.iter().enumerate() {
            if self.dpad[i].just_pressed || self.stick[i].just_pressed {
                out.push(InputEvent::KeyDown(*key));
            }
        }
        if self.any_just_pressed(&self.action_map.prev) {
            out.push(InputEvent::KeyDown(NavKey::Left));
        }
        if self.any_just_pressed(&self.action_map.next) {
            out.push(InputEvent::KeyDown(NavKey::Right));
        }
        if self.any_just_pressed(&self.action_map.confirm) {
            out.push(InputEvent::KeyDown(NavKey::Enter));
        }
        if self.any_just_released(&self.action_map.confirm) {
            out.push(InputEvent::KeyUp(NavKey::Enter));
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    tracing::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    tracing::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        // Derive stick digital states
        self.stick[0].set(self.stick_y > STICK_DEADZONE);
        self.stick[1].set(self.stick_y < -STICK_DEADZONE);
        self.stick[2].set(self.stick_x < -STICK_DEADZONE);
        self.stick[3].set(self.stick_x > STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        let dpad = match gilrs_btn {
            Button::DPadUp => Some(0),
            Button::DPadDown => Some(1),
            Button::DPadLeft => Some(2),
            Button::DPadRight => Some(3),
            _ => None,
        };
        if let Some(i) = dpad {
            self.dpad[i].set(held);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn_index(btn)].set(held);
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    // ── Internal ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    fn any_just_released(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_released)
    }

    fn clear_edges(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.clear_edges();
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.set(false);
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(gp: &mut GamepadState, btn: Btn, held: bool) {
        gp.buttons[btn_index(btn)].set(held);
    }

    #[test]
    fn confirm_press_and_release_map_to_enter() {
        let mut gp = GamepadState::detached();
        press(&mut gp, Btn::A, true);
        assert_eq!(gp.events(), vec![InputEvent::KeyDown(NavKey::Enter)]);

        gp.clear_edges();
        assert!(gp.events().is_empty());

        press(&mut gp, Btn::A, false);
        assert_eq!(gp.events(), vec![InputEvent::KeyUp(NavKey::Enter)]);
    }

    #[test]
    fn dpad_and_shoulders_move_the_cursor() {
        let mut gp = GamepadState::detached();
        gp.dpad[1].set(true);
        press(&mut gp, Btn::R1, true);
        assert_eq!(
            gp.events(),
            vec![InputEvent::KeyDown(NavKey::Down), InputEvent::KeyDown(NavKey::Right)]
        );
    }

    #[test]
    fn configured_buttons_replace_defaults() {
        let mut gp = GamepadState::detached();
        gp.load_button_config(&GamepadConfig {
            confirm: vec!["x".into(), "bogus".into()],
            prev: vec![],
            next: vec!["R2".into()],
        });
        press(&mut gp, Btn::A, true);
        assert!(gp.events().is_empty());
        press(&mut gp, Btn::X, true);
        press(&mut gp, Btn::L1, true);
        assert_eq!(
            gp.events(),
            vec![InputEvent::KeyDown(NavKey::Left), InputEvent::KeyDown(NavKey::Enter)]
        );
    }

    #[test]
    fn disconnect_releases_held_confirm() {
        let mut gp = GamepadState::detached();
        press(&mut gp, Btn::Start, true);
        gp.clear_edges();
        gp.release_all();
        assert_eq!(gp.events(), vec![InputEvent::KeyUp(NavKey::Enter)]);
    }
}
