/// Terminal input translator.
///
/// Turns crossterm key and mouse events into session `InputEvent`s:
///   - Arrow keys repeat while held; Enter only fires on the initial press
///   - Printable characters and Backspace feed the text entry
///   - Left mouse button drives pointer move / down / up
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::session::client::InputEvent;
use crate::session::navigator::NavKey;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each navigation key.
    last_active: HashMap<KeyCode, Instant>,

    /// Events translated during the most recent drain_events() call.
    pub events: Vec<InputEvent>,

    quit: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(8),
            events: Vec::with_capacity(8),
            quit: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call this once per frame.
    pub fn drain_events(&mut self) {
        self.events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.feed(ev, Instant::now()),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event read failed");
                    break;
                }
            }
        }

        self.expire(Instant::now());
    }

    /// Esc or Ctrl+C was seen.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    // ── Translation ──

    fn feed(&mut self, ev: Event, now: Instant) {
        match ev {
            Event::Key(key) => self.on_key(key, now),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if is_quit(&key) {
            self.quit = true;
            return;
        }

        if let Some(nav) = nav_key(key.code) {
            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    // Explicit release
                    if self.last_active.remove(&key.code).is_some() {
                        self.events.push(InputEvent::KeyUp(nav));
                    }
                }
                KeyEventKind::Release => {
                    // Ignore release when enhancement not confirmed;
                    // rely on timeout-based expiry instead
                }
                _ => {
                    let was_held = self.last_active.insert(key.code, now).is_some();
                    // Arrows step again on repeat; Enter is edge-triggered.
                    if !was_held || nav != NavKey::Enter {
                        self.events.push(InputEvent::KeyDown(nav));
                    }
                }
            }
            return;
        }

        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Backspace => self.events.push(InputEvent::Backspace),
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.events.push(InputEvent::Char(c));
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column as i32, mouse.row as i32);
        let event = match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => InputEvent::PointerMove { x, y },
            MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown { x, y },
            MouseEventKind::Up(MouseButton::Left) => InputEvent::PointerUp { x, y },
            _ => return,
        };
        self.events.push(event);
    }

    /// Expire keys that have timed out (fallback for terminals without Release)
    fn expire(&mut self, now: Instant) {
        if self.honor_release {
            return;
        }
        let events = &mut self.events;
        self.last_active.retain(|code, t| {
            let held = now.duration_since(*t) < HOLD_TIMEOUT;
            if !held {
                if let Some(nav) = nav_key(*code) {
                    events.push(InputEvent::KeyUp(nav));
                }
            }
            held
        });
    }
}

fn nav_key(code: KeyCode) -> Option<NavKey> {
    match code {
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Left | KeyCode::BackTab => Some(NavKey::Left),
        KeyCode::Right | KeyCode::Tab => Some(NavKey::Right),
        KeyCode::Enter => Some(NavKey::Enter),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL)
            && (key.code == KeyCode::Char('c') || key.code == KeyCode::Char('C')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    // ── Keys ──

    #[test]
    fn enter_fires_once_while_held() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.feed(key(KeyCode::Enter, KeyEventKind::Press), t);
        input.feed(key(KeyCode::Enter, KeyEventKind::Repeat), t + Duration::from_millis(30));
        assert_eq!(input.events, vec![InputEvent::KeyDown(NavKey::Enter)]);
    }

    #[test]
    fn arrows_repeat() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.feed(key(KeyCode::Down, KeyEventKind::Press), t);
        input.feed(key(KeyCode::Down, KeyEventKind::Repeat), t);
        assert_eq!(input.events, vec![InputEvent::KeyDown(NavKey::Down); 2]);
    }

    #[test]
    fn timeout_synthesizes_release() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.feed(key(KeyCode::Enter, KeyEventKind::Press), t);
        input.events.clear();
        input.expire(t + Duration::from_millis(50));
        assert!(input.events.is_empty());
        input.expire(t + HOLD_TIMEOUT);
        assert_eq!(input.events, vec![InputEvent::KeyUp(NavKey::Enter)]);
    }

    #[test]
    fn explicit_release_when_honored() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t = Instant::now();
        input.feed(key(KeyCode::Enter, KeyEventKind::Press), t);
        input.feed(key(KeyCode::Enter, KeyEventKind::Release), t);
        assert_eq!(
            input.events,
            vec![InputEvent::KeyDown(NavKey::Enter), InputEvent::KeyUp(NavKey::Enter)]
        );
    }

    #[test]
    fn typing_and_quit() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.feed(key(KeyCode::Char('q'), KeyEventKind::Press), t);
        input.feed(key(KeyCode::Backspace, KeyEventKind::Press), t);
        assert_eq!(input.events, vec![InputEvent::Char('q'), InputEvent::Backspace]);
        assert!(!input.quit_requested());

        input.feed(
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            t,
        );
        assert!(input.quit_requested());
        assert_eq!(input.events.len(), 2);
    }

    // ── Mouse ──

    #[test]
    fn mouse_maps_to_pointer_gestures() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.feed(mouse(MouseEventKind::Moved, 3, 4), t);
        input.feed(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4), t);
        input.feed(mouse(MouseEventKind::Down(MouseButton::Right), 3, 4), t);
        input.feed(mouse(MouseEventKind::Up(MouseButton::Left), 5, 4), t);
        input.feed(Event::Resize(100, 30), t);
        assert_eq!(
            input.events,
            vec![
                InputEvent::PointerMove { x: 3, y: 4 },
                InputEvent::PointerDown { x: 3, y: 4 },
                InputEvent::PointerUp { x: 5, y: 4 },
            ]
        );
    }
}
