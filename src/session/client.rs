/// Client session: the single owner of everything on screen.
///
/// Holds the latest snapshot, the view built from it, the navigator,
/// the loading gate and the text entry. Terminal events go in,
/// outbound requests come out. Time only enters through `tick`, so the
/// whole type runs under test without a terminal or a socket.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{BattleConfig, ClientConfig};
use crate::domain::command::Request;
use crate::domain::snapshot::Snapshot;
use crate::session::entry::TextEntry;
use crate::session::gate::LoadingGate;
use crate::session::navigator::{NavKey, NavOutcome, Navigator};
use crate::view::dispatch::{self, ScreenView};
use crate::view::geometry::Size;
use crate::view::registry::{Action, ElementRef};
use crate::view::screens::RenderContext;

/// Input already translated from terminal or gamepad events.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    KeyDown(NavKey),
    KeyUp(NavKey),
    Char(char),
    Backspace,
    PointerMove { x: i32, y: i32 },
    PointerDown { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
    Resize(Size),
}

pub struct Session {
    snapshot: Option<Snapshot>,
    view: Option<ScreenView>,
    navigator: Navigator,
    gate: LoadingGate,
    entry: Option<TextEntry>,
    viewport: Size,
    battle: BattleConfig,
    reply_timeout: Duration,
    /// When the current wait for a reply started, or the last state request went out.
    waiting_since: Option<Instant>,
}

impl Session {
    pub fn new(viewport: Size, config: &ClientConfig) -> Self {
        Session {
            snapshot: None,
            view: None,
            navigator: Navigator::new(config.battle.dead_targets_selectable),
            gate: LoadingGate::new(),
            entry: None,
            viewport,
            battle: config.battle,
            reply_timeout: config.server.reply_timeout,
            waiting_since: None,
        }
    }

    pub fn view(&self) -> Option<&ScreenView> {
        self.view.as_ref()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    pub fn entry(&self) -> Option<&TextEntry> {
        self.entry.as_ref()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    // ── Inbound ──

    /// Replace the screen. The previous view, cursor and typed text are dropped.
    pub fn on_snapshot(&mut self, snapshot: Snapshot) {
        debug!(kind = snapshot.kind().as_str(), "snapshot received");
        self.gate.release();
        self.waiting_since = None;
        self.navigator.reset();
        self.entry = None;
        self.snapshot = Some(snapshot);
        self.rebuild();
    }

    // ── Input ──

    /// Feed one input event. Returns the request to send, if the event
    /// completed a gesture.
    pub fn handle(&mut self, event: InputEvent) -> Option<Request> {
        if let InputEvent::Resize(size) = event {
            self.viewport = size;
            self.navigator.reset();
            self.rebuild();
            return None;
        }
        if let InputEvent::KeyUp(key) = event {
            // Releasing a key is always honored so the Enter latch cannot stick.
            self.navigator.key_up(key);
            return None;
        }
        if self.gate.is_engaged() {
            return None;
        }
        let view = self.view.as_ref()?;

        let outcome = match event {
            InputEvent::KeyDown(NavKey::Enter) if self.entry.is_some() => {
                if self.navigator.latch_enter() {
                    return self.submit_entry();
                }
                NavOutcome::Idle
            }
            InputEvent::KeyDown(key) => self.navigator.key_down(&view.registry, key),
            InputEvent::Char(c) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.push(c);
                }
                NavOutcome::Idle
            }
            InputEvent::Backspace => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.backspace();
                }
                NavOutcome::Idle
            }
            InputEvent::PointerMove { x, y } => self.navigator.pointer_moved(&view.registry, x, y),
            InputEvent::PointerDown { x, y } => {
                self.navigator.pointer_down(&view.registry, x, y);
                NavOutcome::Idle
            }
            InputEvent::PointerUp { x, y } => self.navigator.pointer_up(&view.registry, x, y),
            InputEvent::KeyUp(_) | InputEvent::Resize(_) => NavOutcome::Idle,
        };

        match outcome {
            NavOutcome::Idle => None,
            NavOutcome::CursorMoved => {
                self.refocus();
                None
            }
            NavOutcome::Fire(element) => self.fire(element),
        }
    }

    /// One frame of time. Animates the gate and, when a reply is overdue,
    /// asks the server to resend the current state.
    pub fn tick(&mut self, now: Instant) -> Option<Request> {
        self.gate.tick();
        if !self.gate.is_engaged() || self.reply_timeout.is_zero() {
            return None;
        }
        let since = *self.waiting_since.get_or_insert(now);
        if now.duration_since(since) < self.reply_timeout {
            return None;
        }
        warn!(timeout_ms = self.reply_timeout.as_millis() as u64, "no reply from server, requesting state");
        self.waiting_since = Some(now);
        Some(Request::GetGameState)
    }

    // ── Internal ──

    fn context(&self) -> RenderContext {
        RenderContext::new(self.viewport)
            .with_battle(self.battle)
            .with_focus(self.navigator.selected())
    }

    /// Build the view from scratch and bind the navigator to it.
    fn rebuild(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let view = dispatch::dispatch(snapshot, &self.context());
        self.navigator.bind(&view.registry, view.initial_selection);
        if view.entry.is_some() && self.entry.is_none() {
            self.entry = Some(TextEntry::new());
        }
        self.view = Some(view);
        if self.navigator.selected().is_some() {
            self.refocus();
        }
    }

    /// Re-render for the current cursor. The registry does not change.
    fn refocus(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.view = Some(dispatch::dispatch(snapshot, &self.context()));
        }
    }

    fn fire(&mut self, element: ElementRef) -> Option<Request> {
        let view = self.view.as_ref()?;
        let action = view.registry.get(element)?.action.clone();
        if action == Action::SubmitEntry {
            return self.submit_entry();
        }
        let command = action.resolve(&view.kind, "");
        info!(kind = view.kind.as_str(), value = command.value(), "command");
        self.gate.engage();
        Some(command.into())
    }

    fn submit_entry(&mut self) -> Option<Request> {
        let view = self.view.as_ref()?;
        let text = self.entry.as_mut()?.take();
        let command = Action::SubmitEntry.resolve(&view.kind, &text);
        info!(kind = view.kind.as_str(), len = text.len(), "text submitted");
        self.gate.engage();
        Some(command.into())
    }
}
