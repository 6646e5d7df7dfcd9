/// Entry point and client loop.

mod config;
mod domain;
mod error;
mod net;
mod session;
mod ui;
mod view;

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{ClientConfig, LoggingConfig};
use domain::command::Request;
use net::socket::WebSocketTransport;
use net::{latest_snapshot, NetEvent, Transport};
use session::client::{InputEvent, Session};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{Cue, SoundEngine};

fn main() {
    let config = ClientConfig::load();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Could not open log file {}: {e}", config.logging.file.display());
    }
    for note in &config.notes {
        warn!("{note}");
    }
    info!(source = ?config.source, url = %config.server.url, "client starting");

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.audio_enabled { SoundEngine::new() } else { None };

    let result = client_loop(&mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "client stopped");
        eprintln!("Client error: {e}");
    }
}

/// File-backed subscriber; the terminal itself is in raw mode.
fn init_logging(cfg: &LoggingConfig) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(&cfg.file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn client_loop(
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut transport = WebSocketTransport::spawn(&config.server.url)?;
    let mut session = Session::new(renderer.viewport(), config);
    let mut kb = InputState::new();
    kb.honor_release = renderer.reports_key_release();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    loop {
        // ── Network ──
        let (snapshot, events) = latest_snapshot(transport.poll());
        for event in events {
            match event {
                NetEvent::Connected => info!(url = %config.server.url, "connected"),
                NetEvent::Disconnected(reason) => {
                    error!(%reason, "server connection lost");
                    play(sound, Cue::Lost);
                }
                NetEvent::Snapshot(_) => {}
            }
        }
        if let Some(snapshot) = snapshot {
            session.on_snapshot(snapshot);
            play(sound, Cue::Screen);
        }

        // ── Input ──
        kb.drain_events();
        gp.update();

        if kb.quit_requested() {
            break;
        }

        let mut inputs = std::mem::take(&mut kb.events);
        if let Some(size) = renderer.poll_resize()? {
            inputs.push(InputEvent::Resize(size));
        }
        inputs.extend(gp.events());

        for input in inputs {
            let before = session.navigator().selected();
            let request = session.handle(input);
            if session.navigator().selected() != before && !matches!(input, InputEvent::Resize(_)) {
                play(sound, Cue::Cursor);
            }
            if let Some(request) = request {
                if send(&mut transport, &request) {
                    play(sound, Cue::Confirm);
                }
            }
        }

        if let Some(resync) = session.tick(Instant::now()) {
            send(&mut transport, &resync);
        }

        // ── Render ──
        renderer.render(&session)?;

        std::thread::sleep(config.display.frame);
    }

    Ok(())
}

/// A failed send leaves the gate engaged; the reply timeout asks for state again.
fn send(transport: &mut impl Transport, request: &Request) -> bool {
    match transport.send(request) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, ?request, "could not send request");
            false
        }
    }
}

fn play(sound: Option<&SoundEngine>, cue: Cue) {
    if let Some(sfx) = sound {
        sfx.play(cue);
    }
}
