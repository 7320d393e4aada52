/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use error::GameResult;
use domain::input::{FrameInput, Intent};
use sim::game::Game;
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "gooalley.log";

fn main() {
    init_tracing();
    let config = GameConfig::load();
    info!(
        levels = %config.levels_file.display(),
        saves = %config.saves_dir.display(),
        tick_ms = config.speed.tick_rate_ms,
        "starting"
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        std::process::exit(1);
    }

    let mut game = Game::new(Session::new(config));
    let result = game_loop(&mut game, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "game stopped");
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }

    println!();
    println!("Thanks for playing Goo Alley!");
    println!("Final Score: {}", game.session.score);
}

/// The terminal belongs to the game, so logs go to a file.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let Ok(file) = File::create(LOG_FILE) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
}

fn game_loop(game: &mut Game, renderer: &mut Renderer) -> GameResult<()> {
    let mut kb = InputState::new();
    kb.enable_release_events()?;
    info!(release_events = kb.honor_release, "keyboard ready");
    let mut gp = GamepadState::new();
    gp.load_button_config(&game.session.config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }

    let result = run_ticks(game, renderer, &mut kb, &mut gp);
    let popped = kb.disable_release_events();
    result?;
    popped?;
    Ok(())
}

fn run_ticks(
    game: &mut Game,
    renderer: &mut Renderer,
    kb: &mut InputState,
    gp: &mut GamepadState,
) -> GameResult<()> {
    let mut input = FrameInput::default();
    let mut down: Vec<Intent> = Vec::with_capacity(Intent::COUNT);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(game.session.config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            info!("ctrl-c");
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            down.clear();
            kb.intents_down(&mut down);
            gp.intents_down(&mut down);
            input.advance(&down);

            if !game.update(&input)? {
                break;
            }
            last_tick = Instant::now();
        }

        renderer.render(game)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
