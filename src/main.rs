//! Space Tennis entry point
//!
//! The browser build mounts on `#canvas`. Natively there is no window, so
//! the binary plays a headless match against an idle left paddle and logs
//! the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    space_tennis::platform::web::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_tennis::Game;
    use space_tennis::audio::MutedAudio;
    use space_tennis::persistence::MemoryStore;
    use space_tennis::scene::NullSink;
    use space_tennis::sim::{GamePhase, Key};

    /// Ten simulated minutes at 60 fps
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Space Tennis (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut game = Game::new(seed, Box::new(MutedAudio), Box::new(MemoryStore::new()));
    game.set_phase_observer(|phase| log::debug!("Phase -> {}", phase.as_str()));

    // Title -> mode select -> difficulty -> countdown
    for _ in 0..3 {
        game.key_down(Key::Enter);
        game.key_up(Key::Enter);
    }

    let mut frames = 0;
    while frames < MAX_FRAMES && game.phase() != GamePhase::GameOver {
        game.frame(frames as f64 * FRAME_MS, &mut NullSink);
        frames += 1;
    }

    let state = game.state();
    println!(
        "{} {} - {} {} after {:.1}s",
        state.left.name,
        state.score_left,
        state.score_right,
        state.right.name,
        state.time
    );
    for line in state.history.recent(5) {
        println!("  {}", line);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
