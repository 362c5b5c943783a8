//! CATastrophe2: physics-flavoured mini-games starring a cat
//!
//! A menu of small 2D games:
//! - Entanglement: two mirrored cats climb a tower together
//! - suPURR Fluid: frictionless momentum, walls are the only brake
//! - Photo-Electric: collect photons, then spend them as bullets

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod game;
mod input;
mod platforming;
mod scenes;

use macroquad::prelude::*;
use app::AppState;
use config::GameConfig;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("CATastrophe2 v{}", VERSION),
        window_width: 1000,
        window_height: 480,
        window_resizable: true,
        high_dpi: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let config = GameConfig::load_or_default();
    let background = config.display.background.color();
    let mut app = AppState::new(config);

    println!("[main] CATastrophe2 v{} started", VERSION);
    if app.input.has_gamepad() {
        println!("[input] gamepad connected");
    }

    loop {
        app.input.poll();

        // Letterbox bars stay black; the viewport clears to the scene color
        clear_background(BLACK);
        set_default_camera();
        app.update(get_frame_time());

        let letterbox = game::camera::Letterbox::fit(
            vec2(app.config.display.virtual_width, app.config.display.virtual_height),
            vec2(screen_width(), screen_height()),
        );
        draw_rectangle(letterbox.origin.x, letterbox.origin.y, letterbox.size.x, letterbox.size.y, background);
        app.draw();

        set_default_camera();
        next_frame().await;
    }
}
