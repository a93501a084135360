//! Bounce Field entry point
//!
//! Runs the field offscreen for the configured number of frames and
//! optionally writes the last frame out as a PPM image.
//!
//! Usage: `bounce-field [settings.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use bounce_field::platform::HeadlessWindow;
use bounce_field::{Game, Result, Settings};

fn run() -> Result<()> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref());

    let mut window = HeadlessWindow::new(
        settings.window_width,
        settings.window_height,
        settings.target_fps,
    )
    .with_frame_limit(settings.frames);

    let mut game = Game::new(&settings);
    game.run(&mut window);

    if let Some(path) = &settings.snapshot_path {
        window.save_ppm(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Bounce Field starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
