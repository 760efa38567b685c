pub mod app;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use app::App;
pub use error::{RenderError, Result};

use winit::event_loop::EventLoop;

/// Info-level logging unless `RUST_LOG` says otherwise. Safe to call twice.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Runs the app on a fresh event loop until the window closes, then shuts it down.
pub fn run(mut app: App) -> std::result::Result<(), winit::error::EventLoopError> {
    log::info!("Starting {}", app.settings().window.title);

    let event_loop = EventLoop::new()?;
    let result = event_loop.run_app(&mut app);

    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
    }

    app.shutdown();
    log::info!("Application shutdown complete");

    result
}
