//! Application entry point for the anemone feeding viewer.
//!
//! This binary sets up eframe/egui and delegates all interactive
//! logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger` and is controlled with `RUST_LOG`.
/// All UI state and rendering are handled by [`Viewer`].
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Anemone Feeder",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}
