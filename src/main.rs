// GUI-subsystem binary: no console window is allocated on Windows.
#![windows_subsystem = "windows"]

use clap::Parser;
use eframe::egui;

use pixelfe::cli::Args;
use pixelfe::{PixelFeApp, logger};

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    // Initialize session log (overwrites the previous session's log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 640.0])
            .with_min_inner_size([320.0, 280.0])
            .with_title("PixelFE"),
        ..Default::default()
    };

    eframe::run_native(
        "PixelFE",
        options,
        Box::new(move |cc| Box::new(PixelFeApp::new(cc, &args))),
    )
}
