#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

use clap::Parser;
use eframe::egui;

use glslopt::app::{GlslOptApp, APP_NAME};
use glslopt::{cli, log_err, logger};

fn main() -> ExitCode {
    if cli::is_cli_mode() {
        return cli::run(cli::CliArgs::parse());
    }

    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"))),
        ..Default::default()
    };

    match eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| Box::new(GlslOptApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("failed to start the GUI: {}", e);
            eprintln!("error: failed to start the GUI: {}", e);
            ExitCode::FAILURE
        }
    }
}
