//! `mosaic`: textured polygon viewer with synchronized group highlighting.
//!
//! Loads `<assets>/data/shapes.json` plus the stone/marble textures, fits the
//! shapes into a centered square, outlines every shape of the hovered group
//! and shows "Group: … | ID: …" for the clicked shape.

mod app;
mod config;
mod draw;
mod pointer;

use std::process::ExitCode;

use clap::Parser;
use mosaic_core::{TextureRule, Viewport};
use mosaic_engine::logging::init_logging;
use mosaic_engine::window::Runtime;

use crate::app::ViewerApp;
use crate::config::{ViewerArgs, ViewerConfig};

fn main() -> ExitCode {
    let config = ViewerConfig::from(ViewerArgs::parse());
    init_logging(config.logging());

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("mosaic: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ViewerConfig) -> anyhow::Result<()> {
    let rule = TextureRule::default();
    let size = config.window.initial_size;
    let viewport = Viewport::new(size.width as f32, size.height as f32);

    // Layout for the requested size; the first frame re-syncs to the real one.
    let scene = mosaic_core::load(&config.assets, &rule, viewport)?;

    let app = ViewerApp::new(scene, rule, config.background, config.font_bytes())?;
    Runtime::run(config.window.clone(), config.gpu(), app)
}
