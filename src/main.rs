use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use prism_demo::app;
use prism_demo::cli::Cli;
use prism_demo::logging::init_logging;
use prism_demo::{DriverConfig, Scene, SceneDriver};

fn run(cli: Cli) -> Result<()> {
    log::info!("Starting {} scene", cli.scene);

    let scene = Scene::build(cli.scene, &cli.mesh)?;
    let driver = SceneDriver::new(scene, DriverConfig::default());

    if cli.headless {
        app::run_headless(driver, cli.frames)?;
        Ok(())
    } else {
        println!("{} - Escape or close the window to quit", cli.scene.title());
        app::run(driver)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
