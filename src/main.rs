// SPDX-License-Identifier: GPL-3.0-only

use camera_session::backends::camera::types::Resolution;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-session")]
#[command(about = "Camera session, still capture and QR scanning")]
#[command(version)]
struct Cli {
    /// Image file to serve as a camera (repeat for several cameras)
    #[arg(short, long, global = true)]
    image: Vec<PathBuf>,

    /// Configuration file (default: <config dir>/camera-session/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera index to use (from 'camera-session list', default: last)
        #[arg(short, long)]
        camera: Option<usize>,

        /// Resolution hint, e.g. 1920x1080
        #[arg(short, long)]
        resolution: Option<Resolution>,

        /// Output file path (default: ~/Pictures/camera-session/photo_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan for QR codes
    Scan {
        /// Camera index to use (from 'camera-session list', default: last)
        #[arg(short, long)]
        camera: Option<usize>,

        /// Number of frames to scan
        #[arg(short, long, default_value = "30")]
        frames: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_session=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let source = cli::build_source(&cli.image)?;

    match cli.command {
        Commands::List => cli::list_cameras(source).await,
        Commands::Photo {
            camera,
            resolution,
            output,
        } => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::take_photo(source, config, camera, resolution, output).await
        }
        Commands::Scan { camera, frames } => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::scan(source, config, camera, frames).await
        }
    }
}
