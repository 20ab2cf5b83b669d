// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cropkit_core::{HandleId, Point, Rect, Size};

#[derive(Debug, Parser)]
#[command(name = "cropkit", version, about = "Cropkit: drag a crop rectangle.")]
pub struct Args {
    /// Log to stderr (in addition to the log file)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Override log file path (default: $XDG_STATE_HOME/cropkit/cropkit.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Override config path (default: $XDG_CONFIG_HOME/cropkit/cropkit.rune)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Print the initial crop rectangle for a surface
    Init {
        /// Surface size, e.g. 200x200
        #[arg(long)]
        surface: Size,
    },

    /// Drag one handle and print the rectangle after every update
    Drag {
        #[arg(long)]
        surface: Size,

        #[arg(long)]
        handle: HandleId,

        /// Total translation, e.g. 20,-15
        #[arg(long, allow_hyphen_values = true)]
        by: Point,

        /// Split the gesture into this many equal updates (default: one per
        /// point of travel, like a pointer reporting motion)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        steps: Option<u32>,
    },

    /// Replay a session script
    Run {
        script: PathBuf,

        #[arg(long)]
        surface: Size,
    },

    /// Crop an image with a rectangle given in view coordinates
    Crop {
        image: PathBuf,

        /// Crop rectangle in view units, e.g. 10,10,80,60
        #[arg(long, allow_hyphen_values = true)]
        rect: Rect,

        /// View zoom scale
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// View scroll offset, e.g. 0,0
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<Point>,

        /// Output file (default: <output_directory>/<name>-crop.png)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}
