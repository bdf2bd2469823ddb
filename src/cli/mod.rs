use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spritevid")]
#[command(version)]
#[command(about = "Composite sprites onto a background and render the frames to GIF or PNG", long_about = None)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a scene file to an animated GIF or a PNG sequence
    Render {
        /// Scene file (YAML, or JSON with a .json extension)
        scene: PathBuf,

        /// Output file (.gif or .png)
        #[arg(short, long)]
        output: PathBuf,

        /// Number of frames (overrides the scene)
        #[arg(short, long)]
        frames: Option<u32>,

        /// Delay per frame in centiseconds (overrides the scene)
        #[arg(short, long)]
        delay: Option<u16>,

        /// Keep previous frames instead of resetting to the background
        #[arg(long)]
        trail: bool,

        /// Number of GIF loops (0 = infinite)
        #[arg(short, long, default_value = "0")]
        r#loop: u16,
    },

    /// Print the cell rectangles of a sprite sheet image
    Cells {
        /// Sprite sheet image
        image: PathBuf,

        /// Grid rows
        #[arg(short, long)]
        rows: i32,

        /// Grid columns
        #[arg(short, long)]
        columns: i32,

        /// Keep the file's row order instead of storing rows bottom-up
        #[arg(long)]
        no_flip: bool,
    },
}
