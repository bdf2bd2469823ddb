use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

use spritevid::encoder::{EncoderWrapper, FrameSink, OutputFormat};
use spritevid::input::FileImageLoader;
use spritevid::scene::player::ScenePlayer;
use spritevid::scene::Scene;
use spritevid::{Sprite, SpriteSheet};

fn init_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn render(
    scene_path: &Path,
    output: &Path,
    frames: Option<u32>,
    delay: Option<u16>,
    trail: bool,
    loop_count: u16,
) -> Result<()> {
    let format = match OutputFormat::from_path(output) {
        Some(format) => format,
        None => bail!(
            "Unsupported output format: {} (use .gif or .png)",
            output.display()
        ),
    };

    let scene = Scene::load(scene_path)?;
    let base_dir = scene_path.parent().unwrap_or_else(|| Path::new("."));
    let loader = FileImageLoader::new(scene.flip_on_load);

    let mut player = ScenePlayer::from_scene(&scene, base_dir, &loader)?;
    if let Some(frames) = frames {
        player.set_frames(frames);
    }
    if let Some(delay) = delay {
        player.set_delay(delay);
    }
    if trail {
        player.set_trail(true);
    }

    let canvas = player.canvas();
    let mut encoder = EncoderWrapper::new(
        output,
        canvas.width(),
        canvas.height(),
        format,
        loop_count,
        player.flip_on_load(),
    )?;

    let count = player.play(&mut encoder)?;
    encoder.finish()?;

    info!("Wrote {} frames to {}", count, output.display());
    Ok(())
}

fn print_cells(image: &Path, rows: i32, columns: i32, flip: bool) -> Result<()> {
    let loader = FileImageLoader::new(flip);
    let sprite = Sprite::try_load_from(&loader, image)?;
    let sheet = SpriteSheet::new(sprite, rows, columns)
        .with_context(|| format!("Cannot slice {}", image.display()))?;

    println!(
        "{}: {}x{} image, {}x{} grid, {}x{} cells",
        image.display(),
        sheet.sprite().width(),
        sheet.sprite().height(),
        sheet.rows(),
        sheet.columns(),
        sheet.cell_width(),
        sheet.cell_height()
    );

    for row in 0..rows {
        for col in 0..columns {
            let rect = sheet.cell_rect(row, col)?;
            println!(
                "  cell ({:2}, {:2}) -> x={:4} y={:4} offset={}",
                row, col, rect.x, rect.y, rect.offset
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_logging(args.verbose)?;

    match args.command {
        cli::Command::Render {
            ref scene,
            ref output,
            frames,
            delay,
            trail,
            r#loop,
        } => render(scene, output, frames, delay, trail, r#loop),
        cli::Command::Cells {
            ref image,
            rows,
            columns,
            no_flip,
        } => print_cells(image, rows, columns, !no_flip),
    }
}
