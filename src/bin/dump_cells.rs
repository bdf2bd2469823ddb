use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;

use spritevid::input::FileImageLoader;
use spritevid::{Sprite, SpriteSheet};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 6 {
        bail!("Usage: dump_cells <image> <rows> <columns> <row> <col>");
    }

    let parse = |idx: usize, name: &str| -> Result<i32> {
        args[idx]
            .parse::<i32>()
            .with_context(|| format!("Invalid {}: {}", name, args[idx]))
    };
    let rows = parse(2, "rows")?;
    let columns = parse(3, "columns")?;
    let row = parse(4, "row")?;
    let col = parse(5, "col")?;

    let sprite = Sprite::try_load_from(&FileImageLoader::default(), Path::new(&args[1]))?;
    let sheet = SpriteSheet::new(sprite, rows, columns)?;

    let rect = sheet.cell_rect(row, col)?;
    let buffer = sheet.sprite().buffer();

    println!(
        "Cell ({}, {}) of {} ({}x{}), source x={} y={} offset={}:",
        row,
        col,
        args[1],
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        rect.offset
    );
    println!("{}", "=".repeat(rect.width + 5));

    // Rows are stored bottom-up; print the top row first
    for i in (0..rect.height).rev() {
        let y = (rect.y + i) as i32;
        print!("{:3} |", i);
        for j in 0..rect.width {
            let x = (rect.x + j) as i32;
            let ch = match buffer.get(x, y).map(|p| p.a()) {
                Some(255) => '#',
                Some(0) | None => '.',
                Some(_) => '+',
            };
            print!("{}", ch);
        }
        println!("|");
    }
    println!("{}", "=".repeat(rect.width + 5));

    Ok(())
}
