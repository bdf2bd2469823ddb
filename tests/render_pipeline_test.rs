//! End-to-end: image files in, scene played, frames written out.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;

use spritevid::encoder::{EncoderWrapper, FrameCollector, FrameSink, OutputFormat, PngSequence};
use spritevid::input::{FileImageLoader, ImageLoader};
use spritevid::scene::player::ScenePlayer;
use spritevid::scene::Scene;
use spritevid::{Canvas, Pixel, PixelBuffer, Sprite, SpriteSheet};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const NAVY: [u8; 4] = [0, 0, 80, 255];

/// 2x2 sheet: top file row red, bottom file row green.
fn write_sheet(dir: &Path) {
    let mut img = RgbaImage::new(2, 2);
    for x in 0..2 {
        img.put_pixel(x, 0, Rgba(RED));
        img.put_pixel(x, 1, Rgba(GREEN));
    }
    img.save(dir.join("sheet.png")).unwrap();
}

fn write_background(dir: &Path) {
    RgbaImage::from_pixel(4, 4, Rgba(NAVY))
        .save(dir.join("bg.png"))
        .unwrap();
}

#[test]
fn loader_round_trips_channel_order_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut img = RgbaImage::new(3, 2);
    for (i, px) in img.pixels_mut().enumerate() {
        let i = i as u8;
        *px = Rgba([i * 40, 255 - i * 30, i * 7 + 1, 100 + i]);
    }
    let path = dir.path().join("grid.png");
    img.save(&path).unwrap();

    let loaded = FileImageLoader::new(false).load(&path).unwrap();
    let buffer = loaded.into_buffer().unwrap();

    for y in 0..2u32 {
        for x in 0..3u32 {
            let expected = Pixel::from_bytes(img.get_pixel(x, y).0);
            assert_eq!(buffer.get(x as i32, y as i32), Some(expected));
        }
    }
    assert_eq!(buffer.to_rgba_bytes(false), img.into_raw());
}

#[test]
fn sheet_row_zero_is_the_top_of_the_file_after_flip() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());

    let sprite = Sprite::load_from(&FileImageLoader::default(), &dir.path().join("sheet.png"));
    let sheet = SpriteSheet::new(sprite, 2, 1).unwrap();
    let mut canvas = Canvas::new(2, 1).unwrap();

    canvas.draw_cell(&sheet, 0, 0).unwrap();
    assert_eq!(canvas.get_pixel(0, 0), Some(Pixel::from_bytes(RED)));

    canvas.draw_cell(&sheet, 1, 0).unwrap();
    assert_eq!(canvas.get_pixel(1, 0), Some(Pixel::from_bytes(GREEN)));
}

#[test]
fn missing_file_yields_empty_sprite() {
    let dir = tempfile::tempdir().unwrap();
    let sprite = Sprite::load_from(&FileImageLoader::default(), &dir.path().join("missing.png"));

    assert_eq!((sprite.width(), sprite.height()), (0, 0));
}

#[test]
fn scene_renders_to_png_sequence_in_display_order() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());
    write_background(dir.path());
    let scene_path = dir.path().join("scene.yaml");
    fs::write(
        &scene_path,
        r#"
name: pipeline
background: bg.png
frames: 2
sprites:
  - name: walker
    file: sheet.png
    sheet: { rows: 2, columns: 1 }
    cells: [[0, 0], [1, 0]]
    position: [1, 1]
    velocity: [0, 1]
"#,
    )
    .unwrap();

    let scene = Scene::load(&scene_path).unwrap();
    let loader = FileImageLoader::new(scene.flip_on_load);
    let mut player = ScenePlayer::from_scene(&scene, dir.path(), &loader).unwrap();
    let mut sink = PngSequence::new(&dir.path().join("out.png"), player.flip_on_load());

    assert_eq!(player.play(&mut sink).unwrap(), 2);
    let written = sink.written().to_vec();
    sink.finish().unwrap();
    assert_eq!(written.len(), 2);

    // Memory row 1 is display row 2 once flipped back
    let first = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(first.dimensions(), (4, 4));
    assert_eq!(first.get_pixel(1, 2).0, RED);
    assert_eq!(first.get_pixel(2, 2).0, RED);
    assert_eq!(first.get_pixel(0, 0).0, NAVY);

    // Second frame: moved up one display row, showing the other cell
    let second = image::open(&written[1]).unwrap().to_rgba8();
    assert_eq!(second.get_pixel(1, 1).0, GREEN);
    assert_eq!(second.get_pixel(1, 2).0, NAVY);
}

#[test]
fn scene_renders_to_gif() {
    let dir = tempfile::tempdir().unwrap();
    write_background(dir.path());
    let scene_path = dir.path().join("scene.json");
    fs::write(
        &scene_path,
        r##"{
            "background": "bg.png",
            "frames": 4,
            "delay": 3,
            "sprites": [
                {"solid": {"width": 1, "height": 1, "color": "#ffffff80"}, "velocity": [1, 0]}
            ]
        }"##,
    )
    .unwrap();

    let scene = Scene::load(&scene_path).unwrap();
    let mut player = ScenePlayer::from_scene(&scene, dir.path(), &FileImageLoader::default()).unwrap();
    let output = dir.path().join("out.gif");
    let format = OutputFormat::from_path(&output).unwrap();
    let mut encoder = EncoderWrapper::new(&output, 4, 4, format, 0, true).unwrap();

    player.play(&mut encoder).unwrap();
    encoder.finish().unwrap();

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(fs::File::open(&output).unwrap()).unwrap();
    assert_eq!((decoder.width(), decoder.height()), (4, 4));

    // First frame is written whole; the sprite at memory row 0 shows on the
    // bottom display row, blended over the background.
    let first = decoder.read_next_frame().unwrap().unwrap();
    assert_eq!((first.width, first.height), (4, 4));
    let at = |x: usize, y: usize| first.buffer[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4].to_vec();
    assert_eq!(at(0, 3), vec![128, 128, 167, 255]);
    assert_eq!(at(0, 0), NAVY.to_vec());
    let mut delays = vec![first.delay];

    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
    }
    assert_eq!(delays, vec![3; 4]);
}

#[test]
fn half_transparent_sprite_blends_with_background() {
    let mut canvas = Canvas::with_base(PixelBuffer::filled(2, 2, Pixel::rgb(0, 0, 0)).unwrap());
    let mut sprite = Sprite::solid(2, 2, Pixel::rgba(255, 0, 0, 128)).unwrap();
    sprite.set_pixel(3, Pixel::rgba(0, 0, 255, 255));

    canvas.draw(&sprite);

    assert_eq!(canvas.get_pixel(0, 0), Some(Pixel::rgba(128, 0, 0, 255)));
    assert_eq!(canvas.get_pixel(1, 1), Some(Pixel::rgba(0, 0, 255, 255)));
}

#[test]
fn collector_sees_every_frame() {
    let scene = Scene::from_yaml(
        r##"
canvas: { width: 3, height: 3 }
frames: 5
sprites:
  - solid: { width: 1, height: 1, color: "#ffffff" }
    position: [-2, 1]
    velocity: [1, 0]
"##,
    )
    .unwrap();
    let mut player = ScenePlayer::from_scene(&scene, Path::new("."), &FileImageLoader::default()).unwrap();
    let mut sink = FrameCollector::default();

    player.play(&mut sink).unwrap();

    let lit: Vec<usize> = sink
        .frames
        .iter()
        .map(|(f, _)| f.pixels().iter().filter(|p| **p == Pixel::WHITE).count())
        .collect();
    assert_eq!(lit, vec![0, 0, 1, 1, 1]);
}
