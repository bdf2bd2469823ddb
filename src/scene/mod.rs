pub mod player;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::renderer::Pixel;

/// A scene file: what to draw, where, and for how many frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_name")]
    pub name: String,

    /// Canvas size; defaults to the background image size.
    #[serde(default)]
    pub canvas: Option<CanvasSize>,

    /// Base image restored at the start of every frame
    #[serde(default)]
    pub background: Option<String>,

    /// Fill behind the background image (or the whole base without one)
    #[serde(default)]
    pub background_color: Option<SceneColor>,

    #[serde(default = "default_frames")]
    pub frames: u32,

    /// Delay per frame in centiseconds
    #[serde(default = "default_delay")]
    pub delay: u16,

    /// Skip the per-frame reset so moving sprites leave trails
    #[serde(default)]
    pub trail: bool,

    /// Store loaded images bottom-up (sheet rows count from the bottom)
    #[serde(default = "default_flip_on_load")]
    pub flip_on_load: bool,

    #[serde(default)]
    pub sprites: Vec<SpriteSpec>,
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_frames() -> u32 {
    1
}

fn default_delay() -> u16 {
    10
}

fn default_flip_on_load() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub id: Option<u32>,

    /// Image file, relative to the scene file
    #[serde(default)]
    pub file: Option<String>,

    /// Procedural single-color sprite, used when no file is given
    #[serde(default)]
    pub solid: Option<SolidSpec>,

    #[serde(default)]
    pub sheet: Option<SheetSpec>,

    /// `[row, col]` cells cycled one per frame; empty means every cell
    #[serde(default)]
    pub cells: Vec<[i32; 2]>,

    #[serde(default)]
    pub position: [i32; 2],

    /// Added to the position after every frame
    #[serde(default)]
    pub velocity: [i32; 2],

    /// Individual pixel overrides applied after loading
    #[serde(default)]
    pub pixels: Vec<PixelEdit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidSpec {
    pub width: i32,
    pub height: i32,
    pub color: SceneColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub rows: i32,
    pub columns: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelEdit {
    pub index: usize,
    pub color: SceneColor,
}

/// A color written either as `[r, g, b, a]` / `[r, g, b]` or as a
/// `"#rrggbb"` / `"#rrggbbaa"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneColor(pub Pixel);

impl SceneColor {
    fn parse_hex(value: &str) -> Option<Pixel> {
        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Pixel::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Pixel::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SceneColor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        struct SceneColorVisitor;

        impl<'de> serde::de::Visitor<'de> for SceneColorVisitor {
            type Value = SceneColor;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a list of 3 or 4 channel values or a '#rrggbb[aa]' string")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<SceneColor, E>
            where
                E: Error,
            {
                SceneColor::parse_hex(value)
                    .map(SceneColor)
                    .ok_or_else(|| E::custom(format!("invalid color '{}'", value)))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<SceneColor, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut channels = Vec::with_capacity(4);
                while let Some(c) = seq.next_element::<u8>()? {
                    channels.push(c);
                }
                match channels[..] {
                    [r, g, b] => Ok(SceneColor(Pixel::rgb(r, g, b))),
                    [r, g, b, a] => Ok(SceneColor(Pixel::rgba(r, g, b, a))),
                    _ => Err(A::Error::custom(format!(
                        "expected 3 or 4 channels, got {}",
                        channels.len()
                    ))),
                }
            }
        }

        deserializer.deserialize_any(SceneColorVisitor)
    }
}

impl Serialize for SceneColor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:08x}", self.0 .0))
    }
}

impl Scene {
    /// Load a scene file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let scene: Scene = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse scene JSON: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse scene YAML: {}", path.display()))?
        };

        Ok(scene)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse scene YAML")
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            name: default_name(),
            canvas: None,
            background: None,
            background_color: None,
            frames: default_frames(),
            delay: default_delay(),
            trail: false,
            flip_on_load: default_flip_on_load(),
            sprites: Vec::new(),
        }
    }
}
