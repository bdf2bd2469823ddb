//! Property-based invariant tests for canvas compositing.
//!
//! Verifies:
//! 1. Sprites at any position never fault and never touch pixels outside
//!    their clipped footprint
//! 2. Fully transparent sprites leave the canvas unchanged
//! 3. Opaque sprites copy their color onto every covered pixel
//! 4. Reset restores the base regardless of what was drawn
//! 5. Load/get round trip for arbitrary buffers

use proptest::prelude::*;
use spritevid::{Canvas, Pixel, PixelBuffer, Sprite, SpriteSheet};

const CANVAS_W: i32 = 16;
const CANVAS_H: i32 = 12;

fn base() -> PixelBuffer {
    PixelBuffer::filled(CANVAS_W, CANVAS_H, Pixel::rgb(7, 7, 7)).unwrap()
}

fn arb_coord() -> impl Strategy<Value = i32> {
    prop_oneof![
        -40i32..40,
        Just(i32::MIN),
        Just(i32::MAX),
        Just(i32::MIN / 2),
        Just(i32::MAX - 3),
    ]
}

fn arb_pixel() -> impl Strategy<Value = Pixel> {
    any::<u32>().prop_map(Pixel)
}

fn covered(x: i32, y: i32, sx: i32, sy: i32, w: i32, h: i32) -> bool {
    let (x, y, sx, sy) = (x as i64, y as i64, sx as i64, sy as i64);
    x >= sx && x < sx + w as i64 && y >= sy && y < sy + h as i64
}

proptest! {
    #[test]
    fn drawing_anywhere_only_touches_the_footprint(
        x in arb_coord(),
        y in arb_coord(),
        w in 0i32..24,
        h in 0i32..24,
        color in arb_pixel(),
    ) {
        let mut canvas = Canvas::with_base(base());
        let sprite = Sprite::solid(w, h, color).unwrap().with_position(x, y);

        canvas.draw(&sprite);

        prop_assert_eq!(canvas.frame().len(), (CANVAS_W * CANVAS_H) as usize);
        for cy in 0..CANVAS_H {
            for cx in 0..CANVAS_W {
                let expected = if covered(cx, cy, x, y, w, h) {
                    color.over(Pixel::rgb(7, 7, 7))
                } else {
                    Pixel::rgb(7, 7, 7)
                };
                prop_assert_eq!(canvas.get_pixel(cx, cy), Some(expected));
            }
        }
    }

    #[test]
    fn transparent_sprites_are_no_ops(
        x in -20i32..20,
        y in -20i32..20,
        rgb in any::<[u8; 3]>(),
    ) {
        let mut canvas = Canvas::with_base(base());
        let sprite = Sprite::solid(9, 9, Pixel::rgba(rgb[0], rgb[1], rgb[2], 0))
            .unwrap()
            .with_position(x, y);

        canvas.draw(&sprite);

        prop_assert_eq!(canvas.frame(), &base());
    }

    #[test]
    fn opaque_sprites_overwrite(x in 0..CANVAS_W, y in 0..CANVAS_H, rgb in any::<[u8; 3]>()) {
        let mut canvas = Canvas::with_base(base());
        let color = Pixel::rgba(rgb[0], rgb[1], rgb[2], 255);

        canvas.draw(&Sprite::solid(1, 1, color).unwrap().with_position(x, y));

        prop_assert_eq!(canvas.get_pixel(x, y), Some(color));
    }

    #[test]
    fn sheet_cells_never_fault(
        rows in 1i32..5,
        columns in 1i32..5,
        w in 0i32..20,
        h in 0i32..20,
        row in -2i32..6,
        col in -2i32..6,
        x in arb_coord(),
        y in arb_coord(),
    ) {
        let mut sheet = SpriteSheet::new(Sprite::solid(w, h, Pixel::WHITE).unwrap(), rows, columns).unwrap();
        sheet.sprite_mut().set_position(x, y);
        let mut canvas = Canvas::with_base(base());

        let result = canvas.draw_cell(&sheet, row, col);

        let in_range = (0..rows).contains(&row) && (0..columns).contains(&col);
        prop_assert_eq!(result.is_ok(), in_range);
        prop_assert_eq!(canvas.frame().len(), (CANVAS_W * CANVAS_H) as usize);
    }

    #[test]
    fn reset_restores_base(draws in prop::collection::vec((arb_coord(), arb_coord(), arb_pixel()), 0..8)) {
        let mut canvas = Canvas::with_base(base());
        for (x, y, color) in draws {
            canvas.draw(&Sprite::solid(5, 5, color).unwrap().with_position(x, y));
        }

        canvas.reset(&base());
        canvas.reset(&base());

        prop_assert_eq!(canvas.frame(), &base());
    }

    #[test]
    fn load_then_get_round_trips(w in 1usize..12, h in 1usize..12, seed in any::<u32>()) {
        let raw: Vec<Pixel> = (0..w * h)
            .map(|i| Pixel(seed.wrapping_mul(2654435761).wrapping_add(i as u32)))
            .collect();

        let buffer = PixelBuffer::load(&raw, w, h).unwrap();

        for y in 0..h {
            for x in 0..w {
                prop_assert_eq!(buffer.get(x as i32, y as i32), Some(raw[y * w + x]));
            }
        }
        prop_assert_eq!(PixelBuffer::from_rgba_bytes(&buffer.to_rgba_bytes(false), w, h).unwrap(), buffer);
    }
}
