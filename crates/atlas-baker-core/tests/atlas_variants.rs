use std::io::Cursor;

use atlas_baker_core::archive::MemorySource;
use atlas_baker_core::model::{Rect, SpriteKey};
use atlas_baker_core::pipeline::{build_sprite_atlas, build_tile_atlas};
use atlas_baker_core::AtlasError;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode");
    buf.into_inner()
}

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLANK: [u8; 4] = [0, 0, 0, 0];

#[test]
fn tile_atlas_maps_indices_and_shares_duplicate_rects() {
    let red = png_bytes(4, 4, RED);
    let mut src = MemorySource::new();
    src.push("tiles/0.png", 0xA, red.clone());
    src.push("tiles/1.png", 0xA, red);
    src.push("tiles/2.png", 0xB, png_bytes(6, 6, GREEN));
    src.push("tiles/readme.png", 0xC, png_bytes(4, 4, GREEN));

    let out = build_tile_atlas(&mut src, "tiles/").expect("build");
    let atlas = &out.atlas;

    // "readme" does not parse as a tile index and is silently left out.
    assert_eq!(atlas.len(), 3);
    assert!(atlas.get(&0).is_some());
    assert!(atlas.get(&1).is_some());
    assert!(atlas.get(&2).is_some());

    // The duplicate reuses the canonical interior rectangle verbatim.
    assert_eq!(atlas.get(&0), atlas.get(&1));
    let r0 = *atlas.get(&0).unwrap();
    assert_eq!((r0.w, r0.h), (4, 4));

    // Archive order is preserved: tile 0 was placed first at the origin,
    // one pixel in for the padding border.
    assert_eq!((r0.x, r0.y), (1, 1));

    // Pixels landed inside the interior rect; the border stayed blank.
    assert_eq!(out.rgba.get_pixel(r0.x, r0.y).0, RED);
    assert_eq!(out.rgba.get_pixel(r0.x - 1, r0.y - 1).0, BLANK);

    // Emission order follows the archive.
    let keys: Vec<u32> = atlas.frames.iter().map(|f| f.key).collect();
    assert_eq!(keys, vec![0, 1, 2]);
}

#[test]
fn sprite_atlas_parses_keys_and_skips_bad_names() {
    let mut src = MemorySource::new();
    src.push("sprites/12.png", 1, png_bytes(8, 8, RED));
    src.push("sprites/12_3_1.png", 2, png_bytes(4, 4, GREEN));
    src.push("sprites/abc.png", 3, png_bytes(4, 4, GREEN));

    let out = build_sprite_atlas(&mut src, "sprites/").expect("build");
    let atlas = &out.atlas;

    assert_eq!(atlas.len(), 2, "\"abc\" is excluded with no error raised");
    let plain = SpriteKey {
        sprite: 12,
        model: None,
        remap: None,
    };
    let remapped = SpriteKey {
        sprite: 12,
        model: Some(3),
        remap: Some(1),
    };
    assert!(atlas.get(&plain).is_some());
    assert!(atlas.get(&remapped).is_some());
}

#[test]
fn sprite_atlas_places_largest_first_but_emits_in_archive_order() {
    let mut src = MemorySource::new();
    src.push("sprites/1.png", 1, png_bytes(4, 4, RED));
    src.push("sprites/2.png", 2, png_bytes(8, 8, GREEN));
    src.push("sprites/3.png", 3, png_bytes(16, 16, RED));

    let out = build_sprite_atlas(&mut src, "sprites/").expect("build");
    let atlas = &out.atlas;

    // Emission is ascending sequence order even though placement ran
    // largest-first.
    let sprites: Vec<u32> = atlas.frames.iter().map(|f| f.key.sprite).collect();
    assert_eq!(sprites, vec![1, 2, 3]);

    // The biggest sprite went down first, at the origin.
    let big = SpriteKey {
        sprite: 3,
        model: None,
        remap: None,
    };
    assert_eq!(atlas.get(&big), Some(&Rect::new(1, 1, 16, 16)));
}

#[test]
fn empty_catalog_is_an_error() {
    let mut src = MemorySource::new();
    src.push("other/0.png", 1, png_bytes(4, 4, RED));
    assert!(matches!(
        build_tile_atlas(&mut src, "tiles/"),
        Err(AtlasError::Empty)
    ));
}

#[test]
fn canvas_height_matches_layout() {
    // Two 10x10 padded tiles at canvas width 12 stack vertically.
    let mut src = MemorySource::new();
    src.push("t/0.png", 1, png_bytes(10, 10, RED));
    src.push("t/1.png", 2, png_bytes(10, 10, GREEN));

    let out = build_tile_atlas(&mut src, "t/").expect("build");
    // widths [12, 12]: median 12, estimate round(12 * sqrt(2)) = 17.
    assert_eq!(out.atlas.width, 17);
    assert_eq!(out.atlas.height, 24);
    assert_eq!(out.rgba.dimensions(), (17, 24));
}
