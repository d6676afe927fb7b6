use std::cmp::Ordering;

use crate::catalog::SourceEntry;
use crate::model::Rect;

/// Weight that makes height dominate width when sorting sprites for
/// placement, approximating sort-by-area with height-major ordering.
const SIZE_MAJOR: u32 = 1024;

/// A canonical entry's padded rectangle in canvas space.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub seq: usize,
    pub rect: Rect,
}

/// Canvas width estimate: median padded width times the square root of the
/// entry count (an approximately square grid of median-sized items),
/// clamped so the single widest entry always fits on one row.
///
/// A heuristic, not a guarantee of minimal area; the packer tolerates an
/// estimate that is too small or too generous. Duplicates count like any
/// other entry.
pub fn guess_canvas_width(entries: &[SourceEntry]) -> u32 {
    let mut widths: Vec<u32> = entries.iter().map(|e| e.padded_w).collect();
    widths.sort_unstable();
    let median = widths[widths.len() / 2];
    let max = widths[widths.len() - 1];
    let estimate = (median as f64 * (widths.len() as f64).sqrt()).round() as u32;
    estimate.max(max)
}

/// First-fit placement at a fixed canvas width.
///
/// Entries are processed in the order given; duplicates are skipped (they
/// inherit the canonical rectangle later). Each candidate starts at the
/// origin and slides right past the first already placed rectangle it
/// overlaps, wrapping one pixel row down when the canvas width runs out.
/// Deterministic for a given order. Returns the placements and the
/// resulting canvas height (max of `y + padded_h` over placed entries).
pub fn place_first_fit<'a, I>(ordered: I, canvas_width: u32) -> (Vec<Placement>, u32)
where
    I: IntoIterator<Item = &'a SourceEntry>,
{
    let mut placed: Vec<Placement> = Vec::new();
    let mut height = 0u32;
    for entry in ordered {
        if entry.duplicate_of.is_some() {
            continue;
        }
        let rect = position_entry(&placed, entry.padded_w, entry.padded_h, canvas_width);
        height = height.max(rect.y + rect.h);
        placed.push(Placement {
            seq: entry.seq,
            rect,
        });
    }
    (placed, height)
}

fn position_entry(placed: &[Placement], w: u32, h: u32, canvas_width: u32) -> Rect {
    let mut x = 0u32;
    let mut y = 0u32;
    loop {
        let candidate = Rect::new(x, y, w, h);
        match placed.iter().find(|p| p.rect.intersects(&candidate)) {
            None => return candidate,
            Some(hit) => {
                // Skip past the rectangle we collided with; when that runs
                // off the right edge, try the next pixel row down.
                x = hit.rect.x + hit.rect.w;
                if x + w > canvas_width {
                    x = 0;
                    y += 1;
                }
            }
        }
    }
}

/// Placement order for sprites: biggest first, height dominating width,
/// ties broken by sequence index so the ordering is total.
pub fn cmp_by_size_desc(a: &SourceEntry, b: &SourceEntry) -> Ordering {
    let ka = a.padded_h * SIZE_MAJOR + a.padded_w;
    let kb = b.padded_h * SIZE_MAJOR + b.padded_w;
    kb.cmp(&ka).then_with(|| a.seq.cmp(&b.seq))
}

/// Archive enumeration order, used for tile placement and for emission.
pub fn cmp_by_sequence(a: &SourceEntry, b: &SourceEntry) -> Ordering {
    a.seq.cmp(&b.seq)
}
