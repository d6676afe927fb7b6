use atlas_baker_core::catalog::SourceEntry;
use atlas_baker_core::layout::{
    Placement, cmp_by_sequence, cmp_by_size_desc, guess_canvas_width, place_first_fit,
};
use atlas_baker_core::model::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn entry(seq: usize, padded_w: u32, padded_h: u32) -> SourceEntry {
    SourceEntry {
        seq,
        name: seq.to_string(),
        padded_w,
        padded_h,
        archive_index: seq,
        duplicate_of: None,
    }
}

fn duplicate(seq: usize, padded_w: u32, padded_h: u32, of: usize) -> SourceEntry {
    SourceEntry {
        duplicate_of: Some(of),
        ..entry(seq, padded_w, padded_h)
    }
}

#[test]
fn worked_example_three_tiles_at_width_20() {
    // 10x10, 10x10 (duplicate of the first), 20x10.
    let entries = vec![
        entry(0, 10, 10),
        duplicate(1, 10, 10, 0),
        entry(2, 20, 10),
    ];

    // median 10 * sqrt(3) rounds to 17, clamped up to the widest entry.
    let width = guess_canvas_width(&entries);
    assert_eq!(width, 20);

    let (placements, height) = place_first_fit(entries.iter(), width);
    assert_eq!(placements.len(), 2, "duplicate must not be placed");
    assert_eq!(placements[0].seq, 0);
    assert_eq!(placements[0].rect, Rect::new(0, 0, 10, 10));
    // Collides at (0,0), sliding right overruns the canvas, so it walks
    // down one row at a time until it clears the first tile.
    assert_eq!(placements[1].seq, 2);
    assert_eq!(placements[1].rect, Rect::new(0, 10, 20, 10));
    assert_eq!(height, 20);
}

#[test]
fn touching_edges_do_not_intersect() {
    let a = Rect::new(0, 0, 10, 10);
    assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
    assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
    assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    assert!(a.intersects(&Rect::new(0, 0, 1, 1)));
}

#[test]
fn placements_are_pairwise_disjoint() {
    let mut rng = StdRng::seed_from_u64(7);
    let entries: Vec<SourceEntry> = (0..60)
        .map(|i| entry(i, rng.gen_range(3..40), rng.gen_range(3..40)))
        .collect();

    let width = guess_canvas_width(&entries);
    let (placements, height) = place_first_fit(entries.iter(), width);
    assert_eq!(placements.len(), entries.len());

    for (i, a) in placements.iter().enumerate() {
        assert!(a.rect.x + a.rect.w <= width, "placement exceeds canvas width");
        for b in placements.iter().skip(i + 1) {
            assert!(
                !a.rect.intersects(&b.rect),
                "overlap between seq {} and seq {}",
                a.seq,
                b.seq
            );
        }
    }

    let max_bottom = placements
        .iter()
        .map(|p: &Placement| p.rect.y + p.rect.h)
        .max()
        .unwrap();
    assert_eq!(height, max_bottom);
}

#[test]
fn width_estimate_never_below_widest_entry() {
    let entries = vec![entry(0, 5, 5), entry(1, 6, 5), entry(2, 300, 5)];
    assert!(guess_canvas_width(&entries) >= 300);
}

#[test]
fn size_order_is_height_major_with_sequence_tiebreak() {
    let mut entries = vec![entry(0, 8, 8), entry(1, 30, 4), entry(2, 8, 8), entry(3, 4, 12)];
    entries.sort_by(cmp_by_size_desc);
    // Tallest first even when a shorter entry is much wider; equal sizes
    // keep their sequence order.
    let seqs: Vec<usize> = entries.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![3, 0, 2, 1]);

    entries.sort_by(cmp_by_sequence);
    let seqs: Vec<usize> = entries.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3]);
}
