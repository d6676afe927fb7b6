use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Open-interval intersection test: the rectangles overlap unless one
    /// is entirely to the left, right, above, or below the other. Rects
    /// that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Shrinks by one pixel on every side, recovering the unpadded image
    /// bounds from a padded placement rectangle.
    pub fn interior(&self) -> Rect {
        Rect::new(
            self.x + 1,
            self.y + 1,
            self.w.saturating_sub(2),
            self.h.saturating_sub(2),
        )
    }
}

/// Logical identifier of a sprite: `N` or `N_model_remap` in the source name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub sprite: u32,
    pub model: Option<u32>,
    pub remap: Option<u32>,
}

impl FromStr for SpriteKey {
    type Err = ();
    /// Accepts exactly one integer (`"12"`) or three underscore-separated
    /// integers (`"12_3_1"`). Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        match parts.as_slice() {
            [sprite] => Ok(SpriteKey {
                sprite: sprite.parse().map_err(|_| ())?,
                model: None,
                remap: None,
            }),
            [sprite, model, remap] => Ok(SpriteKey {
                sprite: sprite.parse().map_err(|_| ())?,
                model: Some(model.parse().map_err(|_| ())?),
                remap: Some(remap.parse().map_err(|_| ())?),
            }),
            _ => Err(()),
        }
    }
}

/// One mapped source image: its logical key and its interior rectangle
/// within the atlas canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Frame<K> {
    pub key: K,
    pub rect: Rect,
}

/// The durable atlas artifact: canvas dimensions plus the ordered
/// key -> interior-rectangle mapping.
///
/// Frames are kept as an ordered list rather than a map so that the
/// emission order chosen by the build (archive enumeration order) survives
/// serialization. Duplicate source images contribute distinct keys that
/// share one rectangle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Atlas<K> {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame<K>>,
}

impl<K> Atlas<K> {
    /// Looks up the interior rectangle for `key` (first occurrence wins).
    pub fn get(&self, key: &K) -> Option<&Rect>
    where
        K: PartialEq,
    {
        self.frames.iter().find(|f| &f.key == key).map(|f| &f.rect)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fraction of the canvas covered by mapped rectangles, each distinct
    /// rectangle counted once (duplicates share their canonical rect).
    pub fn occupancy(&self) -> f64 {
        let total = (self.width as u64) * (self.height as u64);
        if total == 0 {
            return 0.0;
        }
        let mut seen: Vec<Rect> = Vec::new();
        let mut used = 0u64;
        for f in &self.frames {
            if seen.contains(&f.rect) {
                continue;
            }
            seen.push(f.rect);
            used += (f.rect.w as u64) * (f.rect.h as u64);
        }
        used as f64 / total as f64
    }
}
