//! Geometry primitives shared by the packer, the allocator and the reports.
//!
//! Lengths are integer micrometres; see [`mm_to_units`].

/// Internal length units per millimetre.
pub const UNITS_PER_MM: f64 = 1000.0;

/// Converts a millimetre value to integer micrometres, rounding to nearest.
///
/// Returns `None` for non-finite, negative or out-of-range values.
pub fn mm_to_units(mm: f64) -> Option<u32> {
    if !mm.is_finite() || mm < 0.0 {
        return None;
    }
    let units = (mm * UNITS_PER_MM).round();
    if units > u32::MAX as f64 {
        return None;
    }
    Some(units as u32)
}

pub fn units_to_mm(units: u32) -> f64 {
    units as f64 / UNITS_PER_MM
}

pub fn area_to_mm2(area: u64) -> f64 {
    area as f64 / (UNITS_PER_MM * UNITS_PER_MM)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    pub fn is_square(&self) -> bool {
        self.w == self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", units_to_mm(self.w), units_to_mm(self.h))
    }
}

/// A candidate empty region on one board, in usable-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

impl FreeRect {
    pub fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as u64 + other.rect.w as u64 <= self.x as u64 + self.rect.w as u64
            && other.y as u64 + other.rect.h as u64 <= self.y as u64 + self.rect.h as u64
    }
}

/// Margins removed from each edge of the raw board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trim {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// A board type: raw sheet size plus trims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sheet {
    pub size: Rect,
    pub trim: Trim,
}

impl Sheet {
    /// Usable region after trimming. Empty when the trims eat the whole sheet.
    pub fn usable(&self) -> Rect {
        let w = self
            .size
            .w
            .saturating_sub(self.trim.left.saturating_add(self.trim.right));
        let h = self
            .size
            .h
            .saturating_sub(self.trim.top.saturating_add(self.trim.bottom));
        Rect::new(w, h)
    }

    /// Length of the trim cuts made once on every opened board.
    pub fn trim_cut_length(&self) -> u64 {
        let horizontal = [self.trim.top, self.trim.bottom]
            .iter()
            .filter(|&&t| t > 0)
            .count() as u64;
        let vertical = [self.trim.left, self.trim.right]
            .iter()
            .filter(|&&t| t > 0)
            .count() as u64;
        horizontal * self.size.w as u64 + vertical * self.size.h as u64
    }
}

/// One validated part line: `qty` identical copies of `rect`.
#[derive(Debug, Clone)]
pub struct Demand {
    pub id: String,
    pub rect: Rect,
    pub qty: u32,
    pub allow_rotate: bool,
    pub grain_locked: bool,
}

impl Demand {
    /// Rotation is allowed only when requested and the grain is free.
    pub fn can_rotate(&self) -> bool {
        self.allow_rotate && !self.grain_locked
    }
}

/// A part copy placed on a board, in usable-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the originating [`Demand`].
    pub part: usize,
    pub board_id: usize,
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

impl Placement {
    pub fn overlaps(&self, other: &Placement) -> bool {
        let (ax, ay) = (self.x as u64, self.y as u64);
        let (bx, by) = (other.x as u64, other.y as u64);
        ax < bx + other.rect.w as u64
            && bx < ax + self.rect.w as u64
            && ay < by + other.rect.h as u64
            && by < ay + self.rect.h as u64
    }
}
