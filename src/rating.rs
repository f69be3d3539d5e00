//! # Star Rating Slots
//!
//! A forecast window carries a solid and a faded star rating. Together with the
//! remaining blank stars they form a six-unit scale, which the bot displays as a
//! row of emoji where each emoji covers two units (e.g. one solid half and one
//! faded half). This module splits a rating into those two-unit slots.

/// Total units on the composite rating scale.
pub const RATING_SCALE: i64 = 6;

/// Highest solid or faded rating the API documents.
pub const MAX_STAR_RATING: i64 = 5;

/// Units covered by one emoji slot.
const SLOT_WIDTH: u32 = 2;

/// One emoji slot, identified by how many solid, faded and blank units it holds.
///
/// The first six variants are the full slots. The last three only appear as the
/// final slot of an odd total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RatingSlot {
    SolidSolid,
    SolidFaded,
    SolidBlank,
    FadedFaded,
    FadedBlank,
    BlankBlank,
    Solid,
    Faded,
    Blank,
}

impl RatingSlot {
    /// Build a slot from a (solid, faded, blank) unit triple.
    /// Returns `None` for an empty triple or one wider than a slot.
    pub fn from_counts(solid: u32, faded: u32, blank: u32) -> Option<Self> {
        match (solid, faded, blank) {
            (2, 0, 0) => Some(Self::SolidSolid),
            (1, 1, 0) => Some(Self::SolidFaded),
            (1, 0, 1) => Some(Self::SolidBlank),
            (0, 2, 0) => Some(Self::FadedFaded),
            (0, 1, 1) => Some(Self::FadedBlank),
            (0, 0, 2) => Some(Self::BlankBlank),
            (1, 0, 0) => Some(Self::Solid),
            (0, 1, 0) => Some(Self::Faded),
            (0, 0, 1) => Some(Self::Blank),
            _ => None,
        }
    }

    /// The (solid, faded, blank) units this slot covers.
    pub fn counts(self) -> (u32, u32, u32) {
        match self {
            Self::SolidSolid => (2, 0, 0),
            Self::SolidFaded => (1, 1, 0),
            Self::SolidBlank => (1, 0, 1),
            Self::FadedFaded => (0, 2, 0),
            Self::FadedBlank => (0, 1, 1),
            Self::BlankBlank => (0, 0, 2),
            Self::Solid => (1, 0, 0),
            Self::Faded => (0, 1, 0),
            Self::Blank => (0, 0, 1),
        }
    }
}

/// Split a (solid, faded, blank) rating into emoji slots, most significant first.
///
/// Each slot is filled greedily: solid units first, then faded, then blank.
/// Negative counts are treated as zero. A zero total yields no slots, and any
/// other total `n` yields `ceil(n / 2)` slots.
///
/// # Example
/// ```
/// use surf_bot_lib::rating::{star_rating_slots, RatingSlot};
///
/// let slots = star_rating_slots(5, 0, 1);
/// assert_eq!(
///     slots,
///     vec![RatingSlot::SolidSolid, RatingSlot::SolidSolid, RatingSlot::SolidBlank]
/// );
/// ```
pub fn star_rating_slots(solid: i64, faded: i64, blank: i64) -> Vec<RatingSlot> {
    let mut solid = clamp_units(solid);
    let mut faded = clamp_units(faded);
    let mut blank = clamp_units(blank);

    let total = solid as u64 + faded as u64 + blank as u64;
    let mut slots = Vec::with_capacity(total.div_ceil(SLOT_WIDTH as u64) as usize);

    while solid + faded + blank > 0 {
        let num_solid = solid.min(SLOT_WIDTH);
        let num_faded = faded.min(SLOT_WIDTH - num_solid);
        let num_blank = blank.min(SLOT_WIDTH - num_solid - num_faded);

        // Loop condition guarantees a non-empty triple no wider than a slot
        if let Some(slot) = RatingSlot::from_counts(num_solid, num_faded, num_blank) {
            slots.push(slot);
        }

        solid -= num_solid;
        faded -= num_faded;
        blank -= num_blank;
    }

    slots
}

/// Slots for a forecast window's solid/faded rating on the six-unit scale.
///
/// Ratings outside 0-5 are clamped into it first.
pub fn entry_rating_slots(solid_rating: i64, faded_rating: i64) -> Vec<RatingSlot> {
    let solid = solid_rating.clamp(0, MAX_STAR_RATING);
    let faded = faded_rating.clamp(0, MAX_STAR_RATING);
    let blank = (RATING_SCALE - solid - faded).max(0);
    star_rating_slots(solid, faded, blank)
}

/// Negative counts become zero; the upper bound keeps the three-way sum inside `u32`
fn clamp_units(units: i64) -> u32 {
    units.clamp(0, u32::MAX as i64 / 4) as u32
}
