use crate::CoreError;

/// Floating point type used throughout the explorer
pub type Real = f64;

/// Reference cosmic-ray ionization rate (s^-1). Grid `zeta` values are stored
/// as multiples of this rate.
pub const ZETA_SCALE_FACTOR: Real = 1.310e-17;

/// Lifetime (years) of the hot-core and post-shock phases after the defining
/// transition. Samples later than this are labelled `unknown`.
pub const HOT_PHASE_LIFETIME: Real = 1e5;

/// Convert a normalized `zeta` into its physical ionization rate.
pub fn scale_zeta(zeta: Real) -> Real {
    zeta * ZETA_SCALE_FACTOR
}

/// Round to one significant figure by magnitude band: nearest 10 below 100,
/// nearest 100 below 1000, nearest 1000 above. Ties go to the even neighbour.
pub fn custom_round(value: Real) -> Real {
    let step = if value < 100.0 {
        10.0
    } else if value < 1000.0 {
        100.0
    } else {
        1000.0
    };
    (value / step).round_ties_even() * step
}

/// Magnetic field strength (μG) derived from the grid's `bm0` parameter and the
/// pre-shock density, rounded for display.
pub fn field_strength(bm0: Real, initial_dens: Real) -> Real {
    custom_round(bm0 * initial_dens.sqrt())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}
