//! Relative luminance and contrast ratio as defined by WCAG 2.1.
//!
//! See <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance> and
//! <https://www.w3.org/TR/WCAG21/#dfn-contrast-ratio>.

use crate::{
    color::Color,
    error::{Error, Result},
};

pub const RED_LUMINANCE_WEIGHT: f64 = 0.2126;
pub const GREEN_LUMINANCE_WEIGHT: f64 = 0.7152;
pub const BLUE_LUMINANCE_WEIGHT: f64 = 0.0722;

/// The largest contrast ratio two colors can have, between black and white.
pub const MAX_CONTRAST_RATIO: f64 = 21.0;

const LINEAR_SEGMENT_THRESHOLD: f64 = 0.03928;
const FLARE: f64 = 0.05;

/// The relative luminance of a color, in `[0, 1]`.
pub fn relative_luminance(color: Color) -> f64 {
    let (r, g, b) = color.components();

    linearize(r) * RED_LUMINANCE_WEIGHT + linearize(g) * GREEN_LUMINANCE_WEIGHT + linearize(b) * BLUE_LUMINANCE_WEIGHT
}

/// The contrast ratio between two luminances. The ratio is symmetric and always at least 1.
pub fn contrast_ratio(luminance_x: f64, luminance_y: f64) -> f64 {
    if luminance_x > luminance_y {
        (luminance_x + FLARE) / (luminance_y + FLARE)
    } else {
        (luminance_y + FLARE) / (luminance_x + FLARE)
    }
}

/// The contrast ratio between two colors.
pub fn contrast(a: Color, b: Color) -> f64 {
    contrast_ratio(relative_luminance(a), relative_luminance(b))
}

/// The best contrast ratio any color can reach against `luminance`, capped at `ceiling`.
///
/// The best contrast is found against either pure black or pure white, whichever is further away.
pub fn max_contrast(luminance: f64, ceiling: f64) -> Result<f64> {
    check_luminance(luminance)?;

    if ceiling.is_nan() || ceiling < 1.0 {
        return Err(Error::InvalidCeiling(ceiling));
    }

    let against_black = contrast_ratio(0.0, luminance);
    let against_white = contrast_ratio(1.0, luminance);

    Ok(against_black.max(against_white).min(ceiling))
}

/// Solves for the luminance that has the given contrast ratio against a known luminance.
///
/// The ratio has two solutions: one where the known luminance is the lighter of the pair and one where it's the
/// darker. The darker solution is returned if it's a valid luminance, otherwise the lighter one is returned as-is,
/// even if it's outside `[0, 1]`.
pub fn contrast_to_luminance(contrast: f64, known_luminance: f64) -> Result<f64> {
    check_luminance(known_luminance)?;

    if contrast == 0.0 || !contrast.is_finite() {
        return Err(Error::DegenerateContrast(contrast));
    }

    let lighter = FLARE * (20.0 * known_luminance * contrast + contrast - 1.0);
    let darker = (known_luminance - FLARE * contrast + FLARE) / contrast;

    if (0.0..=1.0).contains(&darker) {
        Ok(darker)
    } else {
        Ok(lighter)
    }
}

pub(crate) fn check_luminance(luminance: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&luminance) {
        Ok(luminance)
    } else {
        Err(Error::InvalidLuminance(luminance))
    }
}

fn linearize(channel: f64) -> f64 {
    if channel > LINEAR_SEGMENT_THRESHOLD {
        ((channel + 0.055) / 1.055).powf(2.4)
    } else {
        channel / 12.92
    }
}
