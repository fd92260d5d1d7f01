use crate::color::{Color, Hsl};

const BLACK_MAX_LIGHTNESS: f64 = 0.05;
const WHITE_MIN_LIGHTNESS: f64 = 0.95;

// the I line runs through skin tones, 10 to 37 degrees of hue
const RED_I_LINE_HUE: (f64, f64) = (10.0 / 360.0, 37.0 / 360.0);
const RED_I_LINE_MAX_SATURATION: f64 = 0.82;

/// A trait used to implement filters for the image quantization process.
///
/// During quantization, filters remove colors from the histogram and drop final swatches whose average color ends up
/// filtered. The same color is given both as sRGB and as HSL.
///
/// Any `Fn(Color, Hsl) -> bool` is a filter as well. See [`crate::PaletteBuilder::add_filter`] on how to add filters.
pub trait Filter {
    /// Return whether a given color should be allowed or not.
    fn is_allowed(&self, color: Color, hsl: Hsl) -> bool;
}

impl<F> Filter for F
where
    F: Fn(Color, Hsl) -> bool,
{
    fn is_allowed(&self, color: Color, hsl: Hsl) -> bool {
        self(color, hsl)
    }
}

/// The default filter included in every [`crate::PaletteBuilder`].
///
/// Disallows colors very close to black or white, and desaturated colors near the red I line.
#[derive(Debug)]
pub struct DefaultFilter;
impl Filter for DefaultFilter {
    fn is_allowed(&self, _: Color, hsl: Hsl) -> bool {
        !is_black(hsl) && !is_white(hsl) && !is_near_red_i_line(hsl)
    }
}

fn is_black(hsl: Hsl) -> bool {
    hsl.lightness <= BLACK_MAX_LIGHTNESS
}

fn is_white(hsl: Hsl) -> bool {
    hsl.lightness >= WHITE_MIN_LIGHTNESS
}

fn is_near_red_i_line(hsl: Hsl) -> bool {
    (RED_I_LINE_HUE.0..=RED_I_LINE_HUE.1).contains(&hsl.hue) && hsl.saturation <= RED_I_LINE_MAX_SATURATION
}
