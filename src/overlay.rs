use crate::{
    color::Color,
    contrast::{self, check_luminance},
    error::Result,
    sweep::{hsv_sweep, Sweep},
};
use log::debug;

pub const DEFAULT_HUE_SHIFT: f64 = 0.15;
pub const DEFAULT_CONTRAST_RATIO: f64 = 4.5;
pub const DEFAULT_COLOR_COUNT: usize = 6;

/// Something that can supply sampled colors to pick an overlay color against.
pub trait ColorSource {
    /// The sampled colors. When `dominance` is set, the source should prefer its dominant colors if it has any.
    fn sample_colors(&self, dominance: bool) -> Vec<Color>;

    /// A luminance to measure contrast against instead of the luminance of the averaged colors.
    fn average_luminance(&self) -> Option<f64> {
        None
    }
}

/// Settings for [`overlay_color`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct OverlayOptions {
    hue_shift: f64,
    contrast_ratio: f64,
    color_count: usize,
    dominance: bool,
}

/// A display-ready overlay color. `hex` includes the leading `#`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub hex: String,
}

impl OverlayOptions {
    pub fn new() -> Self {
        Self {
            hue_shift: DEFAULT_HUE_SHIFT,
            contrast_ratio: DEFAULT_CONTRAST_RATIO,
            color_count: DEFAULT_COLOR_COUNT,
            dominance: false,
        }
    }

    pub fn hue_shift(self, hue_shift: f64) -> Self {
        Self { hue_shift, ..self }
    }

    pub fn contrast_ratio(self, contrast_ratio: f64) -> Self {
        Self { contrast_ratio, ..self }
    }

    /// How many colors a palette should be quantized into.
    pub fn color_count(self, color_count: usize) -> Self {
        Self { color_count, ..self }
    }

    pub fn dominance(self, dominance: bool) -> Self {
        Self { dominance, ..self }
    }

    pub fn get_hue_shift(&self) -> f64 {
        self.hue_shift
    }

    pub fn get_contrast_ratio(&self) -> f64 {
        self.contrast_ratio
    }

    pub fn get_color_count(&self) -> usize {
        self.color_count
    }

    pub fn get_dominance(&self) -> bool {
        self.dominance
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Color> for OverlayColor {
    fn from(color: Color) -> Self {
        Self {
            red: color.red(),
            green: color.green(),
            blue: color.blue(),
            hex: color.to_string(),
        }
    }
}

impl ColorSource for [Color] {
    fn sample_colors(&self, _: bool) -> Vec<Color> {
        self.to_vec()
    }
}

impl ColorSource for Vec<Color> {
    fn sample_colors(&self, _: bool) -> Vec<Color> {
        self.clone()
    }
}

/// Finds a color with at least `ratio` contrast against the given colors, as far as that's possible.
///
/// The colors are averaged, and the contrast is measured against `reference_luminance` if given, or the luminance
/// of the average otherwise. If no color can reach `ratio` against that luminance, the best possible contrast is
/// targeted instead. The result is an analogous color with its hue rotated by `hue_shift` turns from the average.
///
/// The contrast of the result isn't guaranteed: the underlying [`hsv_sweep`] may run out of room before reaching
/// the target luminance, in which case its closest attempt is returned.
pub fn find_contrasting_color(
    colors: &[Color],
    hue_shift: f64,
    ratio: f64,
    reference_luminance: Option<f64>,
) -> Result<Color> {
    Ok(contrasting_sweep(colors, hue_shift, ratio, reference_luminance)?.color())
}

/// Like [`find_contrasting_color`], but returns the whole [`Sweep`] so callers can tell whether the target was met.
pub fn contrasting_sweep(
    colors: &[Color],
    hue_shift: f64,
    ratio: f64,
    reference_luminance: Option<f64>,
) -> Result<Sweep> {
    let base = Color::average(colors)?;
    let luminance = match reference_luminance {
        Some(luminance) => check_luminance(luminance)?,
        None => base.relative_luminance(),
    };

    let target_contrast = contrast::max_contrast(luminance, ratio)?;
    let target_luminance = contrast::contrast_to_luminance(target_contrast, luminance)?;

    debug!(
        "average {} of {} colors, reference luminance {}, targeting contrast {} at luminance {}",
        base,
        colors.len(),
        luminance,
        target_contrast,
        target_luminance
    );

    hsv_sweep(base, target_luminance, hue_shift)
}

/// Picks an overlay color for a palette, measuring contrast against the palette's average luminance when it has one.
pub fn overlay_color<S>(source: &S, options: &OverlayOptions) -> Result<OverlayColor>
where
    S: ColorSource + ?Sized,
{
    let colors = source.sample_colors(options.dominance);
    let color = find_contrasting_color(
        &colors,
        options.hue_shift,
        options.contrast_ratio,
        source.average_luminance(),
    )?;

    Ok(color.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contrast::contrast, error::Error};

    #[test]
    fn light_green_gets_a_readable_overlay() {
        let background = Color::from_rgb8((223, 240, 216));
        let overlay = find_contrasting_color(&[background], 0.15, 4.5, None).unwrap();

        assert!(contrast(background, overlay) >= 4.5);
    }

    #[test]
    fn dark_targets_are_approached_from_above() {
        // a dark background puts the target luminance below 0.5, which the sweep approaches from above. the background
        // itself is already below it, so the sweep stops on its first step without adding any contrast
        let background = Color::from_rgb8((30, 35, 60));
        let sweep = contrasting_sweep(&[background], 0.15, 4.5, None).unwrap();

        assert!(sweep.target_met());
        assert_eq!(sweep.steps(), 1);
        assert!(contrast(background, sweep.color()) < 4.5);
    }

    #[test]
    fn reference_luminance_overrides_average() {
        let light = Color::new(0.9, 0.8, 0.8).unwrap();
        let sweep = contrasting_sweep(&[light], 0.0, 4.5, Some(0.2)).unwrap();
        let luminance = sweep.color().relative_luminance();

        assert!(sweep.target_met());
        assert!(contrast::contrast_ratio(luminance, 0.2) >= 4.5);
        // measured against the light average alone, a much brighter color would have been enough
        assert!(luminance < 0.01);
    }

    #[test]
    fn empty_colors_are_rejected() {
        assert!(matches!(
            find_contrasting_color(&[], 0.15, 4.5, None),
            Err(Error::EmptyColors)
        ));
    }

    #[test]
    fn bad_ratio_and_luminance_are_rejected() {
        let colors = [Color::WHITE];

        assert!(matches!(
            find_contrasting_color(&colors, 0.15, 0.5, None),
            Err(Error::InvalidCeiling(_))
        ));
        assert!(matches!(
            find_contrasting_color(&colors, 0.15, 4.5, Some(-0.1)),
            Err(Error::InvalidLuminance(_))
        ));
    }

    #[test]
    fn same_input_same_output() {
        let colors = [Color::from_rgb8((120, 80, 200)), Color::from_rgb8((10, 200, 90))];

        let first = find_contrasting_color(&colors, 0.15, 4.5, None).unwrap();
        let second = find_contrasting_color(&colors, 0.15, 4.5, None).unwrap();

        assert_eq!(first.components(), second.components());
    }

    #[test]
    fn options_builder() {
        let options = OverlayOptions::default()
            .hue_shift(0.3)
            .contrast_ratio(7.0)
            .color_count(10)
            .dominance(true);

        assert_eq!(options.get_hue_shift(), 0.3);
        assert_eq!(options.get_contrast_ratio(), 7.0);
        assert_eq!(options.get_color_count(), 10);
        assert!(options.get_dominance());
        assert_eq!(OverlayOptions::default().get_hue_shift(), DEFAULT_HUE_SHIFT);
    }

    #[test]
    fn overlay_record_for_a_color_list() {
        let colors = vec![Color::from_rgb8((223, 240, 216))];
        let overlay = overlay_color(&colors, &OverlayOptions::default()).unwrap();

        assert!(overlay.hex.starts_with('#'));
        assert_eq!(overlay.hex.len(), 7);

        let color = Color::new(overlay.red, overlay.green, overlay.blue).unwrap();
        assert_eq!(overlay.hex, color.to_string());
    }
}
