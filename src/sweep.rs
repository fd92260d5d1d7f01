use crate::{
    color::{Color, Hsv},
    error::{Error, Result},
};
use log::{debug, trace, warn};

/// How far the slower of saturation and value moves on each step of the sweep.
pub const SWEEP_STEP: f64 = 0.01;

// saturation or value can be left with a vanishingly small step when one of them starts right at a boundary
const MAX_SWEEP_STEPS: u32 = 1_000_000;

/// The outcome of an [`hsv_sweep`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    color: Color,
    steps: u32,
    target_met: bool,
}

impl Sweep {
    pub fn color(self) -> Color {
        self.color
    }

    pub fn steps(self) -> u32 {
        self.steps
    }

    /// Whether the color reached the target luminance. When it didn't, saturation and value have both been pushed to
    /// their boundaries and [`Sweep::color`] is the closest the sweep could get.
    pub fn target_met(self) -> bool {
        self.target_met
    }
}

#[derive(Debug, Clone, Copy)]
struct Walk {
    hue: f64,
    saturation: f64,
    value: f64,
    saturation_step: f64,
    value_step: f64,
}

/// Walks a color through saturation and value until its relative luminance crosses `target_luminance`.
///
/// The hue is first rotated by `hue_shift` turns. Saturation and value then each head towards the boundary they are
/// further from. The coordinate closer to its nearest boundary moves by [`SWEEP_STEP`] per step and the other one
/// moves proportionally faster, so both arrive at their far boundaries together.
///
/// A target above 0.5 is approached from below, anything else from above. The sweep stops at the first color that
/// crosses the target, or once saturation and value can't move any further.
pub fn hsv_sweep(base: Color, target_luminance: f64, hue_shift: f64) -> Result<Sweep> {
    if !hue_shift.is_finite() {
        return Err(Error::InvalidHueShift(hue_shift));
    }

    if target_luminance.is_nan() {
        return Err(Error::InvalidLuminance(target_luminance));
    }

    let increasing = target_luminance > 0.5;
    let mut walk = Walk::new(base.to_hsv(), hue_shift);
    let mut color = walk.color();
    let mut steps = 0;

    debug!(
        "sweeping {} towards luminance {} ({}), saturation step {}, value step {}",
        base,
        target_luminance,
        if increasing { "increasing" } else { "decreasing" },
        walk.saturation_step,
        walk.value_step
    );

    while walk.can_move() && steps < MAX_SWEEP_STEPS {
        walk.step();
        steps += 1;

        color = walk.color();
        let luminance = color.relative_luminance();
        trace!(
            "step {}: s={} v={} luminance={}",
            steps,
            walk.saturation,
            walk.value,
            luminance
        );

        if crosses(increasing, luminance, target_luminance) {
            debug!("sweep reached {} after {} steps", color, steps);
            return Ok(Sweep {
                color,
                steps,
                target_met: true,
            });
        }
    }

    let target_met = crosses(increasing, color.relative_luminance(), target_luminance);
    if !target_met {
        warn!(
            "sweep exhausted after {} steps without reaching luminance {}, settling for {}",
            steps, target_luminance, color
        );
    }

    Ok(Sweep {
        color,
        steps,
        target_met,
    })
}

impl Walk {
    fn new(hsv: Hsv, hue_shift: f64) -> Self {
        let saturation = hsv.saturation;
        let value = hsv.value;

        let (saturation_sign, saturation_diff) = direction(saturation);
        let (value_sign, value_diff) = direction(value);

        let (saturation_step, value_step) = if saturation_diff > value_diff {
            let saturation_step = if value_diff != 0.0 {
                (saturation_diff / value_diff) * SWEEP_STEP * saturation_sign
            } else {
                saturation_diff * SWEEP_STEP * saturation_sign
            };

            (saturation_step, SWEEP_STEP * value_sign)
        } else {
            let value_step = if saturation_diff != 0.0 {
                (value_diff / saturation_diff) * SWEEP_STEP * value_sign
            } else {
                value_diff * SWEEP_STEP * value_sign
            };

            (SWEEP_STEP * saturation_sign, value_step)
        };

        Self {
            hue: (hsv.hue + hue_shift).rem_euclid(1.0),
            saturation,
            value,
            saturation_step,
            value_step,
        }
    }

    fn can_move(&self) -> bool {
        is_inside(self.saturation) || is_inside(self.value)
    }

    fn step(&mut self) {
        self.saturation = (self.saturation + self.saturation_step).clamp(0.0, 1.0);
        self.value = (self.value + self.value_step).clamp(0.0, 1.0);
    }

    fn color(&self) -> Color {
        Hsv {
            hue: self.hue,
            saturation: self.saturation,
            value: self.value,
        }
        .to_color()
    }
}

/// Which way a coordinate should move, and how far it is from the boundary it rounds to. Coordinates that round to 0
/// move up towards 1, everything else moves down towards 0. Halves round to even.
fn direction(coordinate: f64) -> (f64, f64) {
    let rounded = coordinate.round_ties_even();
    let sign = if rounded == 0.0 { 1.0 } else { -1.0 };

    (sign, (rounded - coordinate).abs())
}

fn is_inside(coordinate: f64) -> bool {
    coordinate > 0.0 && coordinate < 1.0
}

fn crosses(increasing: bool, luminance: f64, target: f64) -> bool {
    if increasing {
        luminance >= target
    } else {
        luminance <= target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkens_a_light_color() {
        let base = Color::from_rgb8((223, 240, 216));
        let sweep = hsv_sweep(base, 0.15, 0.15).unwrap();

        assert!(sweep.target_met());
        assert!(sweep.color().relative_luminance() <= 0.15);
        assert!(sweep.steps() > 0 && sweep.steps() <= 100);
    }

    #[test]
    fn lightens_a_dark_color() {
        let base = Color::from_rgb8((40, 20, 60));
        let sweep = hsv_sweep(base, 0.6, 0.15).unwrap();

        assert!(sweep.target_met());
        assert!(sweep.color().relative_luminance() >= 0.6);
    }

    #[test]
    fn rotates_the_hue() {
        let base = Color::new(1.0, 0.2, 0.2).unwrap();
        let sweep = hsv_sweep(base, 0.05, 0.5).unwrap();
        let hue = sweep.color().to_hsv().hue;

        assert!((hue - 0.5).abs() < 1e-6);
    }

    #[test]
    fn hue_wraps_around() {
        let walk = Walk::new(
            Hsv {
                hue: 0.9,
                saturation: 0.5,
                value: 0.5,
            },
            0.25,
        );
        assert!((walk.hue - 0.15).abs() < 1e-12);

        let walk = Walk::new(
            Hsv {
                hue: 0.1,
                saturation: 0.5,
                value: 0.5,
            },
            -0.25,
        );
        assert!((walk.hue - 0.85).abs() < 1e-12);
    }

    #[test]
    fn closer_coordinate_moves_by_the_fixed_step() {
        let walk = Walk::new(
            Hsv {
                hue: 0.0,
                saturation: 0.1,
                value: 0.95,
            },
            0.0,
        );

        assert_eq!(walk.value_step, -SWEEP_STEP);
        assert!((walk.saturation_step - 2.0 * SWEEP_STEP).abs() < 1e-9);
    }

    #[test]
    fn coordinate_on_boundary_scales_by_diff_alone() {
        let walk = Walk::new(
            Hsv {
                hue: 0.0,
                saturation: 0.0,
                value: 0.7,
            },
            0.0,
        );

        assert_eq!(walk.saturation_step, SWEEP_STEP);
        assert!((walk.value_step + 0.3 * SWEEP_STEP).abs() < 1e-12);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(direction(0.5), (1.0, 0.5));
        assert_eq!(direction(0.6).0, -1.0);
        assert_eq!(direction(0.0), (1.0, 0.0));
        assert_eq!(direction(1.0), (-1.0, 0.0));
    }

    #[test]
    fn pinned_color_is_returned_unchanged() {
        // black sits at saturation 0 and value 0, so there's nowhere to walk
        let sweep = hsv_sweep(Color::BLACK, 0.9, 0.15).unwrap();

        assert_eq!(sweep.steps(), 0);
        assert!(!sweep.target_met());
        assert_eq!(sweep.color(), Color::BLACK);
    }

    #[test]
    fn unreachable_target_ends_on_the_boundaries() {
        let sweep = hsv_sweep(Color::new(0.2, 0.4, 0.3).unwrap(), 1.5, 0.0).unwrap();
        let hsv = sweep.color().to_hsv();

        assert!(!sweep.target_met());
        assert!(hsv.saturation == 0.0 || hsv.saturation == 1.0);
        assert!(hsv.value == 0.0 || hsv.value == 1.0);
    }

    #[test]
    fn crawling_coordinate_stops_at_the_step_cap() {
        // gray has no saturation, so value gets the bare diff as its step and barely moves
        let base = Color::new(1.0 - 1e-9, 1.0 - 1e-9, 1.0 - 1e-9).unwrap();
        let sweep = hsv_sweep(base, 1.5, 0.0).unwrap();
        let hsv = sweep.color().to_hsv();

        assert_eq!(sweep.steps(), MAX_SWEEP_STEPS);
        assert!(!sweep.target_met());
        assert!((hsv.saturation - 1.0).abs() < 1e-9);
        assert!(hsv.value > 0.99 && hsv.value < 1.0);
    }

    #[test]
    fn rejects_non_finite_hue_shift() {
        assert!(matches!(
            hsv_sweep(Color::WHITE, 0.1, f64::INFINITY),
            Err(Error::InvalidHueShift(_))
        ));
    }
}
