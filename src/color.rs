use crate::{
    contrast,
    error::{Channel, Error, Result},
};
use palette::{encoding, FromColor, RgbHue, Srgb};
use std::fmt;

type PaletteHsv = palette::Hsv<encoding::Srgb, f64>;
type PaletteHsl = palette::Hsl<encoding::Srgb, f64>;

/// An sRGB color with each channel normalized to `[0, 1]`.
///
/// Colors are only constructed through range-checked constructors or by the crate's own transformations, which clamp
/// their results, so every channel of every `Color` lies within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ColorRepr", into = "ColorRepr")
)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
}

/// A color in the HSV space. All three coordinates are in `[0, 1]`; the hue is a fraction of a full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// A color in the HSL space, laid out like [`Hsv`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ColorRepr {
    red: f64,
    green: f64,
    blue: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
    };

    pub const WHITE: Color = Color {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn new(red: f64, green: f64, blue: f64) -> Result<Color> {
        Ok(Self {
            red: check_channel(Channel::Red, red)?,
            green: check_channel(Channel::Green, green)?,
            blue: check_channel(Channel::Blue, blue)?,
        })
    }

    pub fn from_rgb8((red, green, blue): (u8, u8, u8)) -> Color {
        Self {
            red: red as f64 / 255.0,
            green: green as f64 / 255.0,
            blue: blue as f64 / 255.0,
        }
    }

    // used for values coming out of float arithmetic that may drift a hair outside of the range
    fn clamped(red: f64, green: f64, blue: f64) -> Color {
        Self {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
        }
    }

    pub fn red(self) -> f64 {
        self.red
    }

    pub fn green(self) -> f64 {
        self.green
    }

    pub fn blue(self) -> f64 {
        self.blue
    }

    pub fn components(self) -> (f64, f64, f64) {
        (self.red, self.green, self.blue)
    }

    pub fn relative_luminance(self) -> f64 {
        contrast::relative_luminance(self)
    }

    pub fn to_hsv(self) -> Hsv {
        let hsv = PaletteHsv::from_color(Srgb::<f64>::new(self.red, self.green, self.blue));

        Hsv {
            hue: (hsv.hue.into_positive_degrees() / 360.0).rem_euclid(1.0),
            saturation: hsv.saturation,
            value: hsv.value,
        }
    }

    pub fn to_hsl(self) -> Hsl {
        let hsl = PaletteHsl::from_color(Srgb::<f64>::new(self.red, self.green, self.blue));

        Hsl {
            hue: (hsl.hue.into_positive_degrees() / 360.0).rem_euclid(1.0),
            saturation: hsl.saturation,
            lightness: hsl.lightness,
        }
    }

    /// Formats the color as six lowercase hex digits without a leading `#`.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        (to_u8(self.red), to_u8(self.green), to_u8(self.blue))
    }

    /// Returns the componentwise mean of the given colors.
    pub fn average(colors: &[Color]) -> Result<Color> {
        if colors.is_empty() {
            return Err(Error::EmptyColors);
        }

        let (red_sum, green_sum, blue_sum) = colors
            .iter()
            .fold((0.0, 0.0, 0.0), |(r, g, b), color| (r + color.red, g + color.green, b + color.blue));
        let count = colors.len() as f64;

        Ok(Self::clamped(red_sum / count, green_sum / count, blue_sum / count))
    }
}

impl Hsv {
    pub fn to_color(self) -> Color {
        let hsv = PaletteHsv::new(RgbHue::from_degrees(self.hue * 360.0), self.saturation, self.value);
        let (r, g, b) = Srgb::<f64>::from_color(hsv).into_components();

        Color::clamped(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl TryFrom<ColorRepr> for Color {
    type Error = Error;

    fn try_from(repr: ColorRepr) -> Result<Color> {
        Color::new(repr.red, repr.green, repr.blue)
    }
}

#[cfg(feature = "serde")]
impl From<Color> for ColorRepr {
    fn from(color: Color) -> ColorRepr {
        ColorRepr {
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }
}

/// Componentwise mean of the given colors. Fails on an empty list.
pub fn average(colors: &[Color]) -> Result<Color> {
    Color::average(colors)
}

fn check_channel(channel: Channel, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidChannel { channel, value })
    }
}

fn to_u8(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::new(0.0, 0.5, 1.0).unwrap().to_hex(), "0080ff");
        assert_eq!(Color::WHITE.to_hex(), "ffffff");
        assert_eq!(Color::BLACK.to_hex(), "000000");
        assert_eq!(Color::from_rgb8((223, 240, 216)).to_string(), "#dff0d8");
    }

    #[test]
    fn rejects_out_of_range_channels() {
        assert!(matches!(
            Color::new(1.5, 0.0, 0.0),
            Err(Error::InvalidChannel {
                channel: Channel::Red,
                ..
            })
        ));
        assert!(matches!(
            Color::new(0.0, 0.0, -0.1),
            Err(Error::InvalidChannel {
                channel: Channel::Blue,
                ..
            })
        ));
        assert!(Color::new(0.0, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn averages_black_and_white_to_gray() {
        let gray = average(&[Color::BLACK, Color::WHITE]).unwrap();
        assert_eq!(gray.components(), (0.5, 0.5, 0.5));
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        assert!(matches!(average(&[]), Err(Error::EmptyColors)));
    }

    #[test]
    fn hsv_of_primaries() {
        let red = Color::new(1.0, 0.0, 0.0).unwrap().to_hsv();
        assert!(red.hue.abs() < 1e-9);
        assert!((red.saturation - 1.0).abs() < 1e-9);
        assert!((red.value - 1.0).abs() < 1e-9);

        let blue = Color::new(0.0, 0.0, 1.0).unwrap().to_hsv();
        assert!((blue.hue - 2.0 / 3.0).abs() < 1e-9);

        let gray = Color::new(0.5, 0.5, 0.5).unwrap().to_hsv();
        assert_eq!(gray.saturation, 0.0);
        assert!((gray.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hsl_of_gray_and_orange() {
        let gray = Color::new(0.5, 0.5, 0.5).unwrap().to_hsl();
        assert_eq!(gray.saturation, 0.0);
        assert!((gray.lightness - 0.5).abs() < 1e-9);

        let orange = Color::new(1.0, 0.5, 0.0).unwrap().to_hsl();
        assert!((orange.hue - 30.0 / 360.0).abs() < 1e-9);
        assert!((orange.saturation - 1.0).abs() < 1e-9);
        assert!((orange.lightness - 0.5).abs() < 1e-9);
    }

    #[test]
    fn conversions_keep_double_precision() {
        let color = Color::new(0.123456789012345, 0.987654321098765, 0.5).unwrap();
        let back = color.to_hsv().to_color();

        assert!((color.red() - back.red()).abs() < 1e-12);
        assert!((color.green() - back.green()).abs() < 1e-12);
        assert!((color.to_hsl().lightness - (0.123456789012345 + 0.987654321098765) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn hsv_conversion_goes_both_ways() {
        let color = Color::from_rgb8((223, 240, 216));
        let back = color.to_hsv().to_color();

        assert!((color.red() - back.red()).abs() < 1e-9);
        assert!((color.green() - back.green()).abs() < 1e-9);
        assert!((color.blue() - back.blue()).abs() < 1e-9);
    }
}
