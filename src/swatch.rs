use crate::color::{Color, Hsl};

/// A color found in an image along with how many of the sampled pixels it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue): (u8, u8, u8), population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn color(self) -> Color {
        Color::from_rgb8(self.rgb())
    }

    pub fn hsl(self) -> Hsl {
        self.color().to_hsl()
    }

    pub fn relative_luminance(self) -> f64 {
        self.color().relative_luminance()
    }

    pub fn population(self) -> u32 {
        self.population
    }
}
