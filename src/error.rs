use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the color math and the palette sources feeding it.
///
/// A search that walks to both saturation/value boundaries without reaching its luminance target is not an error;
/// see [`crate::Sweep::target_met`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("{channel} channel {value} is outside of [0, 1]")]
    InvalidChannel { channel: Channel, value: f64 },

    #[error("cannot average an empty list of colors")]
    EmptyColors,

    #[error("contrast ceiling {0} is below 1")]
    InvalidCeiling(f64),

    #[error("luminance {0} is outside of [0, 1]")]
    InvalidLuminance(f64),

    #[error("hue shift {0} is not a finite number")]
    InvalidHueShift(f64),

    #[error("cannot solve for a luminance at contrast ratio {0}")]
    DegenerateContrast(f64),

    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),

    #[cfg(feature = "serde")]
    #[error("failed to parse palette document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Red => f.write_str("red"),
            Channel::Green => f.write_str("green"),
            Channel::Blue => f.write_str("blue"),
        }
    }
}
