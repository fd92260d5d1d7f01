use crate::{color::Color, error::Result, overlay::ColorSource};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io::Read};

/// A palette in JSON form, as returned by image services that extract palettes remotely.
///
/// ```json
/// {
///     "colors": [{"red": 0.87, "green": 0.94, "blue": 0.85, "hex": "#dff0d8"}],
///     "dominant_colors": {"vibrant": {"red": 0.2, "green": 0.4, "blue": 0.8, "hex": "#3366cc"}},
///     "average_luminance": 0.64
/// }
/// ```
///
/// Channels are in `[0, 1]`. Missing (`null`) entries are skipped, and any other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteDocument {
    #[serde(default)]
    colors: Vec<Option<Color>>,
    #[serde(default)]
    dominant_colors: BTreeMap<String, Option<Color>>,
    #[serde(default)]
    average_luminance: Option<f64>,
}

impl PaletteDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R>(reader: R) -> Result<Self>
    where
        R: Read,
    {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn colors(&self) -> Vec<Color> {
        self.colors.iter().flatten().copied().collect()
    }

    /// The dominant colors keyed by name, such as `vibrant` or `muted_dark`.
    pub fn dominant_colors(&self) -> BTreeMap<&str, Color> {
        self.dominant_colors
            .iter()
            .filter_map(|(name, color)| color.map(|color| (name.as_str(), color)))
            .collect()
    }

    pub fn average_luminance(&self) -> Option<f64> {
        self.average_luminance
    }
}

impl ColorSource for PaletteDocument {
    fn sample_colors(&self, dominance: bool) -> Vec<Color> {
        let dominant = self.dominant_colors();

        if dominance && !dominant.is_empty() {
            dominant.into_values().collect()
        } else {
            self.colors()
        }
    }

    fn average_luminance(&self) -> Option<f64> {
        self.average_luminance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const DOCUMENT: &str = r##"{
        "colors": [
            {"red": 0.874509, "green": 0.941176, "blue": 0.847058, "hex": "#dff0d8"},
            null,
            {"red": 0.2, "green": 0.2, "blue": 0.2, "hex": "#333333"}
        ],
        "dominant_colors": {
            "vibrant": {"red": 0.2, "green": 0.4, "blue": 0.8, "hex": "#3366cc"},
            "muted_dark": null
        },
        "average_luminance": 0.64,
        "dominant_colors_count": 1
    }"##;

    #[test]
    fn parses_and_skips_missing_entries() {
        let document = PaletteDocument::from_json(DOCUMENT).unwrap();

        assert_eq!(document.colors().len(), 2);
        assert_eq!(document.colors()[1], Color::new(0.2, 0.2, 0.2).unwrap());
        assert_eq!(document.dominant_colors().len(), 1);
        assert_eq!(document.dominant_colors()["vibrant"].to_hex(), "3366cc");
        assert_eq!(document.average_luminance(), Some(0.64));
    }

    #[test]
    fn dominance_picks_the_dominant_colors() {
        let document = PaletteDocument::from_json(DOCUMENT).unwrap();

        assert_eq!(document.sample_colors(true), vec![Color::new(0.2, 0.4, 0.8).unwrap()]);
        assert_eq!(document.sample_colors(false).len(), 2);
    }

    #[test]
    fn dominance_falls_back_to_colors() {
        let document =
            PaletteDocument::from_json(r#"{"colors": [{"red": 1, "green": 1, "blue": 1}], "dominant_colors": {}}"#)
                .unwrap();

        assert_eq!(document.sample_colors(true), vec![Color::WHITE]);
        assert_eq!(document.average_luminance(), None);
    }

    #[test]
    fn out_of_range_channels_are_rejected() {
        let result = PaletteDocument::from_json(r#"{"colors": [{"red": 255, "green": 0, "blue": 0}]}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn reads_from_a_reader() {
        let document = PaletteDocument::from_reader(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(document.colors().len(), 2);
    }
}
