// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to pick readable overlay colors for images.
//!
//! Given colors sampled from an image, [`find_contrasting_color`] finds an analogous color that reaches a WCAG
//! contrast ratio against them, as closely as it can. The colors can come from anywhere that implements
//! [`ColorSource`]: a plain list of colors, a [`Palette`] extracted from an image with median cut quantization, or a
//! JSON [`PaletteDocument`].
//!
//! ```no_run
//! use contrast_overlay::{overlay_color, OverlayOptions, Palette};
//!
//! let palette = Palette::from_path("cover.jpg")?.generate();
//! let overlay = overlay_color(&palette, &OverlayOptions::default().contrast_ratio(7.0))?;
//! println!("{}", overlay.hex);
//! # Ok::<(), contrast_overlay::Error>(())
//! ```
//!
//! The palette extraction is a reimplementation of the Palette library in Android Jetpack. Android Jetpack is
//! Copyright 2018 The Android Open Source Project. Android Jetpack is licensed under the Apache License, Version 2.0.
//!
//! [Original source.](https://github.com/androidx/androidx/tree/f4eca2c46040cab36ebf7f34e68bdd973110e4a5/palette/palette/src/main/java/androidx/palette/graphics)
//!
//! [Android Jetpack license.](https://github.com/androidx/androidx/blob/7b7922489f9a7572f4462558691bf5550dd65c26/LICENSE.txt)

mod color;
mod color_cut_quantizer;
mod contrast;
#[cfg(feature = "serde")]
mod document;
mod error;
mod filter;
mod overlay;
mod swatch;
mod sweep;
mod target;

pub const DEFAULT_CALCULATE_NUMBER_COLORS: usize = 16;
pub const DEFAULT_RESIZE_IMAGE_AREA: u32 = 112 * 112;

#[cfg(feature = "serde")]
pub use crate::document::PaletteDocument;
pub use crate::{
    color::{average, Color, Hsl, Hsv},
    contrast::{
        contrast, contrast_ratio, contrast_to_luminance, max_contrast, relative_luminance, BLUE_LUMINANCE_WEIGHT,
        GREEN_LUMINANCE_WEIGHT, MAX_CONTRAST_RATIO, RED_LUMINANCE_WEIGHT,
    },
    error::{Channel, Error, Result},
    filter::{DefaultFilter, Filter},
    overlay::{
        contrasting_sweep, find_contrasting_color, overlay_color, ColorSource, OverlayColor, OverlayOptions,
        DEFAULT_COLOR_COUNT, DEFAULT_CONTRAST_RATIO, DEFAULT_HUE_SHIFT,
    },
    swatch::Swatch,
    sweep::{hsv_sweep, Sweep, SWEEP_STEP},
    target::Target,
};
pub use image;

use color_cut_quantizer::ColorCutQuantizer;
use image::{math::Rect, GenericImageView, ImageBuffer};
use log::debug;
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

/// The swatches found in an image, the swatch picked for each target, and the image's average luminance.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
    targets: Vec<Target>,
    selected_swatches: HashMap<u64, Option<Swatch>>,
    average_luminance: Option<f64>,
}

pub struct PaletteBuilder<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    image: ImageBuffer<P, Vec<u8>>,
    targets: Vec<Target>,
    maximum_color_count: usize,
    resize_area: u32,
    region: Option<Rect>,
    filters: Vec<Box<dyn Filter>>,
}

impl Palette {
    pub fn from_image<P>(image: ImageBuffer<P, Vec<u8>>) -> PaletteBuilder<P>
    where
        P: image::Pixel<Subpixel = u8> + 'static,
    {
        PaletteBuilder::from_image(image)
    }

    /// Opens and decodes an image file to build a palette from.
    pub fn from_path<Q>(path: Q) -> Result<PaletteBuilder<image::Rgb<u8>>>
    where
        Q: AsRef<Path>,
    {
        Ok(PaletteBuilder::from_image(image::open(path)?.to_rgb8()))
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The mean relative luminance of every sampled pixel, or `None` if there were no pixels to sample.
    pub fn average_luminance(&self) -> Option<f64> {
        self.average_luminance
    }

    /// The swatch colors, most populous first.
    pub fn colors(&self) -> Vec<Color> {
        let mut swatches = self.swatches.clone();
        swatches.sort_by_key(|swatch| std::cmp::Reverse(swatch.population()));

        swatches.into_iter().map(Swatch::color).collect()
    }

    /// The swatch picked for each target that got one, in target order.
    pub fn dominant_swatches(&self) -> Vec<(Target, Swatch)> {
        self.targets
            .iter()
            .filter_map(|&target| self.get_swatch_for_target(target).map(|swatch| (target, swatch)))
            .collect()
    }

    pub fn light_vibrant_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::light_vibrant())
    }

    pub fn vibrant_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::vibrant())
    }

    pub fn dark_vibrant_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::dark_vibrant())
    }

    pub fn light_muted_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::light_muted())
    }

    pub fn muted_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::muted())
    }

    pub fn dark_muted_swatch(&self) -> Option<Swatch> {
        self.get_swatch_for_target(Target::dark_muted())
    }

    pub fn get_swatch_for_target(&self, target: Target) -> Option<Swatch> {
        self.selected_swatches.get(&target.id()).copied().flatten()
    }

    pub fn most_prominent_color(&self) -> Option<Color> {
        self.swatches
            .iter()
            .max_by_key(|swatch| swatch.population())
            .map(|swatch| swatch.color())
    }

    fn generate(swatches: Vec<Swatch>, mut targets: Vec<Target>, average_luminance: Option<f64>) -> Palette {
        let mut selected_swatches = HashMap::new();
        let mut used_colors = HashSet::new();
        let max_population = swatches.iter().map(|swatch| swatch.population()).max().unwrap_or(0);

        for target in &mut targets {
            target.normalize_weights();
            selected_swatches.insert(
                target.id(),
                generate_scored_target(&swatches, *target, max_population, &mut used_colors),
            );
        }

        Self {
            swatches,
            targets,
            selected_swatches,
            average_luminance,
        }
    }
}

impl ColorSource for Palette {
    fn sample_colors(&self, dominance: bool) -> Vec<Color> {
        let dominant = self.dominant_swatches();

        if dominance && !dominant.is_empty() {
            dominant.into_iter().map(|(_, swatch)| swatch.color()).collect()
        } else {
            self.colors()
        }
    }

    fn average_luminance(&self) -> Option<f64> {
        self.average_luminance
    }
}

impl<P> PaletteBuilder<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    pub fn from_image(image: ImageBuffer<P, Vec<u8>>) -> Self {
        Self {
            image,
            targets: Target::default_targets().to_vec(),
            maximum_color_count: DEFAULT_CALCULATE_NUMBER_COLORS,
            resize_area: DEFAULT_RESIZE_IMAGE_AREA,
            region: None,
            filters: vec![Box::new(DefaultFilter)],
        }
    }

    pub fn maximum_color_count(self, maximum_color_count: usize) -> Self {
        Self {
            maximum_color_count,
            ..self
        }
    }

    /// The image is scaled down to about this many pixels before sampling. 0 disables scaling.
    pub fn resize_image_area(self, resize_area: u32) -> Self {
        Self { resize_area, ..self }
    }

    pub fn region(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            region: Some(Rect { x, y, width, height }),
            ..self
        }
    }

    pub fn add_target(mut self, target: Target) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }

        self
    }

    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn clear_region(self) -> Self {
        Self { region: None, ..self }
    }

    pub fn clear_targets(self) -> Self {
        Self {
            targets: Vec::new(),
            ..self
        }
    }

    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    pub fn generate(mut self) -> Palette {
        let scale = self.scale_image_down();
        let (width, height) = self.image.dimensions();

        let region = self
            .region
            .map(|region| match scale {
                // scale the region down to match the scaled image
                Some(scale) => Rect {
                    x: (region.x as f32 * scale).floor() as u32,
                    y: (region.y as f32 * scale).floor() as u32,
                    width: (region.width as f32 * scale).ceil() as u32,
                    height: (region.height as f32 * scale).ceil() as u32,
                },
                None => region,
            })
            .unwrap_or(Rect {
                x: 0,
                y: 0,
                width,
                height,
            });
        let region = fit_region(region, width, height);

        let pixels = self
            .image
            .view(region.x, region.y, region.width, region.height)
            .pixels()
            .map(|(_, _, pixel)| {
                let rgb = pixel.to_rgb();
                (rgb.0[0], rgb.0[1], rgb.0[2])
            })
            .collect::<Vec<_>>();
        let average_luminance = average_luminance(&pixels);

        let quantizer = ColorCutQuantizer::new(pixels, self.maximum_color_count, &self.filters);
        let swatches = quantizer.get_quantized_colors();

        debug!(
            "quantized {}x{} pixels into {} swatches, average luminance {:?}",
            region.width,
            region.height,
            swatches.len(),
            average_luminance
        );

        Palette::generate(swatches, self.targets, average_luminance)
    }

    // returns the scale ratio if the image was scaled
    fn scale_image_down(&mut self) -> Option<f32> {
        let (width, height) = self.image.dimensions();
        let area = width * height;

        if self.resize_area == 0 || area <= self.resize_area {
            return None;
        }

        let scale_ratio = (self.resize_area as f32 / area as f32).sqrt();
        self.image = image::imageops::resize(
            &self.image,
            (width as f32 * scale_ratio).ceil() as u32,
            (height as f32 * scale_ratio).ceil() as u32,
            image::imageops::FilterType::Nearest,
        );

        Some(scale_ratio)
    }
}

fn fit_region(region: Rect, width: u32, height: u32) -> Rect {
    let x = region.x.min(width);
    let y = region.y.min(height);

    Rect {
        x,
        y,
        width: region.width.min(width - x),
        height: region.height.min(height - y),
    }
}

fn average_luminance(pixels: &[(u8, u8, u8)]) -> Option<f64> {
    if pixels.is_empty() {
        return None;
    }

    let sum: f64 = pixels
        .iter()
        .map(|&rgb| Color::from_rgb8(rgb).relative_luminance())
        .sum();

    Some((sum / pixels.len() as f64).clamp(0.0, 1.0))
}

fn generate_scored_target(
    swatches: &[Swatch],
    target: Target,
    max_population: u32,
    used_colors: &mut HashSet<(u8, u8, u8)>,
) -> Option<Swatch> {
    let max_scored_swatch = get_max_scored_swatch_for_target(swatches, target, max_population, used_colors)?;

    if target.is_exclusive() {
        used_colors.insert(max_scored_swatch.rgb());
    }

    Some(max_scored_swatch)
}

fn get_max_scored_swatch_for_target(
    swatches: &[Swatch],
    target: Target,
    max_population: u32,
    used_colors: &HashSet<(u8, u8, u8)>,
) -> Option<Swatch> {
    let mut max_score = 0.0;
    let mut max_score_swatch = None;

    for swatch in swatches.iter().copied() {
        if should_be_scored_for_target(swatch, target, used_colors) {
            let score = generate_score(swatch, target, max_population);

            if max_score_swatch.is_none() || score > max_score {
                max_score_swatch = Some(swatch);
                max_score = score;
            }
        }
    }

    max_score_swatch
}

fn should_be_scored_for_target(swatch: Swatch, target: Target, used_colors: &HashSet<(u8, u8, u8)>) -> bool {
    let hsl = swatch.hsl();

    (target.minimum_saturation()..=target.maximum_saturation()).contains(&hsl.saturation)
        && (target.minimum_lightness()..=target.maximum_lightness()).contains(&hsl.lightness)
        && !used_colors.contains(&swatch.rgb())
}

fn generate_score(swatch: Swatch, target: Target, max_population: u32) -> f64 {
    let hsl = swatch.hsl();

    let saturation_score = if target.saturation_weight() > 0.0 {
        target.saturation_weight() * (1.0 - (hsl.saturation - target.target_saturation()).abs())
    } else {
        0.0
    };

    let lightness_score = if target.lightness_weight() > 0.0 {
        target.lightness_weight() * (1.0 - (hsl.lightness - target.target_lightness()).abs())
    } else {
        0.0
    };

    let population_score = if target.population_weight() > 0.0 && max_population > 0 {
        target.population_weight() * (swatch.population() as f64 / max_population as f64)
    } else {
        0.0
    };

    saturation_score + lightness_score + population_score
}
