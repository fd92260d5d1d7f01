use crate::{color::Color, filter::Filter, swatch::Swatch};
use std::collections::{BinaryHeap, HashMap};

const QUANTIZE_WORD_WIDTH: u32 = 5;
const QUANTIZE_WORD_MAX: u8 = (1 << QUANTIZE_WORD_WIDTH) - 1;

type Rgb = (u8, u8, u8);

/// Median cut quantization over a histogram of 15-bit colors.
pub(crate) struct ColorCutQuantizer<'f> {
    pixels: Vec<Rgb>,
    max_colors: usize,
    filters: &'f [Box<dyn Filter>],
}

// a box in the quantized color space, tightly fitted around the colors it holds
struct Vbox<'a> {
    colors: &'a mut [(Rgb, u32)],
    population: u32,
    red_range: (u8, u8),
    green_range: (u8, u8),
    blue_range: (u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Red,
    Green,
    Blue,
}

impl<'f> ColorCutQuantizer<'f> {
    pub fn new(pixels: Vec<Rgb>, max_colors: usize, filters: &'f [Box<dyn Filter>]) -> Self {
        Self {
            pixels,
            max_colors,
            filters,
        }
    }

    pub fn get_quantized_colors(&self) -> Vec<Swatch> {
        let mut hist = HashMap::new();
        for &rgb in &self.pixels {
            *hist.entry(quantize(rgb)).or_insert(0u32) += 1;
        }

        let hist_len = hist.len();
        let mut colors = hist
            .into_iter()
            .filter(|&(rgb, _)| !self.should_ignore_color(widen(rgb)))
            .collect::<Vec<_>>();

        // the histogram has no order, so sort the colors by their packed value with red the most significant
        colors.sort_by_key(|&(rgb, _)| pack(rgb));

        if hist_len <= self.max_colors {
            // few enough colors that each one gets a swatch of its own
            colors
                .into_iter()
                .map(|(rgb, count)| Swatch::new(widen(rgb), count))
                .collect()
        } else {
            self.quantize_pixels(&mut colors)
        }
    }

    fn quantize_pixels(&self, colors: &mut [(Rgb, u32)]) -> Vec<Swatch> {
        if colors.is_empty() {
            return Vec::new();
        }

        // the queue pops the box with the largest volume first
        let mut pq = BinaryHeap::with_capacity(self.max_colors);
        pq.push(Vbox::new(colors));

        self.split_boxes(&mut pq);

        pq.iter()
            .map(Vbox::average_color)
            .filter(|swatch| !self.should_ignore_color(swatch.rgb()))
            .collect()
    }

    fn should_ignore_color(&self, rgb: Rgb) -> bool {
        let color = Color::from_rgb8(rgb);
        let hsl = color.to_hsl();

        self.filters.iter().any(|filter| !filter.is_allowed(color, hsl))
    }

    fn split_boxes(&self, pq: &mut BinaryHeap<Vbox<'_>>) {
        while pq.len() < self.max_colors {
            match pq.pop() {
                Some(vbox) if vbox.can_split() => {
                    let (left, right) = vbox.split();
                    pq.push(left);
                    pq.push(right);
                }
                Some(vbox) => {
                    // the largest box is a single color, so nothing else can be split either
                    pq.push(vbox);
                    return;
                }
                None => return,
            }
        }
    }
}

impl<'a> Vbox<'a> {
    fn new(colors: &'a mut [(Rgb, u32)]) -> Self {
        let mut population = 0;
        let mut red_range = (QUANTIZE_WORD_MAX, 0);
        let mut green_range = (QUANTIZE_WORD_MAX, 0);
        let mut blue_range = (QUANTIZE_WORD_MAX, 0);

        for &((r, g, b), count) in colors.iter() {
            population += count;
            extend(&mut red_range, r);
            extend(&mut green_range, g);
            extend(&mut blue_range, b);
        }

        Self {
            colors,
            population,
            red_range,
            green_range,
            blue_range,
        }
    }

    fn volume(&self) -> u32 {
        span(self.red_range) * span(self.green_range) * span(self.blue_range)
    }

    fn can_split(&self) -> bool {
        self.colors.len() > 1
    }

    // splits at the population median along the longest dimension
    fn split(self) -> (Vbox<'a>, Vbox<'a>) {
        let component = self.longest_dimension();
        let population = self.population;
        let colors = self.colors;

        colors.sort_by_key(|&(rgb, _)| channel(rgb, component));

        let split_point = find_split_point(colors, population);
        let (left, right) = colors.split_at_mut(split_point);

        (Vbox::new(left), Vbox::new(right))
    }

    fn longest_dimension(&self) -> Component {
        let red_length = self.red_range.1 - self.red_range.0;
        let green_length = self.green_range.1 - self.green_range.0;
        let blue_length = self.blue_range.1 - self.blue_range.0;

        if red_length >= green_length && red_length >= blue_length {
            Component::Red
        } else if green_length >= blue_length {
            Component::Green
        } else {
            Component::Blue
        }
    }

    // population-weighted mean of the box's colors, widened back to 8 bits
    fn average_color(&self) -> Swatch {
        let (pop, red_sum, green_sum, blue_sum) =
            self.colors
                .iter()
                .fold((0u32, 0u32, 0u32, 0u32), |(pop, r_sum, g_sum, b_sum), &((r, g, b), count)| {
                    (
                        pop + count,
                        r_sum + r as u32 * count,
                        g_sum + g as u32 * count,
                        b_sum + b as u32 * count,
                    )
                });

        let mean = |sum: u32| (sum as f32 / pop as f32).round() as u8;

        Swatch::new(widen((mean(red_sum), mean(green_sum), mean(blue_sum))), pop)
    }
}

impl Eq for Vbox<'_> {}
impl PartialEq for Vbox<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.volume() == other.volume()
    }
}

impl Ord for Vbox<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.volume().cmp(&other.volume())
    }
}

impl PartialOrd for Vbox<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// the first color whose cumulative population reaches half of the box, never the very first color so that both halves
// are non-empty
fn find_split_point(colors: &[(Rgb, u32)], population: u32) -> usize {
    let midpoint = population / 2;
    let mut pop = 0;

    for (i, &(_, count)) in colors.iter().enumerate() {
        pop += count;

        if pop >= midpoint {
            return i.max(1);
        }
    }

    1
}

fn extend(range: &mut (u8, u8), value: u8) {
    range.0 = range.0.min(value);
    range.1 = range.1.max(value);
}

fn span((min, max): (u8, u8)) -> u32 {
    (max - min + 1) as u32
}

fn channel((r, g, b): Rgb, component: Component) -> u8 {
    match component {
        Component::Red => r,
        Component::Green => g,
        Component::Blue => b,
    }
}

fn pack((r, g, b): Rgb) -> u32 {
    ((r as u32) << (2 * QUANTIZE_WORD_WIDTH)) | ((g as u32) << QUANTIZE_WORD_WIDTH) | b as u32
}

fn quantize((r, g, b): Rgb) -> Rgb {
    let shift = 8 - QUANTIZE_WORD_WIDTH;
    (r >> shift, g >> shift, b >> shift)
}

fn widen((r, g, b): Rgb) -> Rgb {
    let shift = 8 - QUANTIZE_WORD_WIDTH;
    (r << shift, g << shift, b << shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer(pixels: Vec<Rgb>, max_colors: usize, filters: &[Box<dyn Filter>]) -> Vec<Swatch> {
        ColorCutQuantizer::new(pixels, max_colors, filters).get_quantized_colors()
    }

    #[test]
    fn few_colors_each_get_a_swatch() {
        let mut pixels = vec![(200, 40, 40); 30];
        pixels.extend(vec![(40, 40, 200); 10]);

        let swatches = quantizer(pixels, 16, &[]);

        assert_eq!(swatches.len(), 2);
        // sorted by packed value, red first
        assert_eq!(swatches[0].rgb(), (40, 40, 200));
        assert_eq!(swatches[0].population(), 10);
        assert_eq!(swatches[1].rgb(), (200, 40, 40));
        assert_eq!(swatches[1].population(), 30);
    }

    #[test]
    fn many_colors_are_cut_down() {
        let pixels = (0..=255u8).step_by(8).map(|v| (v, 255 - v, 128)).collect::<Vec<_>>();
        let swatches = quantizer(pixels, 4, &[]);

        assert_eq!(swatches.len(), 4);
        assert_eq!(swatches.iter().map(|swatch| swatch.population()).sum::<u32>(), 32);
    }

    #[test]
    fn filtered_colors_are_dropped() {
        let mut pixels = vec![(0, 0, 0); 50];
        pixels.extend(vec![(40, 90, 200); 5]);
        let filters: Vec<Box<dyn Filter>> = vec![Box::new(crate::filter::DefaultFilter)];

        let swatches = quantizer(pixels, 16, &filters);

        assert_eq!(swatches.len(), 1);
        assert_eq!(swatches[0].population(), 5);
    }

    #[test]
    fn split_point_is_never_zero() {
        let colors = [((0, 0, 0), 100), ((1, 1, 1), 1)];
        assert_eq!(find_split_point(&colors, 101), 1);
    }
}
