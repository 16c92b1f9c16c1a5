//! Height-map sources for terrain construction.
//!
//! A height map is a `W x H` grid of already-scaled height samples. It can
//! come from a grayscale image (the classic authored-terrain path) or be
//! generated procedurally from Perlin noise when no image is configured.

use std::path::Path;

use noise::{NoiseFn, Perlin};

/// Scaling factor applied to sample coordinates when sampling Perlin noise.
const PERLIN_SCALE_FACTOR: f64 = 0.05;

/// A grid of terrain height samples.
#[derive(Debug, Clone)]
pub struct Heightmap {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl Heightmap {
    /// Builds a height map from raw samples.
    ///
    /// # Panics
    /// Asserts that `samples` has exactly `width * height` entries.
    pub fn from_samples(width: usize, height: usize, samples: Vec<f32>) -> Self {
        assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            samples,
        }
    }

    /// Loads a grayscale image as a height map.
    ///
    /// Each 0..=255 luma value is multiplied by `height_scale` to produce the
    /// height in world units.
    ///
    /// # Arguments
    /// * `path` - Path to a PNG or BMP image
    /// * `height_scale` - Multiplier applied to raw luma values
    pub fn from_image<P: AsRef<Path>>(
        path: P,
        height_scale: f32,
    ) -> Result<Self, image::ImageError> {
        let luma = image::open(path)?.to_luma8();
        let (width, height) = luma.dimensions();
        let samples = luma
            .pixels()
            .map(|p| p.0[0] as f32 * height_scale)
            .collect();
        Ok(Self::from_samples(width as usize, height as usize, samples))
    }

    /// Generates a height map from Perlin noise.
    ///
    /// Noise output is remapped to the same 0..=255 raw range an image would
    /// produce before `height_scale` is applied, so the two sources are
    /// interchangeable.
    ///
    /// # Arguments
    /// * `width` - Samples along x
    /// * `height` - Samples along z
    /// * `seed` - Noise seed; the same seed always yields the same terrain
    /// * `height_scale` - Multiplier applied to raw values
    pub fn from_noise(width: usize, height: usize, seed: u32, height_scale: f32) -> Self {
        let perlin = Perlin::new(seed);
        let mut samples = Vec::with_capacity(width * height);
        for i in 0..height {
            for j in 0..width {
                let n = perlin.get([
                    j as f64 * PERLIN_SCALE_FACTOR,
                    i as f64 * PERLIN_SCALE_FACTOR,
                ]);
                let raw = ((n + 1.0) * 0.5 * 255.0) as f32;
                samples.push(raw * height_scale);
            }
        }
        Self::from_samples(width, height, samples)
    }

    /// Samples along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Samples along z.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The height at grid cell `(column, row)`.
    pub fn get(&self, column: usize, row: usize) -> f32 {
        self.samples[row * self.width + column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_map_has_requested_dimensions() {
        let map = Heightmap::from_noise(17, 9, 0, 1.0);
        assert_eq!(map.width(), 17);
        assert_eq!(map.height(), 9);
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let a = Heightmap::from_noise(8, 8, 42, 1.0);
        let b = Heightmap::from_noise(8, 8, 42, 1.0);
        for row in 0..8 {
            for col in 0..8 {
                assert_eq!(a.get(col, row), b.get(col, row));
            }
        }
    }

    #[test]
    fn heights_stay_in_the_scaled_byte_range() {
        let scale = 5.0 / 12.0;
        let map = Heightmap::from_noise(32, 32, 7, scale);
        for row in 0..32 {
            for col in 0..32 {
                let h = map.get(col, row);
                assert!(h >= 0.0 && h <= 255.0 * scale);
            }
        }
    }

    #[test]
    #[should_panic]
    fn sample_count_mismatch_is_a_defect() {
        Heightmap::from_samples(4, 4, vec![0.0; 15]);
    }
}
