// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convert 2D arrays into displayable RGBA pixels.

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// The values of an array that are displayed as black (`low`) and white
/// (`high`). Values outside of the range saturate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub low: f64,
    pub high: f64,
}

impl DisplayRange {
    pub fn new(low: f64, high: f64) -> DisplayRange {
        DisplayRange { low, high }
    }

    /// Is the range usable for normalisation? `low` and `high` must be finite
    /// and distinct. `high < low` inverts the image.
    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low != self.high
    }

    /// Map a value to the unit interval.
    ///
    /// The normalised value is clipped to [0, 1], not to [low, high]; clipping
    /// to the input range after normalising would make any range other than
    /// (0, 1) too dark or too bright.
    pub fn normalise(&self, value: f64) -> f64 {
        ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
    }
}

impl From<(f64, f64)> for DisplayRange {
    fn from((low, high): (f64, f64)) -> Self {
        DisplayRange { low, high }
    }
}

/// Greyscale RGBA pixels for a `width` x `height` image, 4 floats per pixel.
///
/// Pixels are stored in the iteration order of the source array, i.e. the
/// pixel for array element (x, y) starts at `4 * (x * height + y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl PixelBuffer {
    /// Encode `array` with the given display range. Each element `x` becomes
    /// `(v, v, v, 1.0)`, where `v` is `x` normalised by `range`.
    pub fn encode(array: ArrayView2<f64>, range: DisplayRange) -> PixelBuffer {
        PixelBuffer::encode_with_gain(array, 1.0, range)
    }

    /// The same as [`PixelBuffer::encode`], but multiplies elements by `gain`
    /// before normalising them.
    pub fn encode_with_gain(array: ArrayView2<f64>, gain: f64, range: DisplayRange) -> PixelBuffer {
        assert!(range.is_valid(), "invalid display range {range:?}");
        let (width, height) = array.dim();
        let mut pixels = Vec::with_capacity(4 * width * height);
        for &x in array.iter() {
            let v = range.normalise(x * gain) as f32;
            pixels.extend_from_slice(&[v, v, v, 1.0]);
        }

        PixelBuffer {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The RGBA values of the pixel for array element (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        let i = 4 * (x * self.height + y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.pixels
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }
}
