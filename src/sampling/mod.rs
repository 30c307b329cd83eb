// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to rasterise baselines onto a discrete uv plane.
//!
//! The point-spread function is real, so its Fourier transform is Hermitian;
//! a sample at (u, v) implies the conjugate sample at (-u, -v). Only the
//! half-plane u >= 0 is stored. A baseline pointing into u < 0 is folded onto
//! its conjugate instead.


use log::{debug, warn};
use ndarray::prelude::*;

use crate::{
    baselines::{Baseline, Baselines},
    constants::{BMAX_EPSILON, MARGIN_PIXELS},
};

/// The scale from metres to uv pixels that fits the longest baseline into an
/// image, leaving [`MARGIN_PIXELS`] free at the edge.
///
/// If all antennas coincide, there is nothing to fit, and the scale is 1.
pub fn baseline_scale(max_length: f64, width: usize, height: usize) -> f64 {
    if max_length < BMAX_EPSILON {
        return 1.0;
    }
    (0.5 * width.min(height) as f64 - MARGIN_PIXELS) / max_length
}

/// The row of a [`SamplingGrid`] holding v = 0.
pub(crate) fn centre_row(height: usize) -> usize {
    (0.5 * height as f64).round() as usize
}

/// A uv-plane sampling mask. The grid has `width + 1` columns (u >= 0) and
/// `2 * height + 1` rows; every cell is either 0.0 (not sampled) or 1.0
/// (sampled by at least one baseline).
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingGrid {
    grid: Array2<f64>,
    width: usize,
    height: usize,
    scale: f64,
    num_clamped: usize,
}

impl SamplingGrid {
    /// An empty grid for an image of the given size.
    pub fn new(width: usize, height: usize) -> SamplingGrid {
        assert!(
            width > 0 && height > 0,
            "sampling grid dimensions must be non-zero, got {width}x{height}"
        );
        SamplingGrid {
            grid: Array2::zeros((width + 1, 2 * height + 1)),
            width,
            height,
            scale: 1.0,
            num_clamped: 0,
        }
    }

    /// Rasterise `baselines` for an image of `width` x `height` pixels.
    ///
    /// Cells that fall outside of the grid (only possible for images smaller
    /// than the margin) are clamped to the grid edge.
    pub fn from_baselines(baselines: &Baselines, width: usize, height: usize) -> SamplingGrid {
        let mut sampling = SamplingGrid::new(width, height);
        sampling.scale = baseline_scale(baselines.max_length(), width, height);
        if baselines.is_degenerate() {
            debug!("All antennas coincide; using a baseline scale of 1");
        }

        for &baseline in baselines {
            sampling.mark(baseline * sampling.scale);
        }

        debug!(
            "Rasterised {} baselines (Bmax {:.3} m, scale {:.4} px/m) into {} cells",
            baselines.len(),
            baselines.max_length(),
            sampling.scale,
            sampling.num_marked()
        );
        if sampling.num_clamped > 0 {
            warn!(
                "{} baseline samples fell outside of the {}x{} uv grid; the image is too small for the array",
                sampling.num_clamped, width, height
            );
        }
        sampling
    }

    /// Mark the cell hit by a baseline that is already scaled to pixels,
    /// folding it onto u >= 0 if necessary.
    fn mark(&mut self, s: Baseline) {
        let half_height = 0.5 * self.height as f64;
        let (col, row) = if s.u >= 0.0 {
            (s.u.round(), (half_height + s.v).round())
        } else {
            ((-s.u).round(), (half_height - s.v).round())
        };

        let (num_cols, num_rows) = self.grid.dim();
        let max_col = (num_cols - 1) as f64;
        let max_row = (num_rows - 1) as f64;
        if col > max_col || row < 0.0 || row > max_row {
            self.num_clamped += 1;
        }
        // `col` can't be negative, but it may be -0.0.
        let col = col.clamp(0.0, max_col) as usize;
        let row = row.clamp(0.0, max_row) as usize;
        self.grid[(col, row)] = 1.0;
    }

    /// The width of the image this grid samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the image this grid samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The scale used to convert baselines to uv pixels \[pixels/metre\].
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The number of baseline samples that had to be clamped onto the grid.
    pub fn num_clamped(&self) -> usize {
        self.num_clamped
    }

    /// The number of sampled cells.
    pub fn num_marked(&self) -> usize {
        self.grid.iter().filter(|&&c| c != 0.0).count()
    }

    pub fn is_marked(&self, col: usize, row: usize) -> bool {
        self.grid.get((col, row)).is_some_and(|&c| c != 0.0)
    }

    /// The row holding v = 0.
    pub fn centre_row(&self) -> usize {
        centre_row(self.height)
    }

    /// The raw mask, with shape `(width + 1, 2 * height + 1)`.
    pub fn view(&self) -> ArrayView2<f64> {
        self.grid.view()
    }

    /// Unfold the half-plane into the full, symmetric uv plane, centred in a
    /// `width` x `height` image. Each stored sample appears twice; once as-is
    /// and once mirrored through the centre.
    pub fn to_uv_image(&self) -> Array2<f64> {
        let mut image = Array2::zeros((self.width, self.height));
        let centre_x = (self.width / 2) as isize;
        let centre_y = (self.height / 2) as isize;
        let centre_row = self.centre_row() as isize;

        let mut plot = |x: isize, y: isize| {
            if x >= 0 && y >= 0 {
                if let Some(pixel) = image.get_mut((x as usize, y as usize)) {
                    *pixel = 1.0;
                }
            }
        };
        for ((col, row), &cell) in self.grid.indexed_iter() {
            if cell == 0.0 {
                continue;
            }
            let ku = col as isize;
            let kv = row as isize - centre_row;
            plot(centre_x + ku, centre_y + kv);
            plot(centre_x - ku, centre_y - kv);
        }
        image
    }
}
