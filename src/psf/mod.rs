// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to derive an array's point-spread function from its uv sampling.
//!
//! The point-spread function is the inverse Fourier transform of the sampling
//! mask. Because only the u >= 0 half of the mask is stored, the transform is a
//! Hermitian-input ("complex-to-real") 2D inverse FFT: a complex inverse FFT
//! along v, followed by a complex-to-real inverse FFT along u. Transforms use
//! orthonormal scaling, i.e. both directions are scaled by 1/sqrt(N).


use std::fmt;

use ndarray::{prelude::*, Zip};
use num_complex::Complex64 as c64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::sampling::SamplingGrid;

/// Computes point-spread functions from [`SamplingGrid`]s. FFT plans are
/// cached, so re-use a solver when the image size doesn't change.
pub struct PsfSolver {
    planner: FftPlanner<f64>,
}

impl fmt::Debug for PsfSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PsfSolver").finish_non_exhaustive()
    }
}

impl Default for PsfSolver {
    fn default() -> Self {
        PsfSolver {
            planner: FftPlanner::new(),
        }
    }
}

impl PsfSolver {
    pub fn new() -> PsfSolver {
        PsfSolver::default()
    }

    /// Calculate the point-spread function of `sampling`. The result has
    /// shape `(width, height)` of the sampled image, and the origin is at
    /// index (0, 0) (see [`centred`] to move it to the middle).
    pub fn solve(&mut self, sampling: &SamplingGrid) -> Array2<f64> {
        let mut psf = Array2::zeros((sampling.width(), sampling.height()));
        self.solve_into(sampling, psf.view_mut());
        psf
    }

    /// The same as [`PsfSolver::solve`], but writes into pre-allocated
    /// memory. `psf` *must* have shape `(width, height)` of the sampled image.
    pub fn solve_into(&mut self, sampling: &SamplingGrid, mut psf: ArrayViewMut2<f64>) {
        let (width, height) = (sampling.width(), sampling.height());
        assert_eq!(
            psf.dim(),
            (width, height),
            "point-spread array shape doesn't match the sampled image"
        );
        assert_eq!(
            sampling.view().dim(),
            (width + 1, 2 * height + 1),
            "sampling grid shape doesn't match its image size"
        );

        let mut spectrum = half_spectrum(sampling);
        let (half_width, _) = spectrum.dim();
        let ifft_v = self.planner.plan_fft_inverse(height);
        let ifft_u = self.planner.plan_fft_inverse(width);
        let norm = 1.0 / ((width * height) as f64).sqrt();

        // v is the contiguous axis; transform each u row in place.
        spectrum
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut row| {
                let row = row
                    .as_slice_mut()
                    .expect("spectrum rows are contiguous");
                ifft_v.process(row);
            });

        // Now complex-to-real along u, one v column at a time.
        Zip::from(psf.columns_mut())
            .and(spectrum.columns())
            .par_for_each(|mut out, half| {
                let column = c2r(half, width, half_width, ifft_u.as_ref());
                out.iter_mut()
                    .zip(column.iter())
                    .for_each(|(o, c)| *o = c.re * norm);
            });
    }
}

/// Fold the sampling mask into the FFT-ordered half spectrum of a
/// `(width / 2 + 1, height)` image. Frequencies beyond the u Nyquist limit are
/// cropped; v wraps around.
fn half_spectrum(sampling: &SamplingGrid) -> Array2<c64> {
    let half_width = sampling.width() / 2 + 1;
    let height = sampling.height() as isize;
    let centre_row = sampling.centre_row() as isize;

    let mut spectrum = Array2::zeros((half_width, sampling.height()));
    for ((col, row), &cell) in sampling.view().indexed_iter() {
        if cell == 0.0 || col >= half_width {
            continue;
        }
        let kv = (row as isize - centre_row).rem_euclid(height) as usize;
        spectrum[(col, kv)] += c64::new(cell, 0.0);
    }
    spectrum
}

/// Inverse-transform one Hermitian half spectrum of length `half_width` into
/// `width` samples. Only the real parts of the result are meaningful; taking
/// them discards any imaginary parts of the zero and Nyquist frequencies.
fn c2r(half: ArrayView1<c64>, width: usize, half_width: usize, ifft: &dyn Fft<f64>) -> Vec<c64> {
    let mut buffer = vec![c64::default(); width];
    buffer[..half_width]
        .iter_mut()
        .zip(half.iter())
        .for_each(|(b, &h)| *b = h);
    for k in half_width..width {
        buffer[k] = buffer[width - k].conj();
    }
    ifft.process(&mut buffer);
    buffer
}

/// Shift the origin of a point-spread function from (0, 0) to
/// (width / 2, height / 2), so that the main lobe sits in the middle of an
/// image.
pub fn centred(psf: ArrayView2<f64>) -> Array2<f64> {
    let (width, height) = psf.dim();
    let (shift_x, shift_y) = (width / 2, height / 2);
    Array2::from_shape_fn((width, height), |(x, y)| {
        psf[((x + width - shift_x) % width, (y + height - shift_y) % height)]
    })
}
