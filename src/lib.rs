// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Simulate the uv-plane sampling and point-spread function of a
radio-interferometer antenna array.

Every pair of antennas forms a baseline, and every baseline samples one point
of the uv plane (and its conjugate). The inverse Fourier transform of the
sampling is the array's point-spread function. An [`Interferometer`] computes
both as displayable images, and posts them to an [`UpdateScheduler`] for the
owner of the display to apply.
 */

pub mod baselines;
pub mod config;
pub mod constants;
pub mod errors;
pub mod interferometer;
pub mod pixels;
pub mod psf;
pub mod sampling;
pub mod scheduler;
pub(crate) mod types;

pub use baselines::{Baseline, Baselines};
pub use config::{ConfigError, InterferometryConfig, ObservatoryConfig, Settings};
pub use errors::SamplingError;
pub use interferometer::{compute_images, ComputeSummary, ComputedImages, Interferometer};
pub use pixels::{DisplayRange, PixelBuffer};
pub use psf::PsfSolver;
pub use sampling::SamplingGrid;
pub use scheduler::{ImageSink, ImageTarget, ImageUpdate, UpdateScheduler};
pub use types::Antenna;

// Re-exports.
pub use ndarray;
