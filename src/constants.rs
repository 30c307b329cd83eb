// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// The number of pixels kept free at the edge of the uv grid when scaling
/// baselines.
pub const MARGIN_PIXELS: f64 = 3.0;

/// Maximum baseline lengths below this are treated as "all antennas coincide"
/// \[metres\].
pub const BMAX_EPSILON: f64 = 1.0e-6;

/// The default width and height of generated images \[pixels\].
pub const DEFAULT_IMAGE_SIZE: usize = 128;

/// Image sizes bigger than this are allowed, but they're slow to compute and
/// display \[pixels\].
pub const IMAGE_SIZE_SOFT_MAX: usize = 1024;

/// The default observing frequency; the 21cm hydrogen line \[Hz\].
pub const DEFAULT_FREQUENCY_HZ: f64 = 1.428e9;

/// The gain applied to the point-spread function before it's mapped into the
/// display range.
pub const DEFAULT_PSF_GAIN: f64 = 10.0;

/// The default (low, high) values mapped to black and white for the
/// point-spread function image.
pub const DEFAULT_PSF_RANGE: (f64, f64) = (0.0, 0.1);

/// The default (low, high) values mapped to black and white for the sampling
/// image.
pub const DEFAULT_SAMPLING_RANGE: (f64, f64) = (0.0, 1.0);

/// The default interval between automatic image updates \[seconds\].
pub const DEFAULT_AUTO_UPDATE_INTERVAL: f64 = 1.0;

/// Days since the J2000 epoch used when no time is given.
pub const DEFAULT_DAY: i64 = 7305;

/// Ratio of a solar day to a sidereal day.
pub const SOLAR_TO_SIDEREAL: f64 = 366.24 / 365.24;
