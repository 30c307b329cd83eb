// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with settings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Couldn't serialise settings: {0}")]
    Serialise(#[from] toml::ser::Error),

    #[error("Image dimensions must be at least 1x1, but got {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },

    #[error("The observing frequency must be positive and finite, but got {0} Hz")]
    InvalidFrequency(f64),

    #[error("The {image} display range ({low}, {high}) must have distinct, finite ends")]
    InvalidDisplayRange {
        image: &'static str,
        low: f64,
        high: f64,
    },

    #[error("The point-spread function gain must be finite, but got {0}")]
    InvalidGain(f64),

    #[error("The auto-update interval must be non-negative, but got {0} s")]
    InvalidInterval(f64),

    #[error("The hour of the day must be between 0 and 24, but got {0}")]
    InvalidHour(f64),
}
