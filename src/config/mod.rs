// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observatory and interferometry settings.
//!
//! These are plain values; the application owns them, and after changing them
//! it tells an [`crate::Interferometer`] via
//! [`crate::Interferometer::on_config_change`]. All fields have defaults, so
//! a settings file only needs to mention what it changes, e.g.
//!
//! ```toml
//! [interferometry]
//! image_width = 256
//! image_height = 256
//! auto_update = true
//!
//! [interferometry.display]
//! psf_gain = 20.0
//! ```

mod error;

pub use error::ConfigError;

use std::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    path::Path,
    time::Duration,
};

use log::warn;
use marlu::constants::VEL_C;
use serde::{Deserialize, Serialize};

use crate::{constants::*, pixels::DisplayRange};

/// A pair of angles east and north \[radians\].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CelestialCoordinate {
    pub longitude_rad: f64,
    pub latitude_rad: f64,
}

impl CelestialCoordinate {
    pub fn new(longitude_rad: f64, latitude_rad: f64) -> CelestialCoordinate {
        CelestialCoordinate {
            longitude_rad,
            latitude_rad,
        }
    }

    /// The longitude as an hour angle \[hours\].
    pub fn hour(&self) -> f64 {
        self.longitude_rad * 12.0 / PI
    }

    pub fn set_hour(&mut self, hour: f64) {
        self.longitude_rad = hour * PI / 12.0;
    }
}

/// A time of observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservationTime {
    /// Days since the J2000 epoch.
    pub day: i64,
    /// Hour of the day, 0 to 24.
    pub hour: f64,
}

impl Default for ObservationTime {
    fn default() -> Self {
        ObservationTime {
            day: DEFAULT_DAY,
            hour: 12.0,
        }
    }
}

impl ObservationTime {
    /// The rotation of the Earth relative to the fixed stars since the epoch,
    /// in [0, 2π) \[radians\].
    pub fn earth_rotation(&self) -> f64 {
        let sidereal_days = (self.day as f64 + self.hour / 24.0) * SOLAR_TO_SIDEREAL;
        sidereal_days.rem_euclid(1.0) * TAU
    }
}

/// What is rendered behind the sky grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyBackground {
    #[default]
    None,

    /// Stars in the visible spectrum.
    Visible,
}

/// Display settings for one celestial coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    pub enabled: bool,
    /// Linear RGB.
    pub color: [f32; 3],
}

impl GridSettings {
    pub const fn new(enabled: bool, color: [f32; 3]) -> GridSettings {
        GridSettings { enabled, color }
    }
}

/// Where and when the array observes, and how the sky is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservatoryConfig {
    pub location: CelestialCoordinate,
    pub time: ObservationTime,
    pub sky_background: SkyBackground,
    pub horizontal_grid: GridSettings,
    pub equatorial_grid: GridSettings,
    pub ecliptic_grid: GridSettings,
    pub galactic_grid: GridSettings,
}

impl Default for ObservatoryConfig {
    fn default() -> Self {
        ObservatoryConfig {
            location: CelestialCoordinate::default(),
            time: ObservationTime::default(),
            sky_background: SkyBackground::None,
            horizontal_grid: GridSettings::new(false, [0.309342, 0.186442, 0.012358]),
            equatorial_grid: GridSettings::new(true, [0.009179, 0.459465, 0.8]),
            ecliptic_grid: GridSettings::new(false, [0.004964, 0.137349, 0.002201]),
            galactic_grid: GridSettings::new(false, [0.233609, 0.010037, 0.228179]),
        }
    }
}

impl ObservatoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=24.0).contains(&self.time.hour) {
            return Err(ConfigError::InvalidHour(self.time.hour));
        }
        Ok(())
    }

    /// All four grids with their names, in drawing order.
    pub fn grids(&self) -> [(&'static str, &GridSettings); 4] {
        [
            ("Horizontal Grid", &self.horizontal_grid),
            ("Equatorial Grid", &self.equatorial_grid),
            ("Ecliptic Grid", &self.ecliptic_grid),
            ("Galactic Grid", &self.galactic_grid),
        ]
    }
}

/// How computed arrays are mapped to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Values mapped to black and white in the sampling image.
    pub sampling_range: DisplayRange,
    /// The point-spread function is multiplied by this before being mapped.
    pub psf_gain: f64,
    /// Values mapped to black and white in the point-spread image.
    pub psf_range: DisplayRange,
    /// Draw the point-spread function with its origin in the middle of the
    /// image rather than at a corner.
    pub centre_psf: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            sampling_range: DEFAULT_SAMPLING_RANGE.into(),
            psf_gain: DEFAULT_PSF_GAIN,
            psf_range: DEFAULT_PSF_RANGE.into(),
            centre_psf: true,
        }
    }
}

impl DisplaySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (image, range) in [("sampling", self.sampling_range), ("point-spread", self.psf_range)] {
            if !range.is_valid() {
                return Err(ConfigError::InvalidDisplayRange {
                    image,
                    low: range.low,
                    high: range.high,
                });
            }
        }
        if !self.psf_gain.is_finite() {
            return Err(ConfigError::InvalidGain(self.psf_gain));
        }
        Ok(())
    }
}

/// What the array observes and how images are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterferometryConfig {
    /// The direction observed.
    pub target: CelestialCoordinate,
    /// The frequency measured by the antennas \[Hz\].
    pub frequency_hz: f64,
    /// Width of the sampling and point-spread images \[pixels\].
    pub image_width: usize,
    /// Height of the sampling and point-spread images \[pixels\].
    pub image_height: usize,
    pub display: DisplaySettings,
    /// Recompute images automatically when the antennas change.
    pub auto_update: bool,
    /// How often automatic updates are applied \[seconds\].
    pub auto_update_interval_s: f64,
}

impl Default for InterferometryConfig {
    fn default() -> Self {
        InterferometryConfig {
            target: CelestialCoordinate::new(0.0, FRAC_PI_2),
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            image_width: DEFAULT_IMAGE_SIZE,
            image_height: DEFAULT_IMAGE_SIZE,
            display: DisplaySettings::default(),
            auto_update: false,
            auto_update_interval_s: DEFAULT_AUTO_UPDATE_INTERVAL,
        }
    }
}

impl InterferometryConfig {
    pub fn frequency_mhz(&self) -> f64 {
        self.frequency_hz * 1e-6
    }

    pub fn set_frequency_mhz(&mut self, frequency_mhz: f64) {
        self.frequency_hz = frequency_mhz * 1e6;
    }

    /// The observed wavelength \[metres\].
    pub fn wavelength_m(&self) -> f64 {
        VEL_C / self.frequency_hz
    }

    pub fn set_wavelength_m(&mut self, wavelength_m: f64) {
        self.frequency_hz = VEL_C / wavelength_m;
    }

    pub fn auto_update_interval(&self) -> Duration {
        Duration::from_secs_f64(self.auto_update_interval_s.max(0.0))
    }

    /// Would switching from these settings to `new` change the images?
    pub fn affects_images(&self, new: &InterferometryConfig) -> bool {
        self.image_width != new.image_width
            || self.image_height != new.image_height
            || self.display != new.display
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width < 1 || self.image_height < 1 {
            return Err(ConfigError::InvalidImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.image_width > IMAGE_SIZE_SOFT_MAX || self.image_height > IMAGE_SIZE_SOFT_MAX {
            warn!(
                "Image size {}x{} is bigger than {IMAGE_SIZE_SOFT_MAX}x{IMAGE_SIZE_SOFT_MAX}; computing images will be slow",
                self.image_width, self.image_height
            );
        }
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ConfigError::InvalidFrequency(self.frequency_hz));
        }
        if !(self.auto_update_interval_s.is_finite() && self.auto_update_interval_s >= 0.0) {
            return Err(ConfigError::InvalidInterval(self.auto_update_interval_s));
        }
        self.display.validate()
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub observatory: ObservatoryConfig,
    pub interferometry: InterferometryConfig,
}

impl Settings {
    /// Parse and validate settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a TOML file.
    pub fn from_file<T: AsRef<Path>>(file: T) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(file)?;
        Settings::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.observatory.validate()?;
        self.interferometry.validate()
    }
}
