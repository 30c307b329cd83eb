// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Compute sampling and point-spread images from antenna positions, and post
//! them to an [`UpdateScheduler`].

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use ndarray::prelude::*;
use parking_lot::Mutex;

use crate::{
    baselines::Baselines,
    config::{ConfigError, DisplaySettings, InterferometryConfig},
    constants::IMAGE_SIZE_SOFT_MAX,
    pixels::PixelBuffer,
    psf::{centred, PsfSolver},
    sampling::SamplingGrid,
    scheduler::{ImageSink, ImageTarget, ImageUpdate, UpdateScheduler},
    types::AntennaHash,
    Antenna, SamplingError,
};

/// The results of a single computation, before being encoded for display.
#[derive(Debug, Clone)]
pub struct ComputedImages {
    pub baselines: Baselines,
    pub sampling: SamplingGrid,
    /// The point-spread function, with its origin at (0, 0).
    pub psf: Array2<f64>,
}

impl ComputedImages {
    /// The sampling image; the full uv plane, centred.
    pub fn sampling_pixels(&self, display: &DisplaySettings) -> PixelBuffer {
        PixelBuffer::encode(self.sampling.to_uv_image().view(), display.sampling_range)
    }

    /// The point-spread image.
    pub fn psf_pixels(&self, display: &DisplaySettings) -> PixelBuffer {
        if display.centre_psf {
            PixelBuffer::encode_with_gain(
                centred(self.psf.view()).view(),
                display.psf_gain,
                display.psf_range,
            )
        } else {
            PixelBuffer::encode_with_gain(self.psf.view(), display.psf_gain, display.psf_range)
        }
    }
}

/// Run the whole pipeline for `antennas` on a `width` x `height` image:
/// baselines, uv sampling, and the point-spread function.
pub fn compute_images(
    antennas: &[Antenna],
    width: usize,
    height: usize,
    solver: &mut PsfSolver,
) -> Result<ComputedImages, SamplingError> {
    if width < 1 || height < 1 {
        return Err(SamplingError::InvalidImageSize { width, height });
    }
    let baselines = Baselines::from_antennas(antennas)?;
    if width > IMAGE_SIZE_SOFT_MAX || height > IMAGE_SIZE_SOFT_MAX {
        warn!("Computing a large {width}x{height} image; this may be slow");
    }

    let sampling = SamplingGrid::from_baselines(&baselines, width, height);
    let psf = solver.solve(&sampling);
    Ok(ComputedImages {
        baselines,
        sampling,
        psf,
    })
}

/// Statistics of a successful computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputeSummary {
    pub num_antennas: usize,
    pub num_baselines: usize,
    /// The longest baseline \[metres\].
    pub max_baseline_m: f64,
    /// Baseline to uv pixel scale \[pixels/metre\].
    pub scale: f64,
    /// The number of distinct uv cells sampled.
    pub num_samples: usize,
    pub width: usize,
    pub height: usize,
}

/// Produces sampling and point-spread images for the display owner.
///
/// Results are never written to images directly; they are posted to the
/// shared [`UpdateScheduler`], and the display owner applies them with
/// [`Interferometer::drain_all`] (or by draining the scheduler itself).
#[derive(Debug)]
pub struct Interferometer {
    config: InterferometryConfig,
    scheduler: Arc<UpdateScheduler>,
    solver: Mutex<PsfSolver>,
    /// The inputs of the last successful computation.
    last_computed: Mutex<Option<AntennaHash>>,
}

impl Interferometer {
    /// Create a new [`Interferometer`] posting to `scheduler`. The settings
    /// are validated first.
    pub fn new(
        config: InterferometryConfig,
        scheduler: Arc<UpdateScheduler>,
    ) -> Result<Interferometer, ConfigError> {
        config.validate()?;
        Ok(Interferometer {
            config,
            scheduler,
            solver: Mutex::new(PsfSolver::new()),
            last_computed: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &InterferometryConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Arc<UpdateScheduler> {
        &self.scheduler
    }

    /// Compute images for `antennas` and post them to the scheduler. Returns
    /// whether images were posted. On failure nothing is posted, so whatever
    /// is displayed stays as it is.
    pub fn compute(&self, antennas: &[Antenna]) -> bool {
        match self.try_compute(antennas) {
            Ok(_) => true,
            Err(e) => {
                debug!("Not computing images: {e}");
                false
            }
        }
    }

    /// The same as [`Interferometer::compute`], but returns the reason for a
    /// failure or statistics of the computation.
    pub fn try_compute(&self, antennas: &[Antenna]) -> Result<ComputeSummary, SamplingError> {
        let (width, height) = (self.config.image_width, self.config.image_height);
        let images = {
            let mut solver = self.solver.lock();
            compute_images(antennas, width, height, &mut solver)?
        };

        let display = &self.config.display;
        self.scheduler.enqueue(ImageUpdate {
            target: ImageTarget::Sampling,
            pixels: images.sampling_pixels(display),
            resize: true,
        });
        self.scheduler.enqueue(ImageUpdate {
            target: ImageTarget::PointSpread,
            pixels: images.psf_pixels(display),
            resize: true,
        });
        *self.last_computed.lock() = Some(AntennaHash::new(antennas, width, height));

        let summary = ComputeSummary {
            num_antennas: antennas.len(),
            num_baselines: images.baselines.len(),
            max_baseline_m: images.baselines.max_length(),
            scale: images.sampling.scale(),
            num_samples: images.sampling.num_marked(),
            width,
            height,
        };
        debug!("Computed images: {summary:?}");
        Ok(summary)
    }

    /// Tell the interferometer that the antennas may have changed. If
    /// automatic updates are enabled and the antennas differ from the last
    /// computation, images are recomputed. Returns whether images were posted.
    pub fn antennas_changed(&self, antennas: &[Antenna]) -> bool {
        if !self.config.auto_update {
            return false;
        }
        let key = AntennaHash::new(antennas, self.config.image_width, self.config.image_height);
        if *self.last_computed.lock() == Some(key) {
            return false;
        }
        self.compute(antennas)
    }

    /// Install new settings. Returns whether the images are now out of date and
    /// should be recomputed. Invalid settings are rejected, and the old ones
    /// are kept.
    pub fn on_config_change(&mut self, config: InterferometryConfig) -> Result<bool, ConfigError> {
        config.validate()?;
        let stale = self.config.affects_images(&config);
        if stale {
            // Make sure the next change notification recomputes.
            *self.last_computed.lock() = None;
        }
        self.config = config;
        Ok(stale)
    }

    /// Apply all pending image updates with `sink`. This must be called from
    /// wherever image resources may be modified. Returns whether anything was
    /// applied.
    pub fn drain_all<S: ImageSink + ?Sized>(&self, sink: &mut S) -> bool {
        self.scheduler.drain_all(sink)
    }

    /// A timer callback for automatic updates. Pending updates are applied,
    /// and the delay until the next tick is returned. `None` is returned when
    /// automatic updates are disabled; the timer should stop.
    pub fn tick<S: ImageSink + ?Sized>(&self, sink: &mut S) -> Option<Duration> {
        self.drain_all(sink);
        if self.config.auto_update {
            Some(self.config.auto_update_interval())
        } else {
            None
        }
    }
}
