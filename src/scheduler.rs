// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hand computed images to whoever owns the display.
//!
//! Images may be computed somewhere that isn't allowed to touch display
//! resources (e.g. inside a dependency-graph callback). Results are posted to
//! an [`UpdateScheduler`] instead, which holds at most one pending update per
//! image; posting a new update discards the stale one. The display owner
//! drains the scheduler when it is safe to do so.

use std::fmt;

use log::trace;
use parking_lot::Mutex;

use crate::pixels::PixelBuffer;

/// The images produced by a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    /// The uv-plane sampling mask.
    Sampling,

    /// The point-spread function.
    PointSpread,
}

impl ImageTarget {
    pub const ALL: [ImageTarget; 2] = [ImageTarget::Sampling, ImageTarget::PointSpread];

    /// The name of the image resource.
    pub fn name(self) -> &'static str {
        match self {
            ImageTarget::Sampling => "Sampling",
            ImageTarget::PointSpread => "PointSpread",
        }
    }

    fn index(self) -> usize {
        match self {
            ImageTarget::Sampling => 0,
            ImageTarget::PointSpread => 1,
        }
    }
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// New pixels for an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpdate {
    pub target: ImageTarget,
    pub pixels: PixelBuffer,
    /// Should the image's backing store be reallocated to the size of
    /// `pixels`?
    pub resize: bool,
}

impl ImageUpdate {
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }
}

/// Something that can write pixels into image resources. Only called from
/// [`UpdateScheduler::drain`] and [`UpdateScheduler::drain_all`].
pub trait ImageSink {
    fn apply(&mut self, update: ImageUpdate);
}

impl<F: FnMut(ImageUpdate)> ImageSink for F {
    fn apply(&mut self, update: ImageUpdate) {
        self(update)
    }
}

/// One single-slot mailbox per [`ImageTarget`].
///
/// Create one of these at startup and share it (e.g. in an [`std::sync::Arc`])
/// between the producer of images and the display owner.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    slots: [Mutex<Option<ImageUpdate>>; 2],
}

impl UpdateScheduler {
    pub fn new() -> UpdateScheduler {
        UpdateScheduler::default()
    }

    /// Install `update` as the pending update of its target, discarding any
    /// update that is still pending. Never waits on the consumer. Returns
    /// `true` if a stale update was discarded.
    pub fn enqueue(&self, update: ImageUpdate) -> bool {
        let target = update.target;
        let stale = self.slots[target.index()].lock().replace(update);
        trace!(
            "Enqueued {target} update{}",
            if stale.is_some() {
                " (discarded a pending one)"
            } else {
                ""
            }
        );
        stale.is_some()
    }

    /// Is an update waiting for `target`?
    pub fn is_pending(&self, target: ImageTarget) -> bool {
        self.slots[target.index()].lock().is_some()
    }

    /// If an update is pending for `target`, remove it and hand it to `sink`.
    /// Returns whether an update was applied.
    ///
    /// The slot is unlocked before `sink` runs, so `sink` may enqueue.
    pub fn drain<S: ImageSink + ?Sized>(&self, target: ImageTarget, sink: &mut S) -> bool {
        let update = self.slots[target.index()].lock().take();
        match update {
            Some(update) => {
                trace!(
                    "Applying {target} update ({}x{})",
                    update.width(),
                    update.height()
                );
                sink.apply(update);
                true
            }
            None => false,
        }
    }

    /// Drain every target. Returns whether any update was applied.
    pub fn drain_all<S: ImageSink + ?Sized>(&self, sink: &mut S) -> bool {
        ImageTarget::ALL
            .into_iter()
            .fold(false, |ran, target| self.drain(target, &mut *sink) || ran)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ndarray::Array2;

    use super::*;

    fn update(target: ImageTarget, value: f64) -> ImageUpdate {
        ImageUpdate {
            target,
            pixels: PixelBuffer::encode(
                Array2::from_elem((2, 2), value).view(),
                (0.0, 1.0).into(),
            ),
            resize: true,
        }
    }

    #[test]
    fn test_latest_update_wins() {
        let scheduler = UpdateScheduler::new();
        let a = update(ImageTarget::Sampling, 0.25);
        let b = update(ImageTarget::Sampling, 0.75);
        assert!(!scheduler.enqueue(a));
        assert!(scheduler.enqueue(b.clone()));

        let mut applied = vec![];
        assert!(scheduler.drain_all(&mut |u: ImageUpdate| applied.push(u)));
        assert_eq!(applied, vec![b]);

        // Nothing is left.
        applied.clear();
        assert!(!scheduler.drain_all(&mut |u: ImageUpdate| applied.push(u)));
        assert!(applied.is_empty());
    }

    #[test]
    fn test_targets_are_independent() {
        let scheduler = UpdateScheduler::new();
        scheduler.enqueue(update(ImageTarget::Sampling, 1.0));
        scheduler.enqueue(update(ImageTarget::PointSpread, 0.0));
        assert!(scheduler.is_pending(ImageTarget::Sampling));
        assert!(scheduler.is_pending(ImageTarget::PointSpread));

        let mut applied = vec![];
        assert!(scheduler.drain(ImageTarget::PointSpread, &mut |u: ImageUpdate| {
            applied.push(u.target)
        }));
        assert_eq!(applied, vec![ImageTarget::PointSpread]);
        assert!(scheduler.is_pending(ImageTarget::Sampling));
        assert!(!scheduler.is_pending(ImageTarget::PointSpread));

        assert!(scheduler.drain_all(&mut |u: ImageUpdate| applied.push(u.target)));
        assert_eq!(
            applied,
            vec![ImageTarget::PointSpread, ImageTarget::Sampling]
        );
    }

    #[test]
    fn test_drain_empty() {
        let scheduler = UpdateScheduler::new();
        let mut count = 0;
        assert!(!scheduler.drain(ImageTarget::Sampling, &mut |_: ImageUpdate| count += 1));
        assert!(!scheduler.drain_all(&mut |_: ImageUpdate| count += 1));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_sink_can_enqueue() {
        // A sink that posts a new update while being applied must not
        // deadlock, and the new update stays pending.
        let scheduler = UpdateScheduler::new();
        scheduler.enqueue(update(ImageTarget::Sampling, 0.5));
        let mut sink = |u: ImageUpdate| {
            scheduler.enqueue(update(u.target, 1.0));
        };
        assert!(scheduler.drain(ImageTarget::Sampling, &mut sink));
        assert!(scheduler.is_pending(ImageTarget::Sampling));
    }

    #[test]
    fn test_producer_and_consumer_threads() {
        let scheduler = Arc::new(UpdateScheduler::new());
        let producer = {
            let scheduler = Arc::clone(&scheduler);
            std::thread::spawn(move || {
                for i in 0..=100 {
                    scheduler.enqueue(update(ImageTarget::PointSpread, i as f64 / 100.0));
                }
            })
        };

        let mut last = None;
        while !producer.is_finished() {
            scheduler.drain_all(&mut |u: ImageUpdate| last = Some(u.pixels.pixel(0, 0)[0]));
        }
        producer.join().unwrap();
        scheduler.drain_all(&mut |u: ImageUpdate| last = Some(u.pixels.pixel(0, 0)[0]));

        // Whatever was skipped, the final update is always observed.
        assert_eq!(last, Some(1.0));
    }

    #[test]
    fn test_names() {
        assert_eq!(ImageTarget::Sampling.to_string(), "Sampling");
        assert_eq!(ImageTarget::PointSpread.name(), "PointSpread");
    }
}
