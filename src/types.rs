// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// An antenna's position on the ground \[metres\]. Only the east (`x`) and
/// north (`y`) components matter for sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Antenna {
    pub x: f64,
    pub y: f64,
}

impl Antenna {
    pub fn new(x: f64, y: f64) -> Antenna {
        Antenna { x, y }
    }
}

impl From<(f64, f64)> for Antenna {
    fn from((x, y): (f64, f64)) -> Self {
        Antenna { x, y }
    }
}

impl From<[f64; 2]> for Antenna {
    fn from([x, y]: [f64; 2]) -> Self {
        Antenna { x, y }
    }
}

/// A key identifying a set of inputs to a computation. If the antenna
/// positions and image size are re-used, the same key is generated, so an
/// unchanged configuration can be detected without keeping the inputs around.
#[derive(Hash, Debug, Clone, Copy, Eq, PartialEq, Default)]
pub(crate) struct AntennaHash(u64);

impl AntennaHash {
    pub(crate) fn new(antennas: &[Antenna], width: usize, height: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        width.hash(&mut hasher);
        height.hash(&mut hasher);
        antennas.len().hash(&mut hasher);
        // We can't hash f64 values, but we can hash their bits.
        for a in antennas {
            a.x.to_bits().hash(&mut hasher);
            a.y.to_bits().hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Antenna> {
        vec![
            Antenna::new(0.0, 0.0),
            Antenna::new(10.0, 0.0),
            Antenna::new(0.0, 10.0),
        ]
    }

    #[test]
    fn same() {
        let hash1 = AntennaHash::new(&triangle(), 128, 128);
        let hash2 = AntennaHash::new(&triangle(), 128, 128);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn different_position() {
        let hash1 = AntennaHash::new(&triangle(), 128, 128);
        let mut moved = triangle();
        moved[2].y += 1e-9;
        let hash2 = AntennaHash::new(&moved, 128, 128);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn different_order() {
        // Antenna order determines the sign of each baseline before folding,
        // so a reordering counts as a change.
        let hash1 = AntennaHash::new(&triangle(), 128, 128);
        let mut reordered = triangle();
        reordered.swap(0, 1);
        let hash2 = AntennaHash::new(&reordered, 128, 128);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn different_image_size() {
        let hash1 = AntennaHash::new(&triangle(), 128, 128);
        let hash2 = AntennaHash::new(&triangle(), 128, 64);
        let hash3 = AntennaHash::new(&triangle(), 64, 128);
        assert_ne!(hash1, hash2);
        assert_ne!(hash2, hash3);
    }

    #[test]
    fn from_tuples() {
        let a: Antenna = (1.0, 2.0).into();
        let b: Antenna = [1.0, 2.0].into();
        assert_eq!(a, b);
        assert_eq!(a, Antenna::new(1.0, 2.0));
    }
}
