// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Form baselines from antenna positions.

use marlu::math::cross_correlation_baseline_to_tiles;

use crate::{Antenna, SamplingError};

/// The displacement between two antennas on the ground \[metres\].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Baseline {
    pub u: f64,
    pub v: f64,
}

impl Baseline {
    /// The baseline from antenna `a` to antenna `b`, i.e. `b - a`.
    pub fn between(a: &Antenna, b: &Antenna) -> Baseline {
        Baseline {
            u: b.x - a.x,
            v: b.y - a.y,
        }
    }

    pub fn length(&self) -> f64 {
        self.u.hypot(self.v)
    }
}

impl std::ops::Mul<f64> for Baseline {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Baseline {
            u: self.u * rhs,
            v: self.v * rhs,
        }
    }
}

/// All of the baselines of an array, one per unordered antenna pair, along
/// with the length of the longest one.
#[derive(Debug, Clone)]
pub struct Baselines {
    vectors: Vec<Baseline>,
    max_length: f64,
}

impl Baselines {
    /// Form a baseline for every antenna pair (i, j) with i < j. The ordering
    /// matches the ordering of cross-correlation baselines used elsewhere in
    /// radio astronomy, e.g. (0, 1), (0, 2), ..., (1, 2), ...
    ///
    /// Fewer than 2 antennas can't make a baseline, and that is an error.
    pub fn from_antennas(antennas: &[Antenna]) -> Result<Baselines, SamplingError> {
        let num_antennas = antennas.len();
        if num_antennas < 2 {
            return Err(SamplingError::InsufficientAntennas { got: num_antennas });
        }

        let num_baselines = num_antennas * (num_antennas - 1) / 2;
        let vectors: Vec<Baseline> = (0..num_baselines)
            .map(|i_bl| {
                let (i, j) = cross_correlation_baseline_to_tiles(num_antennas, i_bl);
                Baseline::between(&antennas[i], &antennas[j])
            })
            .collect();
        let max_length = vectors
            .iter()
            .map(Baseline::length)
            .fold(0.0, f64::max);

        Ok(Baselines {
            vectors,
            max_length,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false; there is at least one baseline.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The length of the longest baseline ("Bmax") \[metres\].
    pub fn max_length(&self) -> f64 {
        self.max_length
    }

    /// Are all of the antennas (practically) in the same place?
    pub fn is_degenerate(&self) -> bool {
        self.max_length < crate::constants::BMAX_EPSILON
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Baseline> {
        self.vectors.iter()
    }
}

impl<'a> IntoIterator for &'a Baselines {
    type Item = &'a Baseline;
    type IntoIter = std::slice::Iter<'a, Baseline>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn too_few_antennas() {
        assert_eq!(
            Baselines::from_antennas(&[]).unwrap_err(),
            SamplingError::InsufficientAntennas { got: 0 }
        );
        assert_eq!(
            Baselines::from_antennas(&[Antenna::new(1.0, 1.0)]).unwrap_err(),
            SamplingError::InsufficientAntennas { got: 1 }
        );
    }

    #[test]
    fn triangle() {
        let antennas = [
            Antenna::new(0.0, 0.0),
            Antenna::new(10.0, 0.0),
            Antenna::new(0.0, 10.0),
        ];
        let baselines = Baselines::from_antennas(&antennas).unwrap();
        assert_eq!(baselines.len(), 3);
        let vectors: Vec<_> = baselines.iter().copied().collect();
        assert_eq!(
            vectors,
            vec![
                Baseline { u: 10.0, v: 0.0 },
                Baseline { u: 0.0, v: 10.0 },
                Baseline { u: -10.0, v: 10.0 },
            ]
        );
        assert_abs_diff_eq!(baselines.max_length(), 200.0_f64.sqrt(), epsilon = 1e-12);
        assert!(!baselines.is_degenerate());
    }

    #[test]
    fn count_and_max_length() {
        for n in 2..12 {
            let antennas: Vec<Antenna> = (0..n)
                .map(|i| {
                    let i = i as f64;
                    Antenna::new(i * 3.0 - 7.0, (i * 0.7).sin() * 20.0)
                })
                .collect();
            let baselines = Baselines::from_antennas(&antennas).unwrap();
            assert_eq!(baselines.len(), n * (n - 1) / 2);

            let mut expected_max = 0.0_f64;
            for (i, a) in antennas.iter().enumerate() {
                for b in &antennas[i + 1..] {
                    expected_max = expected_max.max((b.x - a.x).hypot(b.y - a.y));
                }
            }
            assert_abs_diff_eq!(baselines.max_length(), expected_max, epsilon = 1e-12);
        }
    }

    #[test]
    fn only_one_direction_per_pair() {
        let antennas = [Antenna::new(5.0, 5.0), Antenna::new(2.0, 1.0)];
        let baselines = Baselines::from_antennas(&antennas).unwrap();
        assert_eq!(baselines.len(), 1);
        assert_eq!(
            baselines.iter().next().copied(),
            Some(Baseline { u: -3.0, v: -4.0 })
        );
        assert_abs_diff_eq!(baselines.max_length(), 5.0);
    }

    #[test]
    fn coincident_antennas() {
        let antennas = [Antenna::new(1.0, 2.0); 4];
        let baselines = Baselines::from_antennas(&antennas).unwrap();
        assert_eq!(baselines.len(), 6);
        assert_eq!(baselines.max_length(), 0.0);
        assert!(baselines.is_degenerate());
    }
}
