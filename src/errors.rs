// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with computing sampling and point-spread images.
 */

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    /// At least one baseline (two antennas) is needed to sample anything.
    #[error("At least 2 antennas are needed to form a baseline, but got {got}")]
    InsufficientAntennas { got: usize },

    #[error("Image dimensions must be at least 1x1, but got {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },
}
