// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Error type shared by every stage of the pass: alignment search, the
//! frame state machine, and output formatting.

use std::io;

use thiserror::Error;

/// Errors that can terminate a [`crate::pass::Pass`].
#[derive(Debug, Error)]
pub enum Error {
    /// The capture file could not be opened for reading.
    #[error("could not open input file: {0}")]
    InputOpenFailed(#[source] io::Error),

    /// The output file could not be created or truncated.
    #[error("could not open output file: {0}")]
    OutputOpenFailed(#[source] io::Error),

    /// None of the ten candidate bit-shifts produced a structurally valid
    /// video signal (non-zero active resolution on both axes).
    ///
    /// Typically indicates a truncated capture or a non-TMDS input.
    #[error("no bit alignment in 0..10 produced a valid video signal")]
    AlignmentNotFound,

    /// Any other I/O failure encountered while reading or writing mid-pass.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
