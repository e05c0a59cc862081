// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! This crate decodes captured TMDS (Transition-Minimized Differential
//! Signaling) symbol streams — the line code used by DVI/HDMI between a
//! source and a display — into RGB pixels, recovering frame and line
//! structure from the embedded control tokens.
//!
//! The [symbol] module contains the bit-level TMDS-to-byte decoder.
//!
//! The [word] module unpacks a captured 32-bit word into its three 10-bit
//! channel symbols.
//!
//! The [pixel] module classifies a triple of symbols as active video or one
//! of the four control states.
//!
//! The [align] module recovers the unknown bit-shift of a capture and
//! produces the aligned pixel sequence for a given shift.
//!
//! The [state_machine] module consumes aligned pixels, tracks frame/line
//! boundaries, and estimates the active and virtual resolution.
//!
//! The [pass] module ties the above together into a single entry point that
//! runs the two-pass alignment search over a seekable input.
//!
//! The [output] module writes the decoded pixels out, either as a raw
//! interleaved RGB stream or wrapped in a minimal netpbm container.
//!
//! The [error] module contains the error type shared by all of the above.

pub mod align;
pub mod error;
pub mod output;
pub mod pass;
pub mod pixel;
pub mod resolution;
pub mod stats;
pub mod state_machine;
pub mod symbol;
pub mod word;

pub use error::{Error, Result};
pub use pass::{Options, Pass, PassReport};

/// A 10-bit TMDS symbol, carried in a 16-bit container for ergonomics.
///
/// Only the low 10 bits are ever significant; every site that derives a
/// `Symbol` from a shift or combination masks with [`SYMBOL_MASK`].
pub type Symbol = u16;

/// Mask of the 10 bits that make up a [`Symbol`].
pub const SYMBOL_MASK: Symbol = 0x3FF;

/// Both syncs inactive.
pub const BLANK: Symbol = 0x354;
/// Horizontal sync active.
pub const HSYNC: Symbol = 0x0AB;
/// Vertical sync active.
pub const VSYNC: Symbol = 0x154;
/// Both horizontal and vertical sync active.
pub const VHSYNC: Symbol = 0x2AB;

/// Whether `symbol` is one of the four reserved control tokens rather than
/// an encoded data byte.
pub fn is_control_token(symbol: Symbol) -> bool {
    matches!(symbol, BLANK | HSYNC | VSYNC | VHSYNC)
}
