// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The TMDS symbol codec: the exact bit-level inverse of the transmitter's
//! line coding.

use crate::Symbol;

/// Decodes a single TMDS symbol into its original 8-bit data byte.
///
/// `symbol` must not be one of the four control tokens
/// ([`crate::BLANK`], [`crate::HSYNC`], [`crate::VSYNC`],
/// [`crate::VHSYNC`]); behavior on a control token is unspecified, since
/// callers are expected to filter those out via
/// [`crate::is_control_token`] before decoding.
///
/// The transmitter chose between an XOR and an XNOR transform of the
/// source byte, signaled by bit 8, and optionally inverted the low 8 bits
/// for DC balance, signaled by bit 9. This function undoes both choices.
pub fn tmds_to_byte(symbol: Symbol) -> u8 {
    let mut mid = (symbol & 0xFF) as u8;
    if symbol & 0x200 != 0 {
        mid = !mid;
    }

    let mut byte = mid & 0x1;
    for i in 1..8 {
        let bit = if symbol & 0x100 != 0 {
            ((mid >> i) & 1) ^ ((mid >> (i - 1)) & 1)
        } else {
            u8::from(((mid >> i) & 1) == ((mid >> (i - 1)) & 1))
        };
        byte |= bit << i;
    }
    byte
}
