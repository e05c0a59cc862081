// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Reads captured words from a seekable source and realigns them into a
//! stream of [`TmdsPixel`]s at a caller-chosen bit shift.

use std::io::{self, Read, Seek, SeekFrom};

use crate::pixel::TmdsPixel;
use crate::word::{unpack_word, RawPixel};
use crate::SYMBOL_MASK;

/// Reads `u32` words, little-endian, 4 bytes at a time, from any
/// `Read + Seek`. A short read at end-of-stream is treated as a clean
/// end of iteration rather than an error.
pub struct WordReader<R> {
    inner: R,
}

impl<R: Read + Seek> WordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Rewinds to the start of the stream.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Reads the next word, or `None` on a clean end-of-stream (no bytes,
    /// or fewer than 4 available).
    pub fn next_word(&mut self) -> io::Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        loop {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
            if filled == 4 {
                break;
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < 4 {
            // Truncated mid-word: spec treats this like end-of-stream.
            return Ok(None);
        }
        Ok(Some(u32::from_le_bytes(buf)))
    }
}

/// Combines the low `10 - s` bits of `prev` with the high `s` bits of
/// `curr`, per §4.3. `s` must be in `0..10`.
fn shift_lane(prev: u16, curr: u16, s: u32) -> u16 {
    if s == 0 {
        curr & SYMBOL_MASK
    } else {
        ((prev << s) | (curr >> (10 - s))) & SYMBOL_MASK
    }
}

fn shift_pixel(prev: RawPixel, curr: RawPixel, s: u32) -> TmdsPixel {
    TmdsPixel::new(
        shift_lane(prev.d0, curr.d0, s),
        shift_lane(prev.d1, curr.d1, s),
        shift_lane(prev.d2, curr.d2, s),
    )
}

/// Drives a [`WordReader`] at a fixed shift `s`, yielding one aligned
/// [`TmdsPixel`] per captured word from the third onward. The reference
/// decoder reads two raw words before its main loop and uses their
/// shifted combination only as the seed for the *next* pixel, never
/// classifying it; this mirrors that by consuming two raw words before
/// yielding anything, so the first emitted pixel is the shift of the
/// second and third raw words, not the first and second.
pub struct AlignedPixels<R> {
    words: WordReader<R>,
    shift: u32,
    prev: Option<RawPixel>,
    primed: bool,
}

impl<R: Read + Seek> AlignedPixels<R> {
    /// `shift` must be in `0..10`.
    pub fn new(words: WordReader<R>, shift: u32) -> Self {
        assert!(shift < 10, "shift out of range: {shift}");
        Self { words, shift, prev: None, primed: false }
    }

    pub fn into_inner(self) -> WordReader<R> {
        self.words
    }

    /// Reads and yields the next aligned pixel, or `None` at end of
    /// input.
    pub fn next_pixel(&mut self) -> io::Result<Option<TmdsPixel>> {
        loop {
            let word = match self.words.next_word()? {
                Some(w) => w,
                None => return Ok(None),
            };
            let curr = unpack_word(word);
            match self.prev.replace(curr) {
                None => continue,
                Some(_) if !self.primed => {
                    self.primed = true;
                    continue;
                }
                Some(prev) => return Ok(Some(shift_pixel(prev, curr, self.shift))),
            }
        }
    }
}
