// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Output sinks: a raw interleaved RGB stream, and a netpbm (`P6`)
//! container with a fixed-width header patched in place once the
//! resolution is known.

use std::io::{self, Seek, SeekFrom, Write};

use crate::pixel::PixelClass;

/// Sync visualization sentinel colors. Each is nominally a 24-bit RGB
/// value (0x90C3D4 for HSYNC, etc.) but is written out byte-by-byte in
/// little-endian order, low byte first, matching how the reference
/// decoder stores the 24-bit constant in a wider register and writes
/// its first 3 bytes.
pub const HSYNC_COLOR: [u8; 3] = [0xD4, 0xC3, 0x90];
pub const VSYNC_COLOR: [u8; 3] = [0xD4, 0x90, 0xC3];
pub const VHSYNC_COLOR: [u8; 3] = [0x90, 0xA1, 0xD4];
pub const BLANK_COLOR: [u8; 3] = [0x90, 0xD4, 0xA1];

/// Maps a control pixel's class to its sentinel color.
pub fn sentinel_color(class: PixelClass) -> [u8; 3] {
    match class {
        PixelClass::Hsync => HSYNC_COLOR,
        PixelClass::Vsync => VSYNC_COLOR,
        PixelClass::VHsync => VHSYNC_COLOR,
        PixelClass::Blank => BLANK_COLOR,
        PixelClass::Active => unreachable!("sentinel_color called on an active pixel"),
    }
}

/// A sink that can receive a pass's decoded pixel bytes.
pub trait PixelSink {
    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()>;

    /// Called once the pass has finished; lets container writers patch up
    /// their header. Default no-op for sinks without trailing work.
    fn finish(&mut self, _width: u32, _height: u32) -> io::Result<()> {
        Ok(())
    }
}

/// Writes the flat 24-bit-per-pixel interleaved stream directly, with no
/// header of any kind.
pub struct RawWriter<W> {
    inner: W,
}

impl<W: Write> RawWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> PixelSink for RawWriter<W> {
    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()> {
        self.inner.write_all(&rgb)
    }
}

/// Width and height are rendered as this many ASCII decimal digits,
/// zero-padded, so the header's byte length never changes once written.
const DIMENSION_WIDTH: usize = 20;

fn netpbm_header(width: u32, height: u32) -> String {
    format!(
        "P6 {:0pad$} {:0pad$} 255\n",
        width,
        height,
        pad = DIMENSION_WIDTH
    )
}

/// Writes a minimal netpbm (`P6`) container: a placeholder header sized
/// for the largest possible dimensions, the raw pixel body, then a
/// rewritten header once the final resolution is known.
pub struct NetpbmWriter<W> {
    inner: W,
}

impl<W: Write + Seek> NetpbmWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(netpbm_header(0, 0).as_bytes())?;
        Ok(Self { inner })
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Seek> PixelSink for NetpbmWriter<W> {
    fn write_pixel(&mut self, rgb: [u8; 3]) -> io::Result<()> {
        self.inner.write_all(&rgb)
    }

    fn finish(&mut self, width: u32, height: u32) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(netpbm_header(width, height).as_bytes())?;
        Ok(())
    }
}
