// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The single entry point tying the word reader, realigner, state machine,
//! and output sinks together: the two-pass alignment search over a
//! seekable input.

use std::io::{Read, Seek};

use log::{debug, info, warn};

use crate::align::{AlignedPixels, WordReader};
use crate::error::{Error, Result};
use crate::output::{sentinel_color, PixelSink};
use crate::stats::ChannelStats;
use crate::state_machine::{Emit, StateMachine};

/// User-facing configuration for a single decode pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Drop pixels until the stream is known to be data-aligned.
    pub align: bool,
    /// Terminate after the first complete frame. Implies `align`.
    pub one_frame: bool,
    /// Render sentinel colors for control pixels instead of skipping them.
    pub show_syncs: bool,
    /// Log per-lane control-token counts at the end of the pass.
    pub channel_info: bool,
    /// Log the active resolution at the end of the pass.
    pub show_resolution: bool,
    /// Log the virtual resolution at the end of the pass.
    pub show_resolution_virtual: bool,
    /// Log the total output resolution at the end of the pass.
    pub show_resolution_total: bool,
}

/// A summary of what a completed [`Pass`] found.
#[derive(Debug, Clone, Copy)]
pub struct PassReport {
    pub locked_shift: u32,
    pub active_x: u32,
    pub active_y: u32,
    pub virtual_x: u32,
    pub virtual_y: u32,
    pub total_x: u32,
    pub total_y: u32,
    pub stats: [ChannelStats; 3],
}

/// Runs the alignment search and decode over a seekable input, optionally
/// writing decoded pixels to a sink.
pub struct Pass<R> {
    words: Option<WordReader<R>>,
    options: Options,
}

impl<R: Read + Seek> Pass<R> {
    pub fn new(input: R, options: Options) -> Self {
        Self { words: Some(WordReader::new(input)), options }
    }

    /// Runs the two-pass alignment search (§4.3) and, if `sink` is given,
    /// writes the decoded output of the canonical (second) pass.
    pub fn run(mut self, mut sink: Option<&mut dyn PixelSink>) -> Result<PassReport> {
        let locked_shift = self.find_alignment()?;
        info!("locked alignment shift s={locked_shift}");

        let mut words = self.words.take().expect("words present between trials");
        words.rewind()?;
        let mut sm = StateMachine::new(
            self.options.align,
            self.options.one_frame,
            self.options.show_syncs,
        );
        let mut pixels = AlignedPixels::new(words, locked_shift);

        loop {
            let pixel = match pixels.next_pixel()? {
                Some(p) => p,
                None => break,
            };
            let emit = sm.feed(pixel);
            if let Some(sink) = sink.as_deref_mut() {
                match emit {
                    Emit::Skipped => {}
                    Emit::Active(rgb) => sink.write_pixel(rgb)?,
                    Emit::Control(class) => sink.write_pixel(sentinel_color(class))?,
                }
            }
            if sm.is_terminated() {
                break;
            }
        }

        let report = PassReport {
            locked_shift,
            active_x: sm.active_resolution().x,
            active_y: sm.active_resolution().y,
            virtual_x: sm.virtual_resolution().x,
            virtual_y: sm.virtual_resolution().y,
            total_x: sm.total_x(),
            total_y: sm.total_y(),
            stats: *sm.stats(),
        };

        if let Some(sink) = sink {
            sink.finish(report.total_x, report.total_y)?;
        }

        self.log_report(&report);
        Ok(report)
    }

    /// The discriminant pass of §4.3: tries every shift in `0..10` until
    /// one yields a non-zero active resolution for the first frame.
    fn find_alignment(&mut self) -> Result<u32> {
        for shift in 0..10 {
            let mut words = self.words.take().expect("words present between trials");
            words.rewind()?;
            let mut pixels = AlignedPixels::new(words, shift);
            let mut sm = StateMachine::new(true, true, false);

            loop {
                let pixel = match pixels.next_pixel()? {
                    Some(p) => p,
                    None => break,
                };
                sm.feed(pixel);
                if sm.is_terminated() {
                    break;
                }
            }

            self.words = Some(pixels.into_inner());

            if sm.has_valid_resolution() {
                debug!(
                    "shift {shift} produced res.x={} res.y={}",
                    sm.active_resolution().x,
                    sm.active_resolution().y
                );
                return Ok(shift);
            }
        }
        warn!("no alignment in 0..10 produced a valid video signal");
        Err(Error::AlignmentNotFound)
    }

    fn log_report(&self, report: &PassReport) {
        if self.options.show_resolution {
            info!("active resolution: {}x{}", report.active_x, report.active_y);
        }
        if self.options.show_resolution_virtual {
            info!("virtual resolution: {}x{}", report.virtual_x, report.virtual_y);
        }
        if self.options.show_resolution_total {
            info!("total resolution: {}x{}", report.total_x, report.total_y);
        }
        if self.options.channel_info {
            for (lane, stats) in report.stats.iter().enumerate() {
                info!(
                    "lane {lane}: blanks={} hsyncs={} vsyncs={} vhsyncs={} (total: {})",
                    stats.blanks, stats.hsyncs, stats.vsyncs, stats.vhsyncs, stats.total()
                );
            }
        }
    }
}
