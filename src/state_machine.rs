// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The frame/line state machine: consumes one aligned pixel at a time,
//! tracks frame boundaries via VSYNC edges, estimates resolution, and
//! decides what (if anything) should be emitted for each pixel.

use crate::pixel::{PixelClass, TmdsPixel};
use crate::resolution::{AxisResolution, TotalCounter};
use crate::stats::ChannelStats;
use crate::symbol::tmds_to_byte;

/// What the caller should do with a given input pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Filtered out by the `align` gate, or a control pixel with sync
    /// rendering disabled. Nothing is written.
    Skipped,
    /// Active video; write these three RGB bytes.
    Active([u8; 3]),
    /// A control pixel, with sync rendering enabled; write the sentinel
    /// for this class.
    Control(PixelClass),
}

/// Consumes aligned pixels one at a time and accumulates frame state,
/// resolution estimates, and per-lane statistics.
pub struct StateMachine {
    align: bool,
    one_frame: bool,
    show_syncs: bool,

    index: usize,
    data_aligned: bool,
    first_frame_ended: bool,
    terminated: bool,

    prev_is_vsync: bool,
    prev_is_hsync: bool,
    prev_is_ctrl: bool,

    active: AxisResolution,
    virtual_: AxisResolution,
    total: TotalCounter,
    stats: [ChannelStats; 3],
}

impl StateMachine {
    /// `one_frame` implies `align`, per the external contract.
    pub fn new(align: bool, one_frame: bool, show_syncs: bool) -> Self {
        Self {
            align: align || one_frame,
            one_frame,
            show_syncs,
            index: 0,
            data_aligned: false,
            first_frame_ended: false,
            terminated: false,
            prev_is_vsync: false,
            prev_is_hsync: false,
            prev_is_ctrl: false,
            active: AxisResolution::new(),
            virtual_: AxisResolution::new(),
            total: TotalCounter::new(),
            stats: [ChannelStats::default(); 3],
        }
    }

    pub fn active_resolution(&self) -> &AxisResolution {
        &self.active
    }

    pub fn virtual_resolution(&self) -> &AxisResolution {
        &self.virtual_
    }

    pub fn total_x(&self) -> u32 {
        if self.show_syncs {
            self.virtual_.x
        } else {
            self.active.x
        }
    }

    pub fn total_y(&self) -> u32 {
        self.total.y
    }

    pub fn stats(&self) -> &[ChannelStats; 3] {
        &self.stats
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn is_data_aligned(&self) -> bool {
        self.data_aligned
    }

    /// Whether the first completed frame produced a structurally valid
    /// active resolution: the discriminant used by the alignment search.
    pub fn has_valid_resolution(&self) -> bool {
        self.active.x > 0 && self.active.y > 0
    }

    /// Advances the machine by one pixel and reports what should be
    /// emitted for it. Panics if called again after [`Self::is_terminated`]
    /// returned true.
    pub fn feed(&mut self, pixel: TmdsPixel) -> Emit {
        assert!(!self.terminated, "fed a pixel after termination");

        let is_hsync = pixel.is_hsync();
        let is_vsync = pixel.is_vsync();
        let is_ctrl = pixel.is_ctrl();

        let vsync_falling = self.prev_is_vsync && !is_vsync;
        if vsync_falling {
            if !self.data_aligned {
                self.data_aligned = true;
            } else if !self.first_frame_ended {
                self.first_frame_ended = true;
                if self.one_frame {
                    self.terminated = true;
                }
            }
        }

        self.stats[0].observe(pixel.d0);
        self.stats[1].observe(pixel.d1);
        self.stats[2].observe(pixel.d2);

        // The x-latch runs unconditionally, matching the reference: a
        // capture that starts mid-active-line can latch res.x from the
        // control-pixel gap before data_aligned is ever set. Only the
        // per-line y counters wait for alignment and the end of the
        // first frame.
        let hsync_rising = !self.prev_is_hsync && is_hsync;
        self.active.observe_active_x(self.index, is_ctrl);
        if hsync_rising {
            self.virtual_.observe_virtual_x(self.index);
        }
        if self.data_aligned && !self.first_frame_ended {
            if !self.prev_is_ctrl && is_ctrl {
                self.active.increment_y();
            }
            if hsync_rising {
                self.virtual_.increment_y();
            }
        }

        let totals_gated = !(self.align || self.one_frame) || (self.data_aligned && !self.terminated);
        if totals_gated {
            let falling_edge = if self.show_syncs {
                self.prev_is_hsync && !is_hsync
            } else {
                self.prev_is_ctrl && !is_ctrl
            };
            if falling_edge {
                self.total.mark_falling_edge();
            }
        }

        let emit = if self.align && !self.data_aligned {
            Emit::Skipped
        } else if is_ctrl {
            if self.show_syncs {
                Emit::Control(pixel.classify())
            } else {
                Emit::Skipped
            }
        } else {
            Emit::Active([
                tmds_to_byte(pixel.d0),
                tmds_to_byte(pixel.d1),
                tmds_to_byte(pixel.d2),
            ])
        };

        self.prev_is_vsync = is_vsync;
        self.prev_is_hsync = is_hsync;
        self.prev_is_ctrl = is_ctrl;
        self.index += 1;

        emit
    }
}
