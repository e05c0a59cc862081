// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Horizontal/vertical resolution estimation from the control-token
//! structure of an aligned pixel stream.
//!
//! Two independent [`AxisResolution`] instances are tracked by the state
//! machine: *active* (measured between control-token regions) and
//! *virtual* (measured between HSYNC pulses, i.e. including horizontal
//! blanking). A pair of [`TotalCounter`]s separately accumulates the
//! "total output resolution" figure used only for container headers.

/// One axis pair (x latched once, y incremented over the first frame) plus
/// the bookkeeping needed to latch `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisResolution {
    pub x: u32,
    pub y: u32,
    x_locked: bool,
    last_index: Option<usize>,
}

impl AxisResolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.x_locked
    }

    /// Active-horizontal-resolution latch: call on every pixel with
    /// whether *that* pixel is a control pixel. Per spec §4.4: a control
    /// pixel whose gap from the last recorded control index exceeds 1
    /// latches `x = index - last - 1`; otherwise the control index is
    /// remembered. Non-control pixels are ignored entirely.
    pub fn observe_active_x(&mut self, index: usize, is_ctrl: bool) {
        if self.x_locked || !is_ctrl {
            return;
        }
        match self.last_index {
            Some(last) if index - last > 1 => {
                self.x = (index - last - 1) as u32;
                self.x_locked = true;
            }
            _ => self.last_index = Some(index),
        }
    }

    /// Virtual-horizontal-resolution latch: call only at rising edges of
    /// `is_hsync`. Same gap logic, but without the "-1" (the HSYNC pixel
    /// itself is included in the measured span).
    pub fn observe_virtual_x(&mut self, index: usize) {
        if self.x_locked {
            return;
        }
        match self.last_index {
            Some(last) if index - last > 1 => {
                self.x = (index - last) as u32;
                self.x_locked = true;
            }
            _ => self.last_index = Some(index),
        }
    }

    /// Counts one more line of active video.
    pub fn increment_y(&mut self) {
        self.y += 1;
    }
}

/// Accumulates the "total output resolution" y figure: once per falling
/// edge of whichever predicate is selected (`is_ctrl`, or `is_hsync` when
/// syncs are being rendered), gated by the alignment/one-frame options
/// exactly as output emission is gated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalCounter {
    pub y: u32,
}

impl TotalCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_falling_edge(&mut self) {
        self.y += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_x_ignores_non_control_pixels() {
        let mut a = AxisResolution::new();
        a.observe_active_x(0, false);
        a.observe_active_x(1, false);
        assert!(!a.is_locked());
    }

    #[test]
    fn active_x_latches_on_first_gap() {
        let mut a = AxisResolution::new();
        // Control run at indices 0,1, then a gap of 4 active pixels,
        // then the next control pixel at index 6.
        a.observe_active_x(0, true);
        a.observe_active_x(1, true);
        for i in 2..6 {
            a.observe_active_x(i, false);
        }
        a.observe_active_x(6, true);
        assert!(a.is_locked());
        assert_eq!(a.x, 6 - 1 - 1);
    }

    #[test]
    fn active_x_stays_locked_after_first_latch() {
        let mut a = AxisResolution::new();
        a.observe_active_x(0, true);
        a.observe_active_x(5, true);
        assert!(a.is_locked());
        let x_before = a.x;
        a.observe_active_x(20, true);
        assert_eq!(a.x, x_before);
    }

    #[test]
    fn virtual_x_latches_without_the_minus_one() {
        let mut a = AxisResolution::new();
        a.observe_virtual_x(0);
        a.observe_virtual_x(6);
        assert!(a.is_locked());
        assert_eq!(a.x, 6);
    }

    #[test]
    fn index_zero_is_not_silently_skipped() {
        // Regression for DESIGN.md note (d): the reference C used 0 as
        // both a valid index and "unset", which this Option<usize>-based
        // tracker does not reproduce.
        let mut a = AxisResolution::new();
        a.observe_active_x(0, true);
        a.observe_active_x(4, true);
        assert!(a.is_locked());
        assert_eq!(a.x, 4 - 1 - 1);
    }
}
