// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tmds_decode::output::{NetpbmWriter, PixelSink, RawWriter};
    use tmds_decode::pass::{Options, Pass};
    use tmds_decode::{Error, BLANK, VSYNC};

    /// A minimal 13-pixel capture: two VSYNC pixels, two BLANK (the VSYNC
    /// falling edge lands on the first of these and sets `data_aligned`),
    /// four active pixels, two more BLANK (locking `res.x = 4`), two more
    /// VSYNC, then one more BLANK (the second VSYNC falling edge, closing
    /// the first frame). All three lanes carry the same symbol per pixel.
    const ACTIVE_SYMBOL: u16 = 0x123;

    fn desired_sequence() -> Vec<u16> {
        vec![
            VSYNC, VSYNC, BLANK, BLANK, ACTIVE_SYMBOL, ACTIVE_SYMBOL, ACTIVE_SYMBOL,
            ACTIVE_SYMBOL, BLANK, BLANK, VSYNC, VSYNC, BLANK,
        ]
    }

    /// Computes a raw per-lane symbol stream of length `desired.len() + 2`
    /// such that running the realigner at shift `k` over the packed words
    /// reproduces `desired` exactly. The realigner consumes two raw words
    /// before yielding its first pixel (see `align::AlignedPixels`), so a
    /// leading word is prepended to the algebraic inverse of the
    /// realignment formula (which mixes the low `10 - k` bits of one raw
    /// word with the top `k` bits of the next) — that leading word is
    /// never read back out of any classified pixel.
    fn misalign(desired: &[u16], k: u32) -> Vec<u16> {
        let n = desired.len();
        let mut raw = vec![0u16; n + 1];
        if k == 0 {
            raw[1..].copy_from_slice(desired);
        } else {
            let low_k_mask: u16 = (1 << k) - 1;
            raw[0] = desired[0] >> k;
            for i in 1..n {
                raw[i] = ((desired[i - 1] & low_k_mask) << (10 - k)) | (desired[i] >> k);
            }
            raw[n] = (desired[n - 1] & low_k_mask) << (10 - k);
        }
        let mut seeded = vec![0u16; n + 2];
        seeded[1..].copy_from_slice(&raw);
        seeded
    }

    fn pack_word(d0: u16, d1: u16, d2: u16) -> u32 {
        ((d0 as u32) << 20) | ((d1 as u32) << 10) | (d2 as u32)
    }

    fn build_capture(desired: &[u16], shift: u32) -> Vec<u8> {
        let raw = misalign(desired, shift);
        raw.iter()
            .map(|&v| pack_word(v, v, v))
            .flat_map(|w| w.to_le_bytes())
            .collect()
    }

    #[test]
    fn alignment_search_locks_at_shift_zero() {
        let bytes = build_capture(&desired_sequence(), 0);
        let pass = Pass::new(Cursor::new(bytes), Options::default());
        let report = pass.run(None).unwrap();
        assert_eq!(report.locked_shift, 0);
        assert_eq!(report.active_x, 4);
        assert_eq!(report.active_y, 1);
    }

    #[test]
    fn alignment_search_locks_at_a_nonzero_shift() {
        for shift in [1, 3, 7, 9] {
            let bytes = build_capture(&desired_sequence(), shift);
            let pass = Pass::new(Cursor::new(bytes), Options::default());
            let report = pass.run(None).unwrap();
            assert_eq!(report.locked_shift, shift, "expected lock at shift {shift}");
            assert_eq!(report.active_x, 4);
            assert_eq!(report.active_y, 1);
        }
    }

    #[test]
    fn no_alignment_locks_on_a_stream_with_no_active_video() {
        // 16 words, every lane always BLANK: no control-to-active
        // transition ever occurs, so no shift can latch a non-zero
        // active resolution.
        let desired = vec![BLANK; 16];
        let bytes = build_capture(&desired, 0);
        let pass = Pass::new(Cursor::new(bytes), Options::default());
        match pass.run(None) {
            Err(Error::AlignmentNotFound) => {}
            other => panic!("expected AlignmentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn one_frame_terminates_at_the_second_vsync_falling_edge() {
        let bytes = build_capture(&desired_sequence(), 0);
        let options = Options { one_frame: true, ..Options::default() };
        let mut buf = Vec::new();
        {
            let mut sink = RawWriter::new(&mut buf);
            let sink: &mut dyn PixelSink = &mut sink;
            let pass = Pass::new(Cursor::new(bytes), options);
            let report = pass.run(Some(sink)).unwrap();
            assert_eq!(report.active_x, 4);
            assert_eq!(report.active_y, 1);
        }
        // Only the 4 active pixels (all occurring after data_aligned)
        // produce output; every control pixel is skipped since
        // show_syncs is false.
        assert_eq!(buf.len(), 4 * 3);
    }

    #[test]
    fn channel_stats_count_every_control_token_in_the_stream() {
        let bytes = build_capture(&desired_sequence(), 0);
        let pass = Pass::new(Cursor::new(bytes), Options::default());
        let report = pass.run(None).unwrap();
        for lane in &report.stats {
            assert_eq!(lane.vsyncs, 4, "4 VSYNC pixels in the fixture");
            assert_eq!(lane.blanks, 5, "5 BLANK pixels in the fixture");
            assert_eq!(lane.hsyncs, 0);
            assert_eq!(lane.vhsyncs, 0);
        }
    }

    #[test]
    fn netpbm_header_is_patched_with_the_measured_resolution() {
        let bytes = build_capture(&desired_sequence(), 0);
        let options = Options { align: true, ..Options::default() };
        let mut sink = NetpbmWriter::new(Cursor::new(Vec::new())).unwrap();
        {
            let sink_ref: &mut dyn PixelSink = &mut sink;
            let pass = Pass::new(Cursor::new(bytes), options);
            let report = pass.run(Some(sink_ref)).unwrap();
            assert_eq!(report.total_x, 4);
            assert_eq!(report.total_y, 1);
        }
        let written = sink.into_inner().into_inner();
        let header_len = "P6 00000000000000000000 00000000000000000000 255\n".len();
        let header = std::str::from_utf8(&written[..header_len]).unwrap();
        assert!(header.starts_with("P6 00000000000000000004 00000000000000000001 255"));
    }
}
