// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! tmdsdec, an offline decoder for captured TMDS (DVI/HDMI) symbol
//! streams. Finds the unknown bit alignment, recovers frame/line
//! structure from the embedded control tokens, and writes the decoded
//! image as a raw RGB stream or a minimal netpbm container.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use log::{error, info};

use tmds_decode::error::Error;
use tmds_decode::output::{NetpbmWriter, PixelSink, RawWriter};
use tmds_decode::pass::{Options, Pass};

#[derive(FromArgs)]
/// Decode a captured TMDS symbol stream into an RGB image.
struct Args {
    /// path to the captured symbol stream
    #[argh(positional)]
    input: PathBuf,

    /// path to write the decoded image to
    #[argh(option, short = 'o')]
    out: Option<PathBuf>,

    /// drop pixels until the stream is known to be data-aligned
    #[argh(switch, short = 'a')]
    align: bool,

    /// stop after the first complete frame (implies --align)
    #[argh(switch, short = '1')]
    one_frame: bool,

    /// render sentinel colors for sync pixels instead of skipping them
    #[argh(switch, short = 's')]
    include_syncs: bool,

    /// log per-lane control-token counts at the end of the pass
    #[argh(switch, short = 'c')]
    channel_info: bool,

    /// log the active resolution at the end of the pass
    #[argh(switch, short = 'r')]
    resolution: bool,

    /// log the virtual (including blanking) resolution at the end of the pass
    #[argh(switch, short = 'R')]
    resolution_virtual: bool,

    /// log the total output resolution at the end of the pass
    #[argh(switch, short = 't')]
    resolution_total: bool,

    /// write the output wrapped in a netpbm (P6) container instead of raw bytes
    #[argh(switch)]
    netpbm: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let input = File::open(&args.input).map_err(Error::InputOpenFailed)?;

    let options = Options {
        align: args.align,
        one_frame: args.one_frame,
        show_syncs: args.include_syncs,
        channel_info: args.channel_info,
        show_resolution: args.resolution,
        show_resolution_virtual: args.resolution_virtual,
        show_resolution_total: args.resolution_total,
    };

    let pass = Pass::new(input, options);

    let report = match &args.out {
        None => pass.run(None)?,
        Some(out_path) => {
            let out = File::create(out_path).map_err(Error::OutputOpenFailed)?;
            if args.netpbm {
                let mut sink = NetpbmWriter::new(out)?;
                let sink: &mut dyn PixelSink = &mut sink;
                pass.run(Some(sink))?
            } else {
                let mut sink = RawWriter::new(out);
                let sink: &mut dyn PixelSink = &mut sink;
                pass.run(Some(sink))?
            }
        }
    };

    info!(
        "decoded {}x{} active video at shift {}",
        report.active_x, report.active_y, report.locked_shift
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
