use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Result, bail};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::command::{Cli, EncodeArgs};
use crate::input::InputReader;
use adr::structs::ancillary::{ADR_FRAME_LEN, AncillaryWriter};
use adr::structs::identity::StationIdentity;
use adr::utils::charset::EbuCharset;

pub fn cmd_encode(args: &EncodeArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let charset = EbuCharset::new();
    let identity = StationIdentity::new(&args.station, &charset)?;
    let mode = args.mode.to_channel_mode();

    if args.scfcrc {
        bail!(
            "--scfcrc needs the audio encoder to compute scale factor CRCs; \
             a pre-encoded frame stream cannot be stamped"
        );
    }

    log::info!("Mode: {}", mode.name());
    log::info!("Station ID: '{}'", identity.display(&charset));

    let mut writer = AncillaryWriter::new(identity, mode, false)?;
    let mut reader = InputReader::new(&args.input)?;
    let mut output = open_output(&args.output)?;

    let pb = multi.map(|multi| {
        let pb = multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {pos} frames") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    });

    let mut frame = [0u8; ADR_FRAME_LEN];
    let mut frames = 0u64;

    loop {
        let n = reader.read_frame(&mut frame)?;
        if n == 0 {
            break;
        }
        if n < ADR_FRAME_LEN {
            if cli.strict {
                bail!("input ends with a partial frame of {n} bytes");
            }
            log::warn!("dropping trailing partial frame of {n} bytes");
            break;
        }

        writer.insert(&mut frame)?;
        output.write_all(&frame)?;

        frames += 1;
        if let Some(pb) = &pb {
            pb.set_position(frames);
        }
    }

    output.flush()?;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    log::info!("Encoded {frames} frames.");

    Ok(())
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.to_string_lossy() == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}
