use anyhow::{Result, bail};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::command::{Cli, InfoArgs};
use crate::input::InputReader;
use adr::process::extract::{ControlMessage, MessageAssembler, extract_ancillary};
use adr::structs::ancillary::{ADR_FRAME_LEN, AncillaryFlags};
use adr::structs::message::MessageKind;
use adr::utils::charset::EbuCharset;

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Analyzing ADR stream: {}", args.input.display());

    let mut reader = InputReader::new(&args.input)?;
    let mut assembler = MessageAssembler::new();
    let charset = EbuCharset::new();

    let pb = multi.map(|multi| {
        let pb = multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Analyzing frames...");
        pb
    });

    let mut stats = StreamStats::default();
    let mut frame = [0u8; ADR_FRAME_LEN];

    loop {
        let n = reader.read_frame(&mut frame)?;
        if n < ADR_FRAME_LEN {
            if n > 0 {
                log::warn!("ignoring trailing partial frame of {n} bytes");
            }
            break;
        }

        let data = extract_ancillary(&frame)?;
        stats.frames += 1;
        if AncillaryFlags::from_data(&data).scf_crc {
            stats.scf_crc_frames += 1;
        }

        for &byte in &data[15..] {
            if let Some(message) = assembler.push_byte(byte) {
                stats.record(&message, &charset);
                if cli.strict && !message.checksum_ok {
                    bail!(
                        "control message checksum mismatch in frame {}",
                        stats.frames
                    );
                }
            }
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    stats.print();

    Ok(())
}

#[derive(Default)]
struct StreamStats {
    frames: u64,
    scf_crc_frames: u64,
    messages: u64,
    bad_checksums: u64,
    service_type_seen: bool,
    program_info: Option<String>,
    station_id: Option<String>,
}

impl StreamStats {
    fn record(&mut self, message: &ControlMessage, charset: &EbuCharset) {
        self.messages += 1;
        if !message.checksum_ok {
            self.bad_checksums += 1;
            log::warn!("control message with bad checksum (type {:#04X})", message.type_byte);
            return;
        }

        match message.kind {
            Some(MessageKind::ServiceType) => self.service_type_seen = true,
            Some(MessageKind::ProgramInfo) => {
                self.program_info = Some(String::from_utf8_lossy(&message.payload).into_owned());
            }
            Some(MessageKind::StationId) => {
                let id = message.payload.strip_suffix(b"#").unwrap_or(&message.payload);
                self.station_id = Some(charset.decode(id));
            }
            None => {
                log::warn!("unknown control message type {:#04X}", message.type_byte);
            }
        }
    }

    fn print(&self) {
        if self.frames == 0 {
            println!("No complete ADR frames found in the input.");
            return;
        }

        println!("Frames                      {}", self.frames);
        println!(
            "ScF-CRC flag                set on {} of {} frames",
            self.scf_crc_frames, self.frames
        );

        if self.messages == 0 {
            println!("No control messages found; not an ADR ancillary stream?");
            return;
        }

        println!(
            "Control messages            {} ({} bad checksums)",
            self.messages, self.bad_checksums
        );
        println!(
            "Service type                {}",
            if self.service_type_seen {
                "free-to-air (DC1)"
            } else {
                "not announced"
            }
        );

        if let Some(info) = &self.program_info {
            println!("Program info                {info}");
            // Fixed field layout: ECC, country, coverage, reference, mode,
            // category.
            if info.len() == 8 && info.is_ascii() {
                println!(
                    "                            ECC {} country {} coverage {} ref {} mode {} category {}",
                    &info[..2],
                    &info[2..3],
                    &info[3..4],
                    &info[4..6],
                    &info[6..7],
                    &info[7..8],
                );
            }
        }

        if let Some(id) = &self.station_id {
            println!("Station ID                  '{id}'");
        }
    }
}
