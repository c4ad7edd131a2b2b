//! ADR (Astra Digital Radio) ancillary data encoding.
//!
//! ADR carries MPEG-1 Layer II audio at 48 kHz / 192 kbit/s in fixed 576
//! byte frames, with broadcast metadata embedded in a reserved 36 byte
//! region of every frame. This crate implements the ancillary data
//! subsystem:
//!
//! 1. A rotating cycle of control messages — service type (DC1), program
//!    information (DC4) and station identity (SYN) — emitted three bytes
//!    per frame ([`structs::message`]).
//! 2. A (7,4) block code expanding each ancillary nibble to a 7-bit
//!    codeword for single-bit error resilience ([`utils::blockcode`]).
//! 3. Column-wise bit interleaving of the 36 codewords into the reserved
//!    frame region, skipping the 4-byte scale factor CRC field
//!    ([`structs::ancillary`]).
//! 4. A one-frame emission delay when the scale factor CRC is enabled,
//!    since the CRC for frame N is stored in frame N−1
//!    ([`process::encode`]).
//!
//! The perceptual audio encoder itself is an external collaborator behind
//! the [`process::encode::FrameEncoder`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use adr::structs::ancillary::{AncillaryWriter, ADR_FRAME_LEN};
//! use adr::structs::identity::StationIdentity;
//! use adr::structs::message::ChannelMode;
//! use adr::utils::charset::EbuCharset;
//!
//! let charset = EbuCharset::new();
//! let identity = StationIdentity::new("TEST", &charset)?;
//! let mut writer = AncillaryWriter::new(identity, ChannelMode::JointStereo, false)?;
//!
//! // One compressed frame per call, in transmission order.
//! let mut frame = [0u8; ADR_FRAME_LEN];
//! writer.insert(&mut frame)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Frame processing pipelines.
///
/// 1. **Encoding** ([`process::encode`]): drives an external frame encoder,
///    inserts ancillary data and schedules emission around the one-frame
///    scale factor CRC delay.
///
/// 2. **Extraction** ([`process::extract`]): recovers ancillary data from
///    encoded frames for operator display.
pub mod process;

/// Data structures representing ADR format components.
///
/// - **Ancillary data** ([`structs::ancillary`]): region layout and flags
/// - **Control messages** ([`structs::message`]): DC1/DC4/SYN cycle
/// - **Station identity** ([`structs::identity`]): 32-byte identity buffer
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// Broadcast character set codec, (7,4) block code tables and error types.
pub mod utils;
