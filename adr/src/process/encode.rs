//! Frame production pipeline.
//!
//! [`AdrEncoder`] drives an external [`FrameEncoder`] and schedules frame
//! emission. With the scale factor CRC disabled every built frame is
//! emittable immediately. With it enabled, the CRC for frame N is stored in
//! frame N−1, so emission runs one frame behind production: the scheduler
//! keeps the two most recent frames in a pair of slots, lets the encoder
//! stamp the previous slot once the new frame is finalized, and only then
//! releases it.

use anyhow::Result;

use crate::structs::ancillary::AncillaryWriter;
use crate::structs::identity::StationIdentity;
use crate::structs::message::ChannelMode;
use crate::utils::errors::{ConfigError, EncodeError};

/// Per-channel PCM samples consumed per compressed frame.
pub const SAMPLES_PER_FRAME: usize = 1152;

/// Interface to the perceptual audio encoder producing fixed-size frames.
///
/// The encoder is a black box to this crate. It must produce frames of a
/// fixed byte length, support a one-shot flush for any final partial frame,
/// and be able to stamp a scale factor CRC into an already produced frame
/// buffer.
pub trait FrameEncoder {
    /// Length in bytes of every complete compressed frame.
    fn frame_len(&self) -> usize;

    /// Encodes one block of interleaved 16-bit PCM into `out`.
    ///
    /// Returns the number of bytes written. Zero means no frame is
    /// available yet (the encoder is still buffering input); this is not an
    /// error.
    fn encode(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize>;

    /// Flushes any remaining buffered audio as a final frame into `out`.
    ///
    /// Returns zero when the stream ends without a final frame.
    fn flush(&mut self, out: &mut [u8]) -> Result<usize>;

    /// Stamps the scale factor CRC belonging to the most recently encoded
    /// frame into `frame` — the *previous* frame's buffer. `len` is the
    /// byte length of the newly encoded frame.
    fn stamp_scf_crc(&mut self, frame: &mut [u8], len: usize) -> Result<()>;
}

/// Decides, for each newly built frame, which buffered frame is emittable.
///
/// Owns the two frame slots, indexed by parity of a monotonic frame
/// counter, and the ancillary writer that mutates each new frame in place.
#[derive(Debug)]
pub struct FrameScheduler {
    writer: AncillaryWriter,
    scf_crc: bool,
    frame_len: usize,
    slots: [Vec<u8>; 2],
    frame: u64,
}

impl FrameScheduler {
    pub fn new(writer: AncillaryWriter, scf_crc: bool, frame_len: usize) -> Self {
        // One spare byte of slack for encoders that over-report on padding
        // frames.
        Self {
            writer,
            scf_crc,
            frame_len,
            slots: [vec![0; frame_len + 1], vec![0; frame_len + 1]],
            frame: 0,
        }
    }

    /// Total frames built so far, emitted or not.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    fn current(&self) -> usize {
        ((self.frame + 1) & 1) as usize
    }

    fn previous(&self) -> usize {
        (self.frame & 1) as usize
    }

    /// The slot the next frame must be encoded into.
    pub fn slot_mut(&mut self) -> &mut [u8] {
        let current = self.current();
        &mut self.slots[current]
    }

    /// Commits the frame just written into the current slot: inserts its
    /// ancillary data and returns the frame that is now ready for output,
    /// if any. `len` is the byte count the encoder reported for the new
    /// frame.
    pub fn commit<E: FrameEncoder>(
        &mut self,
        len: usize,
        encoder: &mut E,
    ) -> Result<Option<&[u8]>> {
        if len > self.slots[0].len() {
            return Err(EncodeError::FrameTooLong {
                len,
                cap: self.slots[0].len(),
            }
            .into());
        }

        let current = self.current();
        let previous = self.previous();

        self.writer.insert(&mut self.slots[current])?;

        let emit = if !self.scf_crc {
            Some(current)
        } else if self.frame > 0 {
            // The ScF-CRC of the new frame belongs in the previous frame,
            // which only now becomes complete.
            encoder.stamp_scf_crc(&mut self.slots[previous], len)?;
            Some(previous)
        } else {
            None
        };

        self.frame += 1;

        Ok(emit.map(|slot| &self.slots[slot][..self.frame_len]))
    }
}

/// The complete ADR encoding pipeline: PCM in, ancillary-tagged frames out.
pub struct AdrEncoder<E: FrameEncoder> {
    encoder: E,
    scheduler: FrameScheduler,
    flushed: bool,
}

impl<E: FrameEncoder> AdrEncoder<E> {
    pub fn new(
        encoder: E,
        identity: StationIdentity,
        mode: ChannelMode,
        scf_crc: bool,
    ) -> Result<Self, ConfigError> {
        let frame_len = encoder.frame_len();
        let writer = AncillaryWriter::new(identity, mode, scf_crc)?;

        Ok(Self {
            encoder,
            scheduler: FrameScheduler::new(writer, scf_crc, frame_len),
            flushed: false,
        })
    }

    /// Feeds one block of interleaved PCM samples. Returns the frame now
    /// ready for output, if any.
    pub fn encode(&mut self, pcm: &[i16]) -> Result<Option<&[u8]>> {
        self.produce(Some(pcm))
    }

    /// Flushes the underlying encoder exactly once and returns any final
    /// emittable frame. Subsequent calls return `None`.
    pub fn finish(&mut self) -> Result<Option<&[u8]>> {
        if self.flushed {
            return Ok(None);
        }
        self.flushed = true;

        self.produce(None)
    }

    pub fn frames_produced(&self) -> u64 {
        self.scheduler.frames()
    }

    fn produce(&mut self, pcm: Option<&[i16]>) -> Result<Option<&[u8]>> {
        let slot = self.scheduler.slot_mut();
        let len = match pcm {
            Some(pcm) => self.encoder.encode(pcm, slot)?,
            None => self.encoder.flush(slot)?,
        };

        if len == 0 {
            return Ok(None);
        }

        self.scheduler.commit(len, &mut self.encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::extract::extract_ancillary;
    use crate::structs::ancillary::{
        ADR_FRAME_LEN, ANCILLARY_OFFSET, AncillaryFlags, SCF_CRC_OFFSET,
    };
    use crate::utils::charset::EbuCharset;

    /// Deterministic stand-in for the perceptual encoder. Every PCM block
    /// yields one frame tagged with its sequence number.
    struct TestEncoder {
        /// Frames the encoder holds back before the first one comes out.
        buffered: usize,
        pending: usize,
        sequence: u8,
    }

    impl TestEncoder {
        fn immediate() -> Self {
            Self {
                buffered: 0,
                pending: 0,
                sequence: 0,
            }
        }

        fn buffering() -> Self {
            Self {
                buffered: 1,
                pending: 0,
                sequence: 0,
            }
        }

        fn emit(&mut self, out: &mut [u8]) -> usize {
            out[..ADR_FRAME_LEN].fill(self.sequence);
            self.sequence += 1;
            ADR_FRAME_LEN
        }
    }

    impl FrameEncoder for TestEncoder {
        fn frame_len(&self) -> usize {
            ADR_FRAME_LEN
        }

        fn encode(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize> {
            assert_eq!(pcm.len(), SAMPLES_PER_FRAME * 2);
            if self.buffered > 0 {
                self.buffered -= 1;
                self.pending += 1;
                return Ok(0);
            }
            Ok(self.emit(out))
        }

        fn flush(&mut self, out: &mut [u8]) -> Result<usize> {
            if self.pending == 0 {
                return Ok(0);
            }
            self.pending -= 1;
            Ok(self.emit(out))
        }

        fn stamp_scf_crc(&mut self, frame: &mut [u8], len: usize) -> Result<()> {
            assert_eq!(len, ADR_FRAME_LEN);
            // Tag the gap with the encoder sequence so tests can see whose
            // CRC landed where.
            let gap = ANCILLARY_OFFSET + SCF_CRC_OFFSET;
            frame[gap..gap + 4].copy_from_slice(&[0xC0, 0xC1, 0xC2, self.sequence]);
            Ok(())
        }
    }

    fn pipeline(encoder: TestEncoder, scf_crc: bool) -> AdrEncoder<TestEncoder> {
        let charset = EbuCharset::new();
        let identity = StationIdentity::new("TEST", &charset).unwrap();
        AdrEncoder::new(encoder, identity, ChannelMode::JointStereo, scf_crc).unwrap()
    }

    fn silence() -> Vec<i16> {
        vec![0i16; SAMPLES_PER_FRAME * 2]
    }

    #[test]
    fn test_immediate_emission_without_scf_crc() {
        let mut enc = pipeline(TestEncoder::immediate(), false);
        let pcm = silence();

        for n in 0..42u8 {
            let frame = enc.encode(&pcm).unwrap().expect("frame ready");
            assert_eq!(frame.len(), ADR_FRAME_LEN);
            assert_eq!(frame[0], n, "frames must come out in input order");

            let data = extract_ancillary(frame).unwrap();
            assert!(!AncillaryFlags::from_data(&data).scf_crc);
        }

        assert_eq!(enc.frames_produced(), 42);
        assert!(enc.finish().unwrap().is_none());
    }

    #[test]
    fn test_one_frame_delay_with_scf_crc() {
        let mut enc = pipeline(TestEncoder::immediate(), true);
        let pcm = silence();

        // Frame 0 is held back until frame 1 finalizes its CRC.
        assert!(enc.encode(&pcm).unwrap().is_none());

        for n in 0..4u8 {
            let frame = enc.encode(&pcm).unwrap().expect("previous frame ready");
            assert_eq!(frame[0], n);

            // The emitted frame carries the CRC stamped for its successor.
            let gap = ANCILLARY_OFFSET + SCF_CRC_OFFSET;
            assert_eq!(frame[gap + 3], n + 2);

            let data = extract_ancillary(frame).unwrap();
            assert!(AncillaryFlags::from_data(&data).scf_crc);
        }

        // 5 frames produced, 4 emitted; nothing buffered in the encoder so
        // the flush ends the stream without emitting the held frame.
        assert_eq!(enc.frames_produced(), 5);
        assert!(enc.finish().unwrap().is_none());
        assert!(enc.finish().unwrap().is_none());
    }

    #[test]
    fn test_flush_releases_final_buffered_frame() {
        let mut enc = pipeline(TestEncoder::buffering(), true);
        let pcm = silence();

        // First input block is swallowed by encoder buffering.
        assert!(enc.encode(&pcm).unwrap().is_none());
        // Second block yields frame 0, which the scheduler holds back.
        assert!(enc.encode(&pcm).unwrap().is_none());

        let mut emitted = Vec::new();
        for _ in 0..3 {
            emitted.push(enc.encode(&pcm).unwrap().expect("frame")[0]);
        }

        // The flush drains the buffered block as the final frame, which
        // releases the previously held frame exactly once.
        emitted.push(enc.finish().unwrap().expect("final frame")[0]);
        assert!(enc.finish().unwrap().is_none());

        assert_eq!(emitted, [0, 1, 2, 3]);
        assert_eq!(enc.frames_produced(), 5);
    }

    #[test]
    fn test_transient_zero_byte_encode_is_not_fatal() {
        let mut enc = pipeline(TestEncoder::buffering(), false);
        let pcm = silence();

        assert!(enc.encode(&pcm).unwrap().is_none());
        assert_eq!(enc.frames_produced(), 0);

        assert!(enc.encode(&pcm).unwrap().is_some());
        assert_eq!(enc.frames_produced(), 1);
    }

    #[test]
    fn test_control_bytes_cycle_across_frames() {
        let mut enc = pipeline(TestEncoder::immediate(), false);
        let pcm = silence();

        let first = enc.encode(&pcm).unwrap().unwrap().to_vec();
        let second = enc.encode(&pcm).unwrap().unwrap().to_vec();

        let data = extract_ancillary(&first).unwrap();
        assert_eq!(&data[15..], &[0x02, 0x11, 0x04]);

        // Checksum digits and terminator of the DC1 message.
        let data = extract_ancillary(&second).unwrap();
        assert_eq!(&data[15..], &[b'7', b'1', 0x03]);
    }
}
