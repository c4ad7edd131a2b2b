//! Frame processing pipelines.
//!
//! - **Encoding** ([`encode`]): the [`FrameEncoder`](encode::FrameEncoder)
//!   collaborator interface, the two-slot [`FrameScheduler`](encode::FrameScheduler)
//!   and the [`AdrEncoder`](encode::AdrEncoder) pipeline driver.
//! - **Extraction** ([`extract`]): display-only recovery of ancillary data
//!   and control messages from encoded frames.

pub mod encode;
pub mod extract;
