//! Data structures representing ADR format components.
//!
//! - **Ancillary data** ([`ancillary`]): per-frame region layout, flags and
//!   interleaved insertion
//! - **Control messages** ([`message`]): the rotating DC1/DC4/SYN cycle
//! - **Station identity** ([`identity`]): the fixed 32-byte identity buffer

pub mod ancillary;
pub mod identity;
pub mod message;
