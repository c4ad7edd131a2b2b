//! Station identity buffer.

use log::warn;

use crate::utils::charset::EbuCharset;
use crate::utils::errors::ConfigError;

/// Fixed width of the station identity field in SYN messages.
pub const STATION_ID_LEN: usize = 32;

/// A station identifier as broadcast charset codes.
///
/// Derived once from a UTF-8 string at configuration time; unused trailing
/// bytes are zero. The `'#'` character terminates the identity field on the
/// wire and is therefore rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationIdentity {
    codes: [u8; STATION_ID_LEN],
}

impl Default for StationIdentity {
    fn default() -> Self {
        Self {
            codes: [0; STATION_ID_LEN],
        }
    }
}

impl StationIdentity {
    pub fn new(text: &str, charset: &EbuCharset) -> Result<Self, ConfigError> {
        if text.contains('#') {
            return Err(ConfigError::IdentifierContainsTerminator);
        }

        if text.chars().count() > STATION_ID_LEN {
            warn!("station identifier truncated to {STATION_ID_LEN} characters");
        }

        let mut codes = [0u8; STATION_ID_LEN];
        charset.encode_to(text, &mut codes);

        Ok(Self { codes })
    }

    pub fn codes(&self) -> &[u8; STATION_ID_LEN] {
        &self.codes
    }

    /// The bytes actually transmitted in a SYN message: everything up to
    /// the zero padding.
    pub fn transmitted(&self) -> &[u8] {
        let used = self
            .codes
            .iter()
            .position(|&code| code == 0)
            .unwrap_or(STATION_ID_LEN);

        &self.codes[..used]
    }

    /// Human-readable form, for configuration echoing.
    pub fn display(&self, charset: &EbuCharset) -> String {
        charset.decode(&self.codes)
    }
}
