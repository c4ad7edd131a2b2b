#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("station identifier must not contain '#'")]
    IdentifierContainsTerminator,

    #[error("control message would overflow the wire buffer: {len} > {cap} bytes")]
    MessageTooLong { len: usize, cap: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("frame too short for the ancillary region: {len} < {expected} bytes")]
    FrameTooShort { len: usize, expected: usize },

    #[error("audio encoder returned an oversized frame: {len} > {cap} bytes")]
    FrameTooLong { len: usize, cap: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("frame too short for the ancillary region: {0} bytes")]
    FrameTooShort(usize),
}
