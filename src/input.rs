use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::Result;

/// Unified input reader that handles both file and pipe input with buffered
/// reading
pub struct InputReader {
    reader: Box<dyn Read>,
}

impl InputReader {
    /// Create a new InputReader from a path
    /// Use "-" for stdin pipe input
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path_str = input_path.as_ref().to_string_lossy();

        let reader: Box<dyn Read> = if path_str == "-" {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(input_path)?;
            Box::new(BufReader::new(file))
        };

        Ok(Self { reader })
    }

    /// Fill `buf` with the next frame, reading across short reads.
    /// Returns the number of bytes read; less than `buf.len()` only at end
    /// of stream, 0 at a clean EOF.
    pub fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;

        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_frame_spans_short_reads() -> Result<()> {
        let mut path = std::env::temp_dir();
        path.push("adrenc_input_test.bin");

        let mut file = File::create(&path)?;
        file.write_all(&[0xAB; 1000])?;
        drop(file);

        let mut reader = InputReader::new(&path)?;
        let mut frame = [0u8; 576];

        assert_eq!(reader.read_frame(&mut frame)?, 576);
        assert_eq!(reader.read_frame(&mut frame)?, 424);
        assert_eq!(reader.read_frame(&mut frame)?, 0);

        std::fs::remove_file(&path)?;
        Ok(())
    }
}
