//! Length-prefixed framing: a 4-byte big-endian length, then the body.

use std::io::{self, Read, Write};

/// Largest inbound body accepted by default.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The peer announced (or the caller tried to send) an oversized body.
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },
}

pub fn write_frame<W: Write>(writer: &mut W, body: &[u8]) -> Result<(), FrameError> {
    let len = u32::try_from(body.len()).map_err(|_| FrameError::TooLarge {
        len: body.len(),
        max: u32::MAX as usize,
    })?;
    let mut buf = Vec::with_capacity(4 + body.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(body);
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame. A clean EOF before the header surfaces as
/// `io::ErrorKind::UnexpectedEof`.
pub fn read_frame<R: Read>(reader: &mut R, max_len: usize) -> Result<Vec<u8>, FrameError> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;
    let len = u32::from_be_bytes(header) as usize;
    if len > max_len {
        return Err(FrameError::TooLarge { len, max: max_len });
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_is_big_endian_length() {
        let mut out = Vec::new();
        write_frame(&mut out, b"<FbiXml/>").unwrap();
        assert_eq!(&out[..4], &[0, 0, 0, 9]);
        assert_eq!(&out[4..], b"<FbiXml/>");
    }

    #[test]
    fn reads_back_consecutive_frames() {
        let mut out = Vec::new();
        write_frame(&mut out, b"one").unwrap();
        write_frame(&mut out, b"").unwrap();
        write_frame(&mut out, b"three").unwrap();

        let mut cursor = Cursor::new(out);
        assert_eq!(read_frame(&mut cursor, 16).unwrap(), b"one");
        assert_eq!(read_frame(&mut cursor, 16).unwrap(), b"");
        assert_eq!(read_frame(&mut cursor, 16).unwrap(), b"three");
        match read_frame(&mut cursor, 16).unwrap_err() {
            FrameError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn oversized_frames_are_rejected_before_reading_the_body() {
        let mut cursor = Cursor::new(vec![0, 0, 1, 0]);
        match read_frame(&mut cursor, 255).unwrap_err() {
            FrameError::TooLarge { len, max } => {
                assert_eq!(len, 256);
                assert_eq!(max, 255);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_body_is_an_io_error() {
        let mut cursor = Cursor::new(vec![0, 0, 0, 5, b'a', b'b']);
        assert!(matches!(read_frame(&mut cursor, 16), Err(FrameError::Io(_))));
    }
}
