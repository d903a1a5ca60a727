//! Versioned binary framing for standings snapshots.
//!
//! Frame layout: `[version: u8][payload length: u32 BE][bincode payload]`.
//! Both the fast cache and the durable store hold this exact byte string, so a
//! payload written by one tier can always be read back by the other.

use crate::snapshot::Standings;

pub const CODEC_VERSION: u8 = 1;

const HEADER_LEN: usize = 1 + 4;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported snapshot encoding version {0}")]
    UnsupportedVersion(u8),
    #[error("snapshot frame truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("snapshot frame has {0} trailing bytes")]
    TrailingBytes(usize),
    #[error("snapshot payload too large ({0} bytes)")]
    TooLarge(usize),
    #[error("malformed snapshot payload")]
    Malformed(#[from] bincode::Error),
}

pub fn encode(standings: &Standings) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(standings)?;
    let len = u32::try_from(payload.len()).map_err(|_| CodecError::TooLarge(payload.len()))?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.push(CODEC_VERSION);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

pub fn decode(frame: &[u8]) -> Result<Standings, CodecError> {
    if frame.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            expected: HEADER_LEN,
            found: frame.len(),
        });
    }

    let version = frame[0];
    if version != CODEC_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let len = u32::from_be_bytes([frame[1], frame[2], frame[3], frame[4]]) as usize;
    let body = &frame[HEADER_LEN..];
    if body.len() < len {
        return Err(CodecError::Truncated {
            expected: HEADER_LEN + len,
            found: frame.len(),
        });
    }
    if body.len() > len {
        return Err(CodecError::TrailingBytes(body.len() - len));
    }

    Ok(bincode::deserialize(body)?)
}
