//! i3 IPC message framing.
//!
//! Every message, in both directions, is
//!
//! | Bytes  | Content                          |
//! |--------|----------------------------------|
//! | 0..6   | magic `i3-ipc`                   |
//! | 6..10  | payload length, `u32` LE         |
//! | 10..14 | message type, `u32` LE           |
//! | 14..   | payload (UTF-8, JSON for replies) |
//!
//! sway speaks the same protocol.

use std::io::{self, Read, Write};

pub const MAGIC: &[u8; 6] = b"i3-ipc";
pub const HEADER_LEN: usize = 14;

/// Event replies have the high bit set in their type.
const EVENT_BIT: u32 = 1 << 31;

/// Message types used by i3switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    GetTree = 4,
}

/// Errors from reading or writing framed messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid magic {0:?}")]
    BadMagic([u8; 6]),
    #[error("payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Frame `payload` as a message of type `msg_type`.
pub fn encode(msg_type: MessageType, payload: &str) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len());
    buffer.extend_from_slice(MAGIC);
    buffer.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buffer.extend_from_slice(&(msg_type as u32).to_le_bytes());
    buffer.extend_from_slice(payload.as_bytes());
    buffer
}

/// Read one framed message, returning its raw type and payload.
pub fn read_message<R: Read>(reader: &mut R) -> Result<(u32, String), FrameError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    let mut magic = [0u8; 6];
    magic.copy_from_slice(&header[0..6]);
    if &magic != MAGIC {
        return Err(FrameError::BadMagic(magic));
    }
    let mut len = [0u8; 4];
    len.copy_from_slice(&header[6..10]);
    let mut ty = [0u8; 4];
    ty.copy_from_slice(&header[10..14]);

    let mut payload = vec![0u8; u32::from_le_bytes(len) as usize];
    reader.read_exact(&mut payload)?;
    Ok((u32::from_le_bytes(ty), String::from_utf8(payload)?))
}

/// Send a request and wait for the reply of the same type.
///
/// Event messages arriving in between are skipped.
pub fn request<S: Read + Write>(
    stream: &mut S,
    msg_type: MessageType,
    payload: &str,
) -> Result<String, FrameError> {
    stream.write_all(&encode(msg_type, payload))?;
    stream.flush()?;
    loop {
        let (ty, reply) = read_message(stream)?;
        if ty == msg_type as u32 {
            return Ok(reply);
        }
        if ty & EVENT_BIT != 0 {
            log::debug!("skipping event {:#x}", ty);
        } else {
            log::warn!("unexpected reply type {}, expected {}", ty, msg_type as u32);
        }
    }
}
