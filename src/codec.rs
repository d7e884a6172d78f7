//! Fixed-width and length-prefixed primitives for the persisted page format.
//!
//! All integers are little-endian. Strings are a `u32` byte length followed by
//! the raw bytes. Lengths read back from storage are untrusted: string payloads
//! above [`MAX_STRING_BYTES`] are dropped, and short payloads are zero-filled
//! rather than failing the surrounding page.

use std::io::{self, Read, Write};

use crate::error::CodecError;

/// Largest string payload accepted on read.
pub const MAX_STRING_BYTES: usize = 64 * 1024;

pub fn write_u8<W: Write + ?Sized>(w: &mut W, value: u8) -> Result<(), CodecError> {
    w.write_all(&[value])?;
    Ok(())
}

pub fn write_bool<W: Write + ?Sized>(w: &mut W, value: bool) -> Result<(), CodecError> {
    write_u8(w, value as u8)
}

pub fn write_u16<W: Write + ?Sized>(w: &mut W, value: u16) -> Result<(), CodecError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_i16<W: Write + ?Sized>(w: &mut W, value: i16) -> Result<(), CodecError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_u32<W: Write + ?Sized>(w: &mut W, value: u32) -> Result<(), CodecError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_i32<W: Write + ?Sized>(w: &mut W, value: i32) -> Result<(), CodecError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Write a `u16` count, failing when `count` does not fit.
pub fn write_count<W: Write + ?Sized>(
    w: &mut W,
    kind: &'static str,
    count: usize,
) -> Result<(), CodecError> {
    let value = u16::try_from(count).map_err(|_| CodecError::CountOverflow {
        kind,
        actual: count,
        limit: u16::MAX as usize,
    })?;
    write_u16(w, value)
}

/// Fail when a string payload is larger than readers accept.
pub fn check_str_len(value: &str) -> Result<(), CodecError> {
    if value.len() > MAX_STRING_BYTES {
        return Err(CodecError::CountOverflow {
            kind: "string bytes",
            actual: value.len(),
            limit: MAX_STRING_BYTES,
        });
    }
    Ok(())
}

/// Write a length-prefixed string.
///
/// Payloads above [`MAX_STRING_BYTES`] are rejected before anything is
/// written.
pub fn write_str<W: Write + ?Sized>(w: &mut W, value: &str) -> Result<(), CodecError> {
    check_str_len(value)?;
    write_u32(w, value.len() as u32)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

fn read_array<R: Read + ?Sized, const N: usize>(r: &mut R) -> Result<[u8; N], CodecError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u8<R: Read + ?Sized>(r: &mut R) -> Result<u8, CodecError> {
    Ok(read_array::<R, 1>(r)?[0])
}

pub fn read_bool<R: Read + ?Sized>(r: &mut R) -> Result<bool, CodecError> {
    Ok(read_u8(r)? != 0)
}

pub fn read_u16<R: Read + ?Sized>(r: &mut R) -> Result<u16, CodecError> {
    Ok(u16::from_le_bytes(read_array(r)?))
}

pub fn read_i16<R: Read + ?Sized>(r: &mut R) -> Result<i16, CodecError> {
    Ok(i16::from_le_bytes(read_array(r)?))
}

pub fn read_u32<R: Read + ?Sized>(r: &mut R) -> Result<u32, CodecError> {
    Ok(u32::from_le_bytes(read_array(r)?))
}

pub fn read_i32<R: Read + ?Sized>(r: &mut R) -> Result<i32, CodecError> {
    Ok(i32::from_le_bytes(read_array(r)?))
}

/// Read up to `buf.len()` bytes, stopping early only at end of stream.
fn read_fill<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Read a length-prefixed string.
///
/// An oversized length yields an empty string without consuming the payload.
/// A payload cut short by end of stream keeps the bytes that arrived and
/// zero-fills the rest. Bytes that are not UTF-8 are decoded lossily.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<String, CodecError> {
    let len = read_u32(r)? as usize;
    if len > MAX_STRING_BYTES {
        log::warn!(
            "read_string: length {} exceeds maximum {}, truncating",
            len,
            MAX_STRING_BYTES
        );
        return Ok(String::new());
    }

    let mut buf = vec![0u8; len];
    let got = read_fill(r, &mut buf)?;
    if got < len {
        log::warn!("read_string: partial read {}/{} bytes", got, len);
    }

    match String::from_utf8(buf) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::warn!("read_string: {} bytes are not valid UTF-8", len);
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}
