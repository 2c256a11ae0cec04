/*
 * Created on Fri Mar 5 2021
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

//! Shared byte-stream helpers for fixed-length and obfuscated strings.
//! Every scalar on the wire is little-endian.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Byte value every obfuscated string is XORed with on disk.
pub const XOR_KEY: u8 = 0x01;

/// Read `n` bytes as an UTF-8 string, trimmed at the first NUL.
pub fn read_fixed_string(stream: &mut impl Read, n: usize) -> io::Result<String> {
    let mut buffer = vec![0_u8; n];
    stream.read_exact(&mut buffer)?;

    Ok(decode_trimmed(&buffer))
}

/// Read `n` bytes XORed with [XOR_KEY], trimmed of the decrypted NUL fill.
pub fn read_xored_fixed_string(stream: &mut impl Read, n: usize) -> io::Result<String> {
    let mut buffer = vec![0_u8; n];
    stream.read_exact(&mut buffer)?;

    for byte in buffer.iter_mut() {
        *byte ^= XOR_KEY;
    }

    Ok(decode_trimmed(&buffer))
}

/// Read an u16 length prefix, then that many bytes XORed with [XOR_KEY].
/// No trimming.
pub fn read_xored_lp_string(stream: &mut impl Read) -> io::Result<String> {
    let length = stream.read_u16::<LittleEndian>()?;

    let mut buffer = vec![0_u8; length as usize];
    stream.read_exact(&mut buffer)?;

    for byte in buffer.iter_mut() {
        *byte ^= XOR_KEY;
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the UTF-8 bytes of `value`, NUL-padded to exactly `n` bytes.
/// Fails when the encoded string does not fit.
pub fn write_fixed_string(stream: &mut impl Write, value: &str, n: usize) -> io::Result<()> {
    let bytes = check_fit(value, n)?;

    stream.write_all(bytes)?;
    for _ in bytes.len()..n {
        stream.write_u8(0)?;
    }

    Ok(())
}

/// As [write_fixed_string], but every written byte is XORed with [XOR_KEY].
/// The pad is XORed too so it decrypts back to NUL.
pub fn write_xored_fixed_string(stream: &mut impl Write, value: &str, n: usize) -> io::Result<()> {
    let bytes = check_fit(value, n)?;

    for &byte in bytes {
        stream.write_u8(byte ^ XOR_KEY)?;
    }
    for _ in bytes.len()..n {
        stream.write_u8(XOR_KEY)?;
    }

    Ok(())
}

/// Write an u16 length prefix, then `value` XORed with [XOR_KEY].
pub fn write_xored_lp_string(stream: &mut impl Write, value: &str) -> io::Result<()> {
    let bytes = check_fit(value, u16::MAX as usize)?;

    stream.write_u16::<LittleEndian>(bytes.len() as u16)?;
    for &byte in bytes {
        stream.write_u8(byte ^ XOR_KEY)?;
    }

    Ok(())
}

fn check_fit(value: &str, n: usize) -> io::Result<&[u8]> {
    let bytes = value.as_bytes();
    if bytes.len() > n {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("string does not fit in {} bytes", n)
        ));
    }

    Ok(bytes)
}

fn decode_trimmed(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&byte| byte == 0).unwrap_or(buffer.len());

    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn fixed_string_roundtrip() {
        let mut buffer = Vec::new();
        write_fixed_string(&mut buffer, "hello", 8).unwrap();

        assert_eq!(buffer, b"hello\0\0\0");
        assert_eq!(read_fixed_string(&mut Cursor::new(&buffer), 8).unwrap(), "hello");
    }

    #[test]
    fn fixed_string_too_long() {
        let mut buffer = Vec::new();

        assert!(write_fixed_string(&mut buffer, "overflow", 4).is_err());
    }

    #[test]
    fn xored_fixed_string_roundtrip() {
        let mut buffer = Vec::new();
        write_xored_fixed_string(&mut buffer, "Name", 8).unwrap();

        // Pad bytes carry the key so they decrypt back to NUL.
        assert_eq!(&buffer[4..], &[XOR_KEY; 4]);
        assert_eq!(read_xored_fixed_string(&mut Cursor::new(&buffer), 8).unwrap(), "Name");
    }

    #[test]
    fn xored_lp_string_roundtrip() {
        let mut buffer = Vec::new();
        write_xored_lp_string(&mut buffer, "class_name").unwrap();

        assert_eq!(buffer[0], 10);
        assert_eq!(read_xored_lp_string(&mut Cursor::new(&buffer)).unwrap(), "class_name");
    }

    #[test]
    fn xored_lp_string_empty() {
        let mut buffer = Vec::new();
        write_xored_lp_string(&mut buffer, "").unwrap();

        assert_eq!(buffer, [0, 0]);
        assert_eq!(read_xored_lp_string(&mut Cursor::new(&buffer)).unwrap(), "");
    }
}
