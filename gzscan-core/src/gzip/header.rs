//! Gzip member header (RFC 1952, section 2.3).
//!
//! ```text
//! +---+---+---+---+---+---+---+---+---+---+
//! |ID1|ID2|CM |FLG|     MTIME     |XFL|OS |   then, by FLG:
//! +---+---+---+---+---+---+---+---+---+---+   XLEN + extra, name\0, comment\0, CRC16
//! ```
//!
//! Only the structure is checked. The header CRC is never verified and the
//! comment string is not extracted (its flag is still reported).

use super::os::{MAX_OS_CODE, os_name};
use thiserror::Error;

/// ID1, ID2 and CM=8 (deflate). CM 0..=7 are reserved, so the method byte is
/// part of the signature.
pub const MAGIC: [u8; 3] = [0x1F, 0x8B, 0x08];
pub const FIXED_LEN: usize = 10;
pub const OS_OFFSET: usize = 9;
/// Fewer bytes than this left in a range ends the scan of that range.
pub const MIN_HEADER_LEN: usize = 32;
pub const MAX_NAME_LEN: usize = 256;
/// Largest header the parser will ever look at: fixed part, a full extra
/// field and a name at the length limit plus its terminator.
pub const MAX_HEADER_LEN: usize = FIXED_LEN + 2 + u16::MAX as usize + MAX_NAME_LEN + 1;

pub const FTEXT: u8 = 0x01;
pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;
pub const RESERVED_FLAGS: u8 = 0xE0;
/// XFL only defines 2 (max compression) and 4 (fastest).
pub const XFL_MASK: u8 = 0x06;

/// Reasons a candidate is not treated as a header. None of these are fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("magic mismatch")]
    BadMagic,

    #[error("reserved flag bits set: {0:#04x}")]
    ReservedFlags(u8),

    #[error("unassigned OS code {0}")]
    UnknownOs(u8),

    #[error("undefined XFL bits set: {0:#04x}")]
    ExtraFlags(u8),

    #[error("name field longer than {} bytes", MAX_NAME_LEN)]
    NameTooLong,

    #[error("declared field runs past the available bytes")]
    Truncated,
}

/// The fixed ten bytes, after the loose sanity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub flags: u8,
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader<'a> {
    pub prefix: Prefix,
    pub extra: Option<&'a [u8]>,
    pub name: Option<&'a [u8]>,
    /// Bytes from ID1 through the name terminator (comment and CRC16 excluded).
    pub header_len: u32,
}

impl GzipHeader<'_> {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.prefix.flags & flag != 0
    }

    pub fn os_name(&self) -> &'static str {
        os_name(self.prefix.os)
    }
}

pub fn check_prefix(window: &[u8]) -> Result<Prefix, HeaderError> {
    if window.len() < FIXED_LEN {
        return Err(HeaderError::Truncated);
    }
    if window[..3] != MAGIC {
        return Err(HeaderError::BadMagic);
    }
    let flags = window[3];
    let mtime = u32::from_le_bytes([window[4], window[5], window[6], window[7]]);
    let extra_flags = window[8];
    let os = window[OS_OFFSET];

    if flags & RESERVED_FLAGS != 0 {
        return Err(HeaderError::ReservedFlags(flags));
    }
    if os > MAX_OS_CODE {
        return Err(HeaderError::UnknownOs(os));
    }
    if extra_flags & !XFL_MASK != 0 {
        return Err(HeaderError::ExtraFlags(extra_flags));
    }
    Ok(Prefix {
        flags,
        mtime,
        extra_flags,
        os,
    })
}

/// Parses the variable part. `tail` starts at the OS byte.
pub fn parse_fields(prefix: Prefix, tail: &[u8]) -> Result<GzipHeader<'_>, HeaderError> {
    let mut rest = tail.get(1..).ok_or(HeaderError::Truncated)?;
    let mut len = FIXED_LEN;

    let extra = if prefix.flags & FEXTRA != 0 {
        let xlen = match rest {
            [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]) as usize,
            _ => return Err(HeaderError::Truncated),
        };
        let body = rest.get(2..2 + xlen).ok_or(HeaderError::Truncated)?;
        rest = &rest[2 + xlen..];
        len += 2 + xlen;
        Some(body)
    } else {
        None
    };

    let name = if prefix.flags & FNAME != 0 {
        let limit = rest.len().min(MAX_NAME_LEN + 1);
        match memchr::memchr(0, &rest[..limit]) {
            Some(end) => {
                let name = &rest[..end];
                len += end + 1;
                Some(name)
            }
            None if rest.len() > MAX_NAME_LEN => return Err(HeaderError::NameTooLong),
            None => return Err(HeaderError::Truncated),
        }
    } else {
        None
    };

    Ok(GzipHeader {
        prefix,
        extra,
        name,
        header_len: len as u32,
    })
}

/// `check_prefix` followed by `parse_fields` over one window.
pub fn parse(window: &[u8]) -> Result<GzipHeader<'_>, HeaderError> {
    let prefix = check_prefix(window)?;
    parse_fields(prefix, &window[OS_OFFSET..])
}
