use crate::gzip::header::{FCOMMENT, FHCRC, FTEXT, GzipHeader};
use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FlagTag {
    #[serde(rename = "FTEXT")]
    Text,
    #[serde(rename = "FHCRC")]
    HeaderCrc,
    #[serde(rename = "FCOMMENT")]
    Comment,
}

impl FlagTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagTag::Text => "FTEXT",
            FlagTag::HeaderCrc => "FHCRC",
            FlagTag::Comment => "FCOMMENT",
        }
    }
}

impl fmt::Display for FlagTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported candidate header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Absolute offset of ID1 in the scanned file.
    pub position: u64,
    pub worker: usize,
    /// MTIME, seconds since the Unix epoch.
    pub mtime: u32,
    pub os: u8,
    pub os_name: &'static str,
    /// Extra field payload as lower-case hex; absent when empty.
    pub extra: Option<String>,
    pub filename: Option<String>,
    pub flags: Vec<FlagTag>,
    pub header_len: u32,
}

impl Finding {
    pub fn from_header(position: u64, worker: usize, h: &GzipHeader<'_>) -> Self {
        let flags = [
            (FTEXT, FlagTag::Text),
            (FHCRC, FlagTag::HeaderCrc),
            (FCOMMENT, FlagTag::Comment),
        ]
        .into_iter()
        .filter(|(bit, _)| h.has_flag(*bit))
        .map(|(_, tag)| tag)
        .collect();
        Self {
            position,
            worker,
            mtime: h.prefix.mtime,
            os: h.prefix.os,
            os_name: h.os_name(),
            extra: h.extra.filter(|x| !x.is_empty()).map(hex::encode),
            filename: h.name.map(|n| String::from_utf8_lossy(n).into_owned()),
            flags,
            header_len: h.header_len,
        }
    }

    /// MTIME as RFC 3339 in UTC.
    pub fn stamp(&self) -> String {
        OffsetDateTime::from_unix_timestamp(self.mtime as i64)
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| self.mtime.to_string())
    }

    /// `os=`, `extra=`, `filename=` and `flag=` labels, in that order.
    pub fn tags(&self) -> Vec<String> {
        let mut out = vec![format!("os={}", self.os_name)];
        if let Some(ref x) = self.extra {
            out.push(format!("extra={x}"));
        }
        if let Some(ref n) = self.filename {
            out.push(format!("filename={n}"));
        }
        out.extend(self.flags.iter().map(|t| format!("flag={t}")));
        out
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos={} stamp={} {}",
            self.position,
            self.stamp(),
            self.tags().join(" ")
        )
    }
}
