//! Converts a user-supplied file into an embeddable payload. The core
//! stores the result opaquely; only this module knows it is a data URL.

use std::fmt::{self, Display};

/// Largest accepted image payload, in bytes.
pub const MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The file exceeds [`MAX_BYTES`]; carries the offending size.
    TooLarge(usize),
    /// The bytes are not a recognized image format.
    UnsupportedFormat,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge(size) => {
                let mib = *size as f64 / (1024.0 * 1024.0);
                write!(f, "Image size ({mib:.2} MiB) exceeds the 10 MiB limit.")
            }
            Self::UnsupportedFormat => f.write_str("The file is not a recognized image."),
        }
    }
}

/// Sniffs the image type from its magic bytes.
fn sniff(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Validates the size bound and image format, then encodes the bytes as
/// a base64 data URL.
pub fn ingest(bytes: &[u8]) -> Result<String, Error> {
    if bytes.len() > MAX_BYTES {
        return Err(Error::TooLarge(bytes.len()));
    }
    let mime = sniff(bytes).ok_or(Error::UnsupportedFormat)?;
    Ok(format!("data:{mime};base64,{}", base64::encode(bytes)))
}
