//! Error types for the umapack codec

/// Errors that can occur while decoding a payload or negotiating compression
///
/// Encoding never surfaces these to the caller: compression problems fall
/// back to the raw payload. The infallible decode entry points turn every
/// error into an empty result after reporting it to the diagnostics sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Payload ended before a required header or fixed block
    UnexpectedEof,
    /// Header byte names a version this decoder does not know
    UnsupportedVersion {
        /// Version byte found in the payload
        found: u8,
    },
    /// Payload is tagged as compressed but no compressor is available
    CompressionUnavailable,
    /// Compressor rejected the input
    CompressionFailed,
    /// Compressed payload could not be inflated
    DecompressionFailed,
    /// Compressed payload inflates past the size limit
    DecompressedTooLarge,
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::UnexpectedEof => "unexpected end of payload",
            Error::UnsupportedVersion { .. } => "unsupported format version",
            Error::CompressionUnavailable => "no compressor available for tagged payload",
            Error::CompressionFailed => "payload compression failed",
            Error::DecompressionFailed => "payload decompression failed",
            Error::DecompressedTooLarge => "decompressed payload exceeds size limit",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnsupportedVersion { found } => {
                write!(f, "{} ({})", self.description(), found)
            }
            _ => f.write_str(self.description()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias for umapack operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_includes_version() {
        let err = Error::UnsupportedVersion { found: 9 };
        assert_eq!(err.to_string(), "unsupported format version (9)");
        assert_eq!(Error::UnexpectedEof.to_string(), "unexpected end of payload");
        assert_eq!(
            Error::DecompressedTooLarge.to_string(),
            "decompressed payload exceeds size limit"
        );
    }
}
