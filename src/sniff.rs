//! Image format sniffing.
//!
//! A [`FormatSniffer`] inspects response bytes and reports the encoded format
//! by name, ignoring whatever extension the URL carries. [`ImageSniffer`]
//! keeps a registry of [`ImageFormat`]s: the format is guessed from the magic
//! bytes, rejected if it is not registered, and then fully decoded so that
//! truncated or corrupt payloads are reported as decode failures.

use image::ImageFormat;
use thiserror::Error;

/// Formats registered by [`ImageSniffer::default`].
pub const DEFAULT_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif];

/// Errors returned when bytes cannot be identified as a registered format.
#[derive(Debug, Error)]
pub enum SniffError {
    /// No known image signature matched.
    #[error("unknown image format")]
    UnknownFormat,

    /// The signature matched a format that has no registered decoder.
    #[error("image format {format} is not registered")]
    Unregistered {
        /// Name of the detected but unregistered format.
        format: &'static str,
    },

    /// The signature matched a registered format but decoding failed.
    #[error("failed to decode {format} image: {source}")]
    Decode {
        /// Name of the format whose decoder failed.
        format: &'static str,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}

impl SniffError {
    /// Returns the format name when the registry recognized the signature.
    ///
    /// Only [`SniffError::Decode`] carries a determined format; the other
    /// variants mean no registered format was identified.
    #[must_use]
    pub fn detected_format(&self) -> Option<&'static str> {
        match self {
            Self::Decode { format, .. } => Some(format),
            Self::UnknownFormat | Self::Unregistered { .. } => None,
        }
    }
}

/// Identifies the encoded format of a byte buffer.
pub trait FormatSniffer: Send + Sync {
    /// Returns the lower-case format name of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns a [`SniffError`] if the bytes are not a decodable image in a
    /// registered format.
    fn sniff(&self, bytes: &[u8]) -> Result<String, SniffError>;

    /// Returns true if `format` is a name this sniffer can report.
    fn supports(&self, format: &str) -> bool;
}

/// [`FormatSniffer`] backed by the `image` crate's decoders.
#[derive(Debug, Clone)]
pub struct ImageSniffer {
    formats: Vec<ImageFormat>,
}

impl Default for ImageSniffer {
    fn default() -> Self {
        Self::with_formats(DEFAULT_FORMATS)
    }
}

impl ImageSniffer {
    /// Creates a sniffer with an explicit decoder registry.
    #[must_use]
    pub fn with_formats(formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        let mut registry = Vec::new();
        for format in formats {
            if !registry.contains(&format) {
                registry.push(format);
            }
        }
        Self { formats: registry }
    }
}

impl FormatSniffer for ImageSniffer {
    fn sniff(&self, bytes: &[u8]) -> Result<String, SniffError> {
        let format = image::guess_format(bytes).map_err(|_| SniffError::UnknownFormat)?;
        let name = format_name(format);

        if !self.formats.contains(&format) {
            return Err(SniffError::Unregistered { format: name });
        }

        image::load_from_memory_with_format(bytes, format)
            .map_err(|source| SniffError::Decode {
                format: name,
                source,
            })?;

        Ok(name.to_string())
    }

    fn supports(&self, format: &str) -> bool {
        self.formats.iter().any(|f| format_name(*f) == format)
    }
}

/// Canonical lower-case name for an image format.
#[must_use]
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

/// Encodes a small blank image, for tests that need real image bytes.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn encode_fixture(format: ImageFormat) -> Vec<u8> {
    use image::{DynamicImage, RgbImage, RgbaImage};

    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(RgbImage::new(4, 4)),
        _ => DynamicImage::ImageRgba8(RgbaImage::new(4, 4)),
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}
