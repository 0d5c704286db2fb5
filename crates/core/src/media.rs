//! Helpers for turning uploads into payloads that can be embedded in JSON.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use image::ImageFormat;

/// File extensions accepted as uploads.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The MIME type of every image embedded in a request.
#[inline]
pub fn image_mime_type() -> String {
    mime::IMAGE_PNG.to_string()
}

/// The kind of a media error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bytes are not an image in a supported format.
    InvalidImage,
    /// The text is not valid base64.
    InvalidEncoding,
}

/// Describes why an upload could not be turned into a payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaError {
    kind: ErrorKind,
    reason: String,
}

impl MediaError {
    fn new(kind: ErrorKind, reason: impl Display) -> Self {
        Self {
            kind,
            reason: reason.to_string(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidImage => write!(f, "invalid image: {}", self.reason),
            ErrorKind::InvalidEncoding => {
                write!(f, "invalid base64: {}", self.reason)
            }
        }
    }
}

impl StdError for MediaError {}

/// Returns `true` if the file name has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_upload(name: &str) -> bool {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return false;
    };
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| extension.eq_ignore_ascii_case(supported))
}

/// Decodes a raster image in any supported format and re-encodes it as PNG.
pub fn encode_png(bytes: &[u8]) -> Result<Bytes, MediaError> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| MediaError::new(ErrorKind::InvalidImage, err))?;
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| MediaError::new(ErrorKind::InvalidImage, err))?;
    Ok(Bytes::from(buf.into_inner()))
}

/// Encodes bytes with the standard base64 alphabet.
#[inline]
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes a standard base64 string.
pub fn decode_base64(text: &str) -> Result<Bytes, MediaError> {
    BASE64
        .decode(text)
        .map(Bytes::from)
        .map_err(|err| MediaError::new(ErrorKind::InvalidEncoding, err))
}

#[cfg(test)]
pub(crate) mod tests {
    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    pub(crate) fn sample_image(format: ImageFormat, width: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, 2, |x, y| {
            Rgb([(x * 40) as u8, (y * 90) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buf, format)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_encode_png_from_jpeg() {
        let jpeg = sample_image(ImageFormat::Jpeg, 4);
        let png = encode_png(&jpeg).unwrap();
        assert_eq!(
            image::guess_format(&png).unwrap(),
            ImageFormat::Png
        );
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }

    #[test]
    fn test_encode_png_rejects_garbage() {
        let err = encode_png(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(b"evidence"), "ZXZpZGVuY2U=");
        assert_eq!(
            decode_base64("ZXZpZGVuY2U=").unwrap(),
            Bytes::from_static(b"evidence")
        );
        let err = decode_base64("not base64!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEncoding);
    }

    #[test]
    fn test_supported_uploads() {
        assert!(is_supported_upload("scene.png"));
        assert!(is_supported_upload("Scene.JPEG"));
        assert!(is_supported_upload("a.b.jpg"));
        assert!(!is_supported_upload("notes.txt"));
        assert!(!is_supported_upload("png"));
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type(), "image/png");
    }
}
