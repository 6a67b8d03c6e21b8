//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so the same pixel data always encodes to
//! the same bytes. Sheet filenames and cache digests are content-hashed, so
//! nondeterministic encoding would defeat both.

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

/// Errors from PNG encoding.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Encode RGBA8 pixel data to an in-memory PNG with fixed settings.
pub fn write_rgba_to_vec(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>, PngError> {
    if width == 0 || height == 0 || data.len() != (width as usize * height as usize * 4) {
        return Err(PngError::InvalidDimensions(width, height));
    }

    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::Default);
        // No filtering for maximum determinism across png crate versions.
        encoder.set_filter(FilterType::NoFilter);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_deterministic() {
        let pixels = vec![128u8; 4 * 4 * 4];
        let a = write_rgba_to_vec(4, 4, &pixels).unwrap();
        let b = write_rgba_to_vec(4, 4, &pixels).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[1..4], b"PNG");
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(matches!(
            write_rgba_to_vec(4, 4, &[0u8; 8]),
            Err(PngError::InvalidDimensions(4, 4))
        ));
        assert!(matches!(
            write_rgba_to_vec(0, 4, &[]),
            Err(PngError::InvalidDimensions(0, 4))
        ));
    }
}
