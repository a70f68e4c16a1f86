//! Decoding and placement of slide images sent as base64 text.

use crate::common::unit::inches_to_emu;
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::ImageFormat;
use crate::ooxml::pptx::shapes::Geometry;
use base64::Engine;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::io::Cursor;

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Horizontal placement of an image next to bullet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePosition {
    Left,
    #[default]
    Right,
}

impl ImagePosition {
    /// `"left"` means left; anything else, including nothing, means right.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("left") => Self::Left,
            _ => Self::Right,
        }
    }
}

/// Image bytes ready to embed.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Pixel size, when the header could be read
    pub dimensions: Option<(u32, u32)>,
}

/// Drop a data-URI header: everything up to and including the first comma.
pub fn strip_data_uri(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// Decode base64 image data, optionally prefixed with a data-URI header.
pub fn decode_image_data(data: &str) -> Result<DecodedImage> {
    let payload: String = strip_data_uri(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = LENIENT_BASE64
        .decode(payload.as_bytes())
        .map_err(|e| DeckError::Image(format!("invalid base64: {}", e)))?;

    let guessed = image::guess_format(&bytes).ok();
    let format = guessed
        .and_then(ImageFormat::from_image_format)
        .or_else(|| ImageFormat::detect_from_bytes(&bytes))
        .ok_or_else(|| DeckError::Image("unsupported image format".to_string()))?;

    let dimensions = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    Ok(DecodedImage {
        bytes,
        format,
        dimensions,
    })
}

/// The box an image is placed in.
pub fn image_box(has_bullets: bool, position: ImagePosition) -> Geometry {
    if has_bullets {
        let left = match position {
            ImagePosition::Left => 0.5,
            ImagePosition::Right => 5.5,
        };
        Geometry::new(
            inches_to_emu(left),
            inches_to_emu(1.5),
            inches_to_emu(4.0),
            inches_to_emu(3.5),
        )
    } else {
        Geometry::new(
            inches_to_emu(2.0),
            inches_to_emu(1.5),
            inches_to_emu(6.0),
            inches_to_emu(4.5),
        )
    }
}

/// Scale an image of `dimensions` pixels to fit inside `bounds`, keeping its
/// aspect ratio and its top-left corner at the box origin. Unknown or empty
/// dimensions fill the whole box.
pub fn fit_to_box(dimensions: Option<(u32, u32)>, bounds: Geometry) -> Geometry {
    let Some((px_width, px_height)) = dimensions.filter(|(w, h)| *w > 0 && *h > 0) else {
        return bounds;
    };

    let scale = f64::min(
        bounds.width as f64 / px_width as f64,
        bounds.height as f64 / px_height as f64,
    );
    Geometry::new(
        bounds.left,
        bounds.top,
        (px_width as f64 * scale).round() as i64,
        (px_height as f64 * scale).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::fixtures;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_decode_data_uri() {
        let png = fixtures::png_of_size(4, 2);
        let data = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let decoded = decode_image_data(&data).unwrap();
        assert_eq!(decoded.bytes, png);
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.dimensions, Some((4, 2)));
    }

    #[test]
    fn test_decode_plain_and_unpadded() {
        let png = fixtures::tiny_png();
        let encoded = STANDARD.encode(&png);
        let unpadded = encoded.trim_end_matches('=');
        let wrapped = format!("{}\n{}", &unpadded[..10], &unpadded[10..]);

        assert_eq!(decode_image_data(&wrapped).unwrap().bytes, png);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_image_data("not base64 !!"), Err(DeckError::Image(_))));
        let text = STANDARD.encode(b"plain text, not an image");
        assert!(matches!(decode_image_data(&text), Err(DeckError::Image(_))));
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
    }

    #[test]
    fn test_image_box() {
        let right = image_box(true, ImagePosition::Right);
        assert_eq!(right.left, inches_to_emu(5.5));
        assert_eq!(right.width, inches_to_emu(4.0));
        assert_eq!(image_box(true, ImagePosition::Left).left, inches_to_emu(0.5));

        let wide = image_box(false, ImagePosition::Left);
        assert_eq!(wide, Geometry::new(inches_to_emu(2.0), inches_to_emu(1.5), inches_to_emu(6.0), inches_to_emu(4.5)));
    }

    #[test]
    fn test_position_hint() {
        assert_eq!(ImagePosition::from_hint(Some("left")), ImagePosition::Left);
        assert_eq!(ImagePosition::from_hint(Some("center")), ImagePosition::Right);
        assert_eq!(ImagePosition::from_hint(None), ImagePosition::Right);
    }

    #[test]
    fn test_fit_to_box() {
        let bounds = Geometry::new(100, 200, 4000, 3500);

        // Wide image is limited by width
        let fitted = fit_to_box(Some((800, 200)), bounds);
        assert_eq!(fitted, Geometry::new(100, 200, 4000, 1000));

        // Tall image is limited by height
        let fitted = fit_to_box(Some((100, 700)), bounds);
        assert_eq!(fitted, Geometry::new(100, 200, 500, 3500));

        assert_eq!(fit_to_box(None, bounds), bounds);
        assert_eq!(fit_to_box(Some((0, 10)), bounds), bounds);
    }

    /// A fitted image stays inside its box, keeps the box origin and fills
    /// the box along at least one axis.
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_fitted_image_stays_in_box(
                width in 1u32..10000u32,
                height in 1u32..10000u32,
                has_bullets in any::<bool>(),
            ) {
                let bounds = image_box(has_bullets, ImagePosition::Right);
                let fitted = fit_to_box(Some((width, height)), bounds);

                prop_assert_eq!((fitted.left, fitted.top), (bounds.left, bounds.top));
                prop_assert!(fitted.width <= bounds.width);
                prop_assert!(fitted.height <= bounds.height);
                prop_assert!(bounds.width - fitted.width <= 1 || bounds.height - fitted.height <= 1);
            }
        }
    }
}
