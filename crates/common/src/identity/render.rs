use crate::identity::EncodingFailure;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Edge length of one QR module in pixels
pub const MODULE_PIXELS: u32 = 10;

/// Media key under which an animal's identity image is stored
pub fn identity_image_key(chip_id: &str) -> String {
    format!("identity_codes/identity_{}.png", chip_id)
}

/// Renders text as a black-on-white QR code PNG with a four-module quiet zone.
///
/// Uses the lowest error-correction level; the symbol version grows with the
/// text and `EncodingFailure::Symbol` is returned when nothing fits.
pub fn render_identity_png(text: &str) -> Result<Vec<u8>, EncodingFailure> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)?;

    let raster = code
        .render::<Luma<u8>>()
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .quiet_zone(true)
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(raster).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_image_key() {
        assert_eq!(
            identity_image_key("123456789012345"),
            "identity_codes/identity_123456789012345.png"
        );
    }

    #[test]
    fn test_render_produces_square_png() {
        let png = render_identity_png(r#"{"chip_id":"123456789012345"}"#).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), decoded.height());
        // Modules plus the 4-module border on each side
        assert_eq!(decoded.width() % MODULE_PIXELS, 0);
        let corner = decoded.to_luma8().get_pixel(0, 0).0[0];
        assert_eq!(corner, 255);
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = r#"{"type":"animal","chip_id":"123456789012345","name":"Ρεξ"}"#;
        assert_eq!(
            render_identity_png(text).unwrap(),
            render_identity_png(text).unwrap()
        );
    }

    #[test]
    fn test_oversized_payload_fails() {
        let text = "x".repeat(4000);
        assert!(matches!(
            render_identity_png(&text),
            Err(EncodingFailure::Symbol(_))
        ));
    }
}
