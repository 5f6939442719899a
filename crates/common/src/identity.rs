//! Animal identity codes: payload derivation, text encoding, scan parsing and
//! QR rendering. Everything here is pure; storage of the rendered image is the
//! caller's concern.

mod payload;
mod render;
mod scan;

pub use payload::*;
pub use render::*;
pub use scan::*;

use thiserror::Error;

/// Identity image generation failure. Never surfaced to callers of a record
/// save; the record simply stays without an image.
#[derive(Error, Debug)]
pub enum EncodingFailure {
    #[error("identity payload rejected: {0}")]
    Payload(String),

    #[error("identity payload could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("QR symbol could not be built: {0}")]
    Symbol(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Raster(#[from] image::ImageError),

    #[error("identity image could not be stored: {0}")]
    Storage(anyhow::Error),
}

/// Rendered identity image ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub key: String,
    pub payload_text: String,
    pub png: bytes::Bytes,
}

/// Builds the payload for an animal and renders its identity image.
/// The animal must have a persisted key and a non-empty chip id.
pub fn encode_identity(
    animal: &crate::domain::Animal,
    settings: &IdentitySettings,
) -> Result<EncodedImage, EncodingFailure> {
    if animal.id <= 0 {
        return Err(EncodingFailure::Payload(
            "animal has no persisted key".to_string(),
        ));
    }
    let chip_id = animal.chip_id.trim();
    if chip_id.is_empty() {
        return Err(EncodingFailure::Payload("animal has no chip id".to_string()));
    }

    let payload_text = IdentityPayload::from_animal(animal, settings).to_text()?;
    let png = render_identity_png(&payload_text)?;

    Ok(EncodedImage {
        key: identity_image_key(chip_id),
        payload_text,
        png: bytes::Bytes::from(png),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_animal;

    #[test]
    fn test_encode_identity_round_trips_chip_id() {
        let animal = sample_animal(12, "987654321098765");
        let encoded = encode_identity(&animal, &IdentitySettings::default()).unwrap();

        assert_eq!(encoded.key, "identity_codes/identity_987654321098765.png");
        assert_eq!(parse_scan(&encoded.payload_text).chip_id(), "987654321098765");
    }

    #[test]
    fn test_encode_identity_twice_is_identical() {
        let animal = sample_animal(12, "987654321098765");
        let settings = IdentitySettings::new(Some("shelter.example.org"), None);
        let first = encode_identity(&animal, &settings).unwrap();
        let second = encode_identity(&animal, &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_identity_requires_persisted_key() {
        let animal = sample_animal(0, "987654321098765");
        assert!(matches!(
            encode_identity(&animal, &IdentitySettings::default()),
            Err(EncodingFailure::Payload(_))
        ));
    }

    #[test]
    fn test_encode_identity_requires_chip_id() {
        let animal = sample_animal(3, "  ");
        assert!(matches!(
            encode_identity(&animal, &IdentitySettings::default()),
            Err(EncodingFailure::Payload(_))
        ));
    }
}
