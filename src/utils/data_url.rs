//! `data:<mime>;base64,<payload>` URLs used to carry photos inline in JSON.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("value is not a data URL")]
    MissingScheme,

    #[error("data URL has no payload separator")]
    MissingPayload,

    #[error("data URL must be base64 encoded")]
    NotBase64,

    #[error("expected an image, found '{0}'")]
    NotImage(String),

    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Borrowed view of a parsed data URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(value: &'a str) -> Result<Self, DataUrlError> {
        let rest = value.strip_prefix(SCHEME).ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
        let mime = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(DataUrlError::NotBase64)?;
        Ok(Self { mime, payload })
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| DataUrlError::InvalidPayload(e.to_string()))
    }
}

/// Checks that `value` is a base64 image data URL with a decodable payload.
pub fn validate_image_data_url(value: &str) -> Result<(), DataUrlError> {
    let url = DataUrl::parse(value)?;
    if !url.is_image() {
        return Err(DataUrlError::NotImage(url.mime.to_string()));
    }
    url.decode().map(|_| ())
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("{SCHEME}{mime}{BASE64_MARKER},{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png_data_url() {
        let url = DataUrl::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(url.payload, "iVBORw0KGgo=");
        assert!(url.is_image());
        assert_eq!(url.decode().unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_encode_then_validate() {
        let encoded = encode_data_url("image/jpeg", &[0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(encoded, "data:image/jpeg;base64,/9j/4A==");
        assert_eq!(validate_image_data_url(&encoded), Ok(()));
    }

    #[test]
    fn test_rejects_malformed_urls() {
        assert_eq!(
            validate_image_data_url("https://example.com/photo.png"),
            Err(DataUrlError::MissingScheme)
        );
        assert_eq!(
            validate_image_data_url("data:image/png;base64"),
            Err(DataUrlError::MissingPayload)
        );
        assert_eq!(
            validate_image_data_url("data:image/png,rawbytes"),
            Err(DataUrlError::NotBase64)
        );
        assert_eq!(
            validate_image_data_url("data:text/plain;base64,aGk="),
            Err(DataUrlError::NotImage("text/plain".to_string()))
        );
        assert!(matches!(
            validate_image_data_url("data:image/png;base64,@@@"),
            Err(DataUrlError::InvalidPayload(_))
        ));
    }
}
