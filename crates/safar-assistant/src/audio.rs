//! Inbound audio clip decoding.
//!
//! Browsers send recordings as data URLs (`data:audio/webm;base64,...`).
//! Decoding strips the prefix, base64-decodes the payload, and carries
//! the MIME type through to the gateway as an inline part.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AssistantError;

/// Default MIME type when the payload carries no data-URL prefix.
const DEFAULT_MIME_TYPE: &str = "audio/webm";

/// A decoded audio clip ready to attach to a model turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl AudioClip {
    /// Decode a base64 payload, with or without a `data:` URL prefix.
    ///
    /// `data:audio/webm;base64,AAAA` yields MIME `audio/webm`; a bare
    /// base64 string is accepted with the default MIME type.
    pub fn from_base64(raw: &str) -> Result<AudioClip, AssistantError> {
        let (mime_type, payload) = match raw.split_once(',') {
            Some((prefix, payload)) => (parse_mime(prefix), payload),
            None => (DEFAULT_MIME_TYPE.to_string(), raw),
        };

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| AssistantError::AudioDecode(e.to_string()))?;

        if data.is_empty() {
            return Err(AssistantError::AudioDecode(
                "audio payload is empty".to_string(),
            ));
        }

        Ok(AudioClip { mime_type, data })
    }
}

/// Pull the MIME type out of a `data:<mime>;base64` prefix.
fn parse_mime(prefix: &str) -> String {
    prefix
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let raw = format!("data:audio/webm;base64,{}", STANDARD.encode(b"audio-bytes"));
        let clip = AudioClip::from_base64(&raw).unwrap();
        assert_eq!(clip.mime_type, "audio/webm");
        assert_eq!(clip.data, b"audio-bytes");
    }

    #[test]
    fn test_decode_other_mime_type() {
        let raw = format!("data:audio/ogg;codecs=opus;base64,{}", STANDARD.encode(b"x"));
        let clip = AudioClip::from_base64(&raw).unwrap();
        assert_eq!(clip.mime_type, "audio/ogg");
    }

    #[test]
    fn test_decode_bare_base64() {
        let clip = AudioClip::from_base64(&STANDARD.encode(b"plain")).unwrap();
        assert_eq!(clip.mime_type, "audio/webm");
        assert_eq!(clip.data, b"plain");
    }

    #[test]
    fn test_invalid_base64_fails() {
        let err = AudioClip::from_base64("data:audio/webm;base64,!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, AssistantError::AudioDecode(_)));
    }

    #[test]
    fn test_empty_payload_fails() {
        let err = AudioClip::from_base64("data:audio/webm;base64,").unwrap_err();
        assert!(matches!(err, AssistantError::AudioDecode(_)));
    }

    #[test]
    fn test_malformed_prefix_falls_back_to_default_mime() {
        let raw = format!("not-a-data-url,{}", STANDARD.encode(b"x"));
        let clip = AudioClip::from_base64(&raw).unwrap();
        assert_eq!(clip.mime_type, "audio/webm");
    }

    #[test]
    fn test_whitespace_around_payload_tolerated() {
        let raw = format!("data:audio/webm;base64, {} ", STANDARD.encode(b"x"));
        let clip = AudioClip::from_base64(&raw).unwrap();
        assert_eq!(clip.data, b"x");
    }
}
