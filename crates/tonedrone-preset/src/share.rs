//! Share-link transport.
//!
//! A preset travels inside a URL as a base64url token under the `preset`
//! query parameter. The token alphabet is URL-safe and unpadded, so the
//! value needs no percent-encoding. Decoding feeds the serializer, which
//! migrates and validates, so a link minted by an old build loads in a new
//! one.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::PresetError;
use crate::preset::Preset;
use crate::serializer::{deserialize_preset, serialize_preset};

/// Query parameter carrying the encoded preset.
pub const PRESET_QUERY_PARAM: &str = "preset";

/// Base URL used when the caller does not supply one.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://tonedrone.app/";

/// Encodes a preset as a URL-safe token.
///
/// Deterministic: identical preset content yields an identical token. The
/// output never contains `+`, `/` or `=`.
pub fn encode_preset_to_url(preset: &Preset) -> Result<String, PresetError> {
    let text = serialize_preset(preset)?;
    Ok(URL_SAFE_NO_PAD.encode(text.as_bytes()))
}

/// Decodes a token minted by [`encode_preset_to_url`].
///
/// Tolerates tokens that still carry base64 padding. The payload passes
/// through the serializer, so migration and validation apply.
pub fn decode_preset_from_url(token: &str) -> Result<Preset, PresetError> {
    let token = token.trim().trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    let text = String::from_utf8(bytes)?;
    deserialize_preset(&text)
}

/// Pulls the `preset` query parameter out of a URL and decodes it.
///
/// Returns `None` — never an error — when the parameter is absent or its
/// value fails to decode; page load uses this to fall back to a silent
/// no-preset start.
pub fn extract_preset_from_url(url: &str) -> Option<Preset> {
    let token = query_param(url, PRESET_QUERY_PARAM)?;
    decode_preset_from_url(token).ok()
}

/// True iff [`extract_preset_from_url`] would return a preset.
pub fn is_valid_preset_url(url: &str) -> bool {
    extract_preset_from_url(url).is_some()
}

/// Builds a full shareable URL with the encoded preset as the `preset`
/// query parameter.
///
/// Other query parameters on `base_url` are kept; an existing `preset`
/// parameter is replaced rather than duplicated.
pub fn create_shareable_url(
    preset: &Preset,
    base_url: Option<&str>,
) -> Result<String, PresetError> {
    let token = encode_preset_to_url(preset)?;
    let base = base_url.unwrap_or(DEFAULT_SHARE_BASE_URL);

    let (path, query) = match base.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (base, None),
    };

    let mut params: Vec<String> = Vec::new();
    if let Some(query) = query {
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let key = pair.split_once('=').map_or(pair, |(key, _)| key);
            if key != PRESET_QUERY_PARAM {
                params.push(pair.to_string());
            }
        }
    }
    params.push(format!("{}={}", PRESET_QUERY_PARAM, token));

    Ok(format!("{}?{}", path, params.join("&")))
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, rest) = url.split_once('?')?;
    let query = match rest.split_once('#') {
        Some((query, _)) => query,
        None => rest,
    };

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if key == name {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{PresetState, DEFAULT_BPM, PRESET_VERSION};
    use crate::serializer::create_preset;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_round_trip() {
        let preset = create_preset("Shared drone", PresetState::default());
        let token = encode_preset_to_url(&preset).unwrap();
        let back = decode_preset_from_url(&token).unwrap();
        assert_eq!(preset, back);
    }

    #[test]
    fn test_token_alphabet_is_url_safe() {
        let preset = create_preset("Alphabet check", PresetState::default());
        let token = encode_preset_to_url(&preset).unwrap();
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_distinct_names_produce_distinct_tokens() {
        let mut a = create_preset("Dawn", PresetState::default());
        let mut b = a.clone();
        a.metadata.name = "Dawn".to_string();
        b.metadata.name = "Dusk".to_string();

        let token_a = encode_preset_to_url(&a).unwrap();
        let token_b = encode_preset_to_url(&b).unwrap();
        assert_ne!(token_a, token_b);

        assert_eq!(decode_preset_from_url(&token_a).unwrap().metadata.name, "Dawn");
        assert_eq!(decode_preset_from_url(&token_b).unwrap().metadata.name, "Dusk");
    }

    #[test]
    fn test_padded_tokens_still_decode() {
        let preset = create_preset("Padded", PresetState::default());
        let token = encode_preset_to_url(&preset).unwrap();
        let padded = format!("{}{}", token, "=".repeat((4 - token.len() % 4) % 4));
        assert_eq!(decode_preset_from_url(&padded).unwrap(), preset);
    }

    #[test]
    fn test_malformed_token_is_a_decode_error() {
        assert!(matches!(
            decode_preset_from_url("!!! not base64 !!!"),
            Err(PresetError::Base64(_))
        ));
    }

    #[test]
    fn test_historical_payload_migrates_through_decode() {
        let preset = create_preset("Old link", PresetState::default());
        let mut doc = serde_json::to_value(&preset).unwrap();
        doc["version"] = serde_json::json!(2);
        doc["state"].as_object_mut().unwrap().remove("bpm");

        let token = URL_SAFE_NO_PAD.encode(doc.to_string().as_bytes());
        let decoded = decode_preset_from_url(&token).unwrap();
        assert_eq!(decoded.version, PRESET_VERSION);
        assert_eq!(decoded.state.bpm, DEFAULT_BPM);
    }

    #[test]
    fn test_extract_from_url() {
        let preset = create_preset("Linked", PresetState::default());
        let url = create_shareable_url(&preset, None).unwrap();

        assert!(url.starts_with(DEFAULT_SHARE_BASE_URL));
        let extracted = extract_preset_from_url(&url).unwrap();
        assert_eq!(extracted, preset);
        assert!(is_valid_preset_url(&url));
    }

    #[test]
    fn test_extract_never_throws() {
        assert!(extract_preset_from_url("https://tonedrone.app/").is_none());
        assert!(extract_preset_from_url("https://tonedrone.app/?other=1").is_none());
        assert!(extract_preset_from_url("https://tonedrone.app/?preset=garbage").is_none());
        assert!(extract_preset_from_url("not a url at all").is_none());
        assert!(!is_valid_preset_url("https://tonedrone.app/?preset="));
    }

    #[test]
    fn test_shareable_url_replaces_existing_preset_param() {
        let preset = create_preset("Replacer", PresetState::default());
        let url = create_shareable_url(
            &preset,
            Some("https://tonedrone.app/?preset=stale&theme=dark"),
        )
        .unwrap();

        assert_eq!(url.matches("preset=").count(), 1);
        assert!(url.contains("theme=dark"));
        assert_eq!(extract_preset_from_url(&url).unwrap(), preset);
    }

    #[test]
    fn test_fragment_does_not_leak_into_param() {
        let preset = create_preset("Fragment", PresetState::default());
        let token = encode_preset_to_url(&preset).unwrap();
        let url = format!("https://tonedrone.app/?preset={}#section", token);
        assert_eq!(extract_preset_from_url(&url).unwrap(), preset);
    }
}
