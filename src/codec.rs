//! Session token encoding.
//!
//! A token is the [`Session`] serialized as a MessagePack map keyed by
//! single-character tags, then base64url-encoded without padding. Decoding
//! accepts tokens with or without padding, ignores tags it does not know
//! (tokens minted by a newer issuer) and defaults missing ones.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use rmp::Marker;

use crate::error::Error;
use crate::session::Session;

/// Serializes a session into a URL-safe token.
///
/// # Errors
///
/// Returns [`Error::Encode`] if MessagePack serialization fails. Every field
/// is a plain string, integer or string list, so this does not happen in
/// practice.
pub fn encode(session: &Session) -> Result<String, Error> {
    let bytes = rmp_serde::to_vec_named(session).map_err(|e| Error::Encode(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Parses a token produced by [`encode`].
///
/// The returned session is built from scratch: nothing survives from any
/// previously decoded value.
///
/// # Errors
///
/// Returns [`Error::Decode`] on malformed base64, a payload that is not a
/// MessagePack map, or a malformed map.
pub fn decode(token: &str) -> Result<Session, Error> {
    let bytes = URL_SAFE
        .decode(repad(token))
        .map_err(|e| Error::Decode(format!("invalid base64: {e}")))?;

    // rmp_serde would otherwise fill struct fields positionally from an array.
    match bytes.first().map(|&b| Marker::from_u8(b)) {
        Some(Marker::FixMap(_) | Marker::Map16 | Marker::Map32) => {}
        Some(marker) => {
            return Err(Error::Decode(format!("payload is not a map: {marker:?}")));
        }
        None => return Err(Error::Decode("empty payload".into())),
    }

    rmp_serde::from_slice(&bytes)
        .map_err(|e| Error::Decode(format!("invalid payload ({} bytes): {e}", bytes.len())))
}

fn repad(token: &str) -> String {
    let mut padded = token.to_owned();
    let rem = padded.len() % 4;
    if rem > 0 {
        padded.extend(std::iter::repeat_n('=', 4 - rem));
    }
    padded
}

impl Session {
    /// See [`codec::encode`](encode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, Error> {
        encode(self)
    }

    /// See [`codec::decode`](decode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the token is malformed.
    pub fn decode(token: &str) -> Result<Self, Error> {
        decode(token)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::session::Names;

    fn full_session() -> Session {
        Session::new("alice", "Alice", 1_700_000_000)
            .with_id("64f0c2")
            .with_avatar("https://cdn.example.com/a/alice.png")
            .with_tenant_id(12)
            .with_roles(vec!["admin".to_string(), "editor".to_string()])
            .with_watching(vec!["release".to_string()])
    }

    fn token_from_bytes(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    #[test]
    fn roundtrip_full_session() {
        let session = full_session();
        let token = encode(&session).unwrap();
        assert_eq!(decode(&token).unwrap(), session);
    }

    #[test]
    fn roundtrip_minimal_session() {
        let session = Session::new("bob", "", 0);
        let decoded = decode(&encode(&session).unwrap()).unwrap();
        assert_eq!(decoded, session);
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.avatar, None);
        assert_eq!(decoded.tenant_id, None);
        assert!(decoded.roles.is_empty());
        assert!(decoded.watching.is_empty());
    }

    #[test]
    fn roundtrip_each_field() {
        let base = Session::new("u1", "", 0);
        let cases = [
            base.clone().with_id("id-1"),
            Session::new("someone@example.com", "", 0),
            Session::new("u1", "Ünïcødé Name", 0),
            base.clone().with_avatar("/avatars/1.png"),
            Session::new("u1", "", -5),
            Session::new("u1", "", i64::MAX),
            base.clone().with_tenant_id(i64::MIN),
            base.clone()
                .with_roles(vec!["a".to_string(), "b".to_string(), "a".to_string()]),
            base.clone().with_watching(vec!["x".to_string()]),
        ];
        for session in cases {
            let token = encode(&session).unwrap();
            assert_eq!(decode(&token).unwrap(), session, "token {token}");
        }
    }

    #[test]
    fn token_is_url_safe_and_unpadded() {
        let token = encode(&full_session()).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token should be URL-safe: {token}"
        );
    }

    #[test]
    fn decode_accepts_padded_token() {
        let session = full_session();
        let token = encode(&session).unwrap();
        let padded = repad(&token);
        assert_eq!(padded.len() % 4, 0);
        assert_eq!(decode(&padded).unwrap(), session);
    }

    #[test]
    fn repad_to_multiple_of_four() {
        assert_eq!(repad(""), "");
        assert_eq!(repad("ab"), "ab==");
        assert_eq!(repad("abc"), "abc=");
        assert_eq!(repad("abcd"), "abcd");
    }

    #[test]
    fn uses_single_character_tags() {
        let bytes = rmp_serde::to_vec_named(&full_session()).unwrap();
        // fixmap header for 8 entries, then key "i" (fixstr of length 1)
        assert_eq!(&bytes[..3], &[0x88, 0xa1, b'i']);
        assert!(!bytes.windows(7).any(|w| w == b"subject"));
    }

    #[test]
    fn decodes_legacy_fixed_layout() {
        // Issuers that always write all eight tags, with empty optionals.
        let parts: [&[u8]; 9] = [
            &[0x88],
            &[0xa1, b'i', 0xa0],
            &[0xa1, b'u', 0xa5, b'a', b'l', b'i', b'c', b'e'],
            &[0xa1, b'n', 0xa5, b'A', b'l', b'i', b'c', b'e'],
            &[0xa1, b'a', 0xa0],
            &[0xa1, b'h', 0xd2, 0x65, 0x53, 0xf1, 0x00],
            &[0xa1, b't', 0x00],
            &[0xa1, b'r', 0x91, 0xa5, b'a', b'd', b'm', b'i', b'n'],
            &[0xa1, b'w', 0x90],
        ];
        let bytes = parts.concat();

        let session = decode(&token_from_bytes(&bytes)).unwrap();
        assert_eq!(session.subject, "alice");
        assert_eq!(session.display_name, "Alice");
        assert_eq!(session.last_activity, 1_700_000_000);
        assert_eq!(session.id.as_deref(), Some(""));
        assert_eq!(session.tenant_id, Some(0));
        assert_eq!(session.roles, Names::from(vec!["admin".to_string()]));
        assert!(session.watching.is_empty());
    }

    #[test]
    fn unknown_tags_are_skipped() {
        #[derive(Serialize)]
        struct NewerSession {
            #[serde(rename = "u")]
            subject: String,
            #[serde(rename = "x")]
            scopes: Vec<String>,
            #[serde(rename = "n")]
            display_name: String,
            #[serde(rename = "z")]
            nested: std::collections::BTreeMap<String, i64>,
        }

        let newer = NewerSession {
            subject: "alice".into(),
            scopes: vec!["read".into(), "write".into()],
            display_name: "Alice".into(),
            nested: [("k".to_string(), 1)].into_iter().collect(),
        };
        let bytes = rmp_serde::to_vec_named(&newer).unwrap();

        let session = decode(&token_from_bytes(&bytes)).unwrap();
        assert_eq!(session.subject, "alice");
        assert_eq!(session.display_name, "Alice");
    }

    #[test]
    fn missing_tags_default() {
        #[derive(Serialize)]
        struct OnlySubject {
            #[serde(rename = "u")]
            subject: String,
        }

        let bytes = rmp_serde::to_vec_named(&OnlySubject {
            subject: "alice".into(),
        })
        .unwrap();

        let session = decode(&token_from_bytes(&bytes)).unwrap();
        assert_eq!(session, Session::new("alice", "", 0));
    }

    #[test]
    fn nil_optionals_decode_as_none() {
        let parts: [&[u8]; 3] = [&[0x82], &[0xa1, b'u', 0xa1, b'x'], &[0xa1, b'a', 0xc0]];
        let bytes = parts.concat();
        let session = decode(&token_from_bytes(&bytes)).unwrap();
        assert_eq!(session.subject, "x");
        assert_eq!(session.avatar, None);
    }

    #[test]
    fn malformed_base64_is_rejected() {
        for token in ["!!!!", "abc$", "a"] {
            let err = decode(token).unwrap_err();
            assert!(matches!(err, Error::Decode(_)), "{token}: {err}");
        }
    }

    #[test]
    fn malformed_payload_is_rejected() {
        // Empty payload, truncated map, and a bare string instead of a map.
        let payloads: [&[u8]; 3] = [
            &[],
            &[0x88, 0xa1, b'u'],
            &[0xa5, b'h', b'e', b'l', b'l', b'o'],
        ];
        for bytes in payloads {
            let err = decode(&token_from_bytes(bytes)).unwrap_err();
            assert!(matches!(err, Error::Decode(_)), "{bytes:?}: {err}");
        }
    }

    #[test]
    fn array_payload_is_rejected() {
        // Positional layouts: ["id", "alice"], [] and the array form of a full session.
        let positional = rmp_serde::to_vec(&full_session()).unwrap();
        let payloads: [&[u8]; 3] = [
            &[0x92, 0xa2, b'i', b'd', 0xa5, b'a', b'l', b'i', b'c', b'e'],
            &[0x90],
            &positional,
        ];
        for bytes in payloads {
            let err = decode(&token_from_bytes(bytes)).unwrap_err();
            assert!(matches!(err, Error::Decode(_)), "{bytes:?}: {err}");
        }
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        // "h" must be an integer.
        let bytes = [0x81, 0xa1, b'h', 0xa2, b'n', b'o'];
        assert!(matches!(
            decode(&token_from_bytes(&bytes)),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn method_forms_match_free_functions() {
        let session = full_session();
        let token = session.encode().unwrap();
        assert_eq!(token, encode(&session).unwrap());
        assert_eq!(Session::decode(&token).unwrap(), session);
    }
}
