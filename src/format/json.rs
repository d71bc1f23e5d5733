//! JSON wire layout of a package.
//!
//! ```text
//! {"key_derivation":{"salt":"<b64>","iterations":N,"length":N},"nonce":"<b64>","ciphertext":"<b64>"}
//! ```
//!
//! Byte fields use standard base64 with padding and no line wrapping.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use super::{KeyDerivation, Package};
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize)]
struct EnvelopeJson {
    key_derivation: KeyDerivationJson,
    nonce: String,
    ciphertext: String,
}

#[derive(Serialize, Deserialize)]
struct KeyDerivationJson {
    salt: String,
    iterations: u32,
    length: usize,
}

pub(super) fn encode(package: &Package) -> Result<Vec<u8>> {
    let kd = package.key_derivation();
    let envelope = EnvelopeJson {
        key_derivation: KeyDerivationJson {
            salt: STANDARD.encode(kd.salt()),
            iterations: kd.iterations(),
            length: kd.length(),
        },
        nonce: STANDARD.encode(package.nonce()),
        ciphertext: STANDARD.encode(package.ciphertext()),
    };
    serde_json::to_vec(&envelope).map_err(|e| Error::Encode(format!("JSON encoding failed: {e}")))
}

pub(super) fn decode(data: &[u8]) -> Result<Package> {
    let envelope: EnvelopeJson = serde_json::from_slice(data)
        .map_err(|e| Error::Decode(format!("failed to unmarshal JSON: {e}")))?;

    let salt = decode_field("key_derivation.salt", &envelope.key_derivation.salt)?;
    let nonce = decode_field("nonce", &envelope.nonce)?;
    let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;

    Ok(Package::new(
        KeyDerivation::new(
            salt,
            envelope.key_derivation.iterations,
            envelope.key_derivation.length,
        ),
        nonce,
        ciphertext,
    ))
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|_| Error::Decode(format!("field `{name}` is not valid base64")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        Package::new(
            KeyDerivation::new(vec![0xff, 0x00, 0x10], 1_000_000, 32),
            vec![1u8; 12],
            b"ct".to_vec(),
        )
    }

    #[test]
    fn layout_is_stable() {
        let json = String::from_utf8(encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"key_derivation":{"salt":"/wAQ","iterations":1000000,"length":32},"nonce":"AQEBAQEBAQEBAQEB","ciphertext":"Y3Q="}"#
        );
    }

    #[test]
    fn field_order_is_irrelevant() {
        let json = r#"{"ciphertext":"Y3Q=","nonce":"AQEBAQEBAQEBAQEB","key_derivation":{"length":32,"iterations":1000000,"salt":"/wAQ"}}"#;
        assert_eq!(decode(json.as_bytes()).unwrap(), sample());
    }

    #[test]
    fn missing_field_is_rejected() {
        let json = r#"{"key_derivation":{"salt":"/wAQ","iterations":1,"length":32},"nonce":"AQEBAQEBAQEBAQEB"}"#;
        assert!(matches!(decode(json.as_bytes()), Err(Error::Decode(_))));
    }

    #[test]
    fn invalid_base64_field_is_rejected() {
        let json = r#"{"key_derivation":{"salt":"/wAQ","iterations":1,"length":32},"nonce":"not base64!","ciphertext":"Y3Q="}"#;
        match decode(json.as_bytes()) {
            Err(Error::Decode(msg)) => assert!(msg.contains("nonce")),
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }

    #[test]
    fn negative_iterations_are_rejected() {
        let json = r#"{"key_derivation":{"salt":"/wAQ","iterations":-1,"length":32},"nonce":"AQEBAQEBAQEBAQEB","ciphertext":"Y3Q="}"#;
        assert!(matches!(decode(json.as_bytes()), Err(Error::Decode(_))));
    }

    #[test]
    fn unpadded_base64_is_rejected() {
        let json = r#"{"key_derivation":{"salt":"/wAQ","iterations":1,"length":32},"nonce":"AQEBAQEBAQEBAQEB","ciphertext":"Y3Q"}"#;
        assert!(matches!(decode(json.as_bytes()), Err(Error::Decode(_))));
    }
}
