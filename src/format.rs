//! Input classification shared by the normalize operations.
use log::debug;
use serde_json::{Map, Value};
use vc_interop_jwt::{is_compact_jwt, JwtDecoder};

use crate::{Error, Proof, Proofs, Verifiable};

/// Representation a credential or presentation arrived in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Format<'a> {
    /// Compact JWT.
    Jwt(&'a str),
    /// Any other string; may hold a serialized object.
    JsonText(&'a str),
    /// Object whose `proof.jwt` holds the compact JWT it was decoded from.
    JwtProof { jwt: &'a str, proof: &'a Value },
    /// Claims-shaped or JSON-LD-shaped object.
    Object(&'a Map<String, Value>),
}

impl<'a> Format<'a> {
    /// Returns `None` for input no format applies to.
    pub fn classify(input: &'a Value) -> Option<Self> {
        match input {
            Value::String(s) if is_compact_jwt(s) => Some(Self::Jwt(s)),
            Value::String(s) => Some(Self::JsonText(s)),
            Value::Object(object) => {
                let proof = match object.get("proof") {
                    Some(proof) => proof,
                    None => return Some(Self::Object(object)),
                };
                match proof.get("jwt") {
                    Some(Value::String(jwt)) if !jwt.is_empty() => {
                        Some(Self::JwtProof { jwt, proof })
                    }
                    Some(jwt) if is_truthy(jwt) => None,
                    _ => Some(Self::Object(object)),
                }
            }
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Jwt(_) => "compact JWT",
            Self::JsonText(_) => "JSON text",
            Self::JwtProof { .. } => "object with JWT proof",
            Self::Object(_) => "object",
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Routes `input` to `normalize` according to its format and attaches the
/// resulting proof.
///
/// JWT decoding and JSON parsing failures, as well as input of no known
/// format, are all reported as `unknown()`.
pub(crate) fn dispatch<T, D, F>(
    input: &Value,
    decoder: &D,
    unknown: fn() -> Error,
    normalize: &F,
) -> Result<Verifiable<T>, Error>
where
    D: JwtDecoder,
    F: Fn(Map<String, Value>) -> Result<T, Error>,
{
    let format = Format::classify(input).ok_or_else(unknown)?;
    debug!("normalizing {}", format.name());
    match format {
        Format::Jwt(jwt) => {
            let mut payload = match decoder.decode(jwt) {
                Ok(decoded) => decoded.payload,
                Err(err) => {
                    debug!("unable to decode JWT: {}", err);
                    return Err(unknown());
                }
            };
            payload.remove("proof");
            let claims = normalize(payload)?;
            Ok(Verifiable::new(claims, Proof::from_jwt(jwt)))
        }
        Format::JsonText(text) => {
            let value: Value = match serde_json::from_str(text) {
                Ok(value) => value,
                Err(err) => {
                    debug!("unable to parse JSON: {}", err);
                    return Err(unknown());
                }
            };
            dispatch(&value, decoder, unknown, normalize)
        }
        Format::JwtProof { jwt, proof } => {
            let mut verifiable =
                dispatch(&Value::String(jwt.to_owned()), decoder, unknown, normalize)?;
            verifiable.proof = serde_json::from_value(proof.clone())?;
            Ok(verifiable)
        }
        Format::Object(object) => {
            let mut object = object.clone();
            let proof = match object.remove("proof") {
                None => Proofs::default(),
                Some(proof) => serde_json::from_value(proof)?,
            };
            let claims = normalize(object)?;
            Ok(Verifiable::new(claims, proof))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vc_interop_jwt::{DecodeError, DecodedJwt, UnverifiedDecoder};

    fn identity(object: Map<String, Value>) -> Result<Value, Error> {
        Ok(Value::Object(object))
    }

    fn jwt(payload: &Value) -> String {
        let encode = |value: &Value| {
            base64::encode_config(value.to_string(), base64::URL_SAFE_NO_PAD)
        };
        format!("{}.{}.c2ln", encode(&json!({ "alg": "none" })), encode(payload))
    }

    #[test]
    fn classify() {
        let compact = json!("eyJhbGciOiJub25lIn0.e30.");
        assert_eq!(
            Format::classify(&compact),
            Some(Format::Jwt("eyJhbGciOiJub25lIn0.e30."))
        );
        let text = json!("{\"id\":\"urn:a\"}");
        assert!(matches!(Format::classify(&text), Some(Format::JsonText(_))));
        let hybrid = json!({ "proof": { "jwt": "a.b.c" } });
        assert!(matches!(
            Format::classify(&hybrid),
            Some(Format::JwtProof { jwt: "a.b.c", .. })
        ));
        let empty_jwt = json!({ "proof": { "jwt": "" } });
        assert!(matches!(Format::classify(&empty_jwt), Some(Format::Object(_))));
        let numeric_jwt = json!({ "proof": { "jwt": 1 } });
        assert_eq!(Format::classify(&numeric_jwt), None);
        assert_eq!(Format::classify(&json!(42)), None);
        assert_eq!(Format::classify(&json!(null)), None);
    }

    #[test]
    fn jwt_gets_jwt_proof() {
        let token = jwt(&json!({ "iss": "did:example:issuer", "proof": "dropped" }));
        let verifiable = dispatch(
            &Value::String(token.clone()),
            &UnverifiedDecoder,
            || Error::UnknownCredentialFormat,
            &identity,
        )
        .unwrap();
        assert_eq!(verifiable.claims, json!({ "iss": "did:example:issuer" }));
        assert_eq!(verifiable.jwt(), Some(token.as_str()));
        assert_eq!(
            serde_json::to_value(&verifiable.proof).unwrap(),
            json!({ "type": "JwtProof2020", "jwt": token })
        );
    }

    #[test]
    fn object_gets_empty_proof() {
        let verifiable = dispatch(
            &json!({ "id": "urn:a" }),
            &UnverifiedDecoder,
            || Error::UnknownCredentialFormat,
            &identity,
        )
        .unwrap();
        assert_eq!(serde_json::to_value(&verifiable.proof).unwrap(), json!({}));
        assert_eq!(verifiable.claims, json!({ "id": "urn:a" }));
    }

    #[test]
    fn caller_proof_of_any_shape_is_kept() {
        for proof in [
            json!({ "type": ["Ed25519Signature2018"], "jws": "x" }),
            json!("opaque"),
            json!(null),
        ] {
            let verifiable = dispatch(
                &json!({ "id": "urn:a", "proof": proof.clone() }),
                &UnverifiedDecoder,
                || Error::UnknownCredentialFormat,
                &identity,
            )
            .unwrap();
            assert_eq!(serde_json::to_value(&verifiable.proof).unwrap(), proof);
            assert_eq!(verifiable.claims, json!({ "id": "urn:a" }));
        }
    }

    #[test]
    fn hybrid_keeps_caller_proof() {
        let token = jwt(&json!({ "jti": "urn:from-jwt" }));
        let proof = json!({ "type": "JwtProof2020", "jwt": token, "created": "2020-01-01" });
        let verifiable = dispatch(
            &json!({ "jti": "urn:ignored", "proof": proof.clone() }),
            &UnverifiedDecoder,
            || Error::UnknownCredentialFormat,
            &identity,
        )
        .unwrap();
        assert_eq!(verifiable.claims, json!({ "jti": "urn:from-jwt" }));
        assert_eq!(serde_json::to_value(&verifiable.proof).unwrap(), proof);
    }

    #[test]
    fn json_text_is_parsed() {
        let verifiable = dispatch(
            &json!("{\"id\":\"urn:a\"}"),
            &UnverifiedDecoder,
            || Error::UnknownPresentationFormat,
            &identity,
        )
        .unwrap();
        assert_eq!(verifiable.claims, json!({ "id": "urn:a" }));
    }

    #[test]
    fn failures_are_unknown_format() {
        for input in [json!("not.a.valid.jwt.token"), json!("eyJ.eyJ.sig"), json!(7)] {
            let result = dispatch(
                &input,
                &UnverifiedDecoder,
                || Error::UnknownPresentationFormat,
                &identity,
            );
            assert!(
                matches!(result, Err(Error::UnknownPresentationFormat)),
                "{}",
                input
            );
        }
    }

    #[test]
    fn custom_decoder() {
        let decoder = |_: &str| -> Result<DecodedJwt, DecodeError> {
            let mut payload = Map::new();
            payload.insert("sub".to_owned(), json!("did:example:decoded"));
            Ok(DecodedJwt {
                header: Map::new(),
                payload,
            })
        };
        let verifiable = dispatch(
            &json!("a.b.c"),
            &decoder,
            || Error::UnknownCredentialFormat,
            &identity,
        )
        .unwrap();
        assert_eq!(verifiable.claims, json!({ "sub": "did:example:decoded" }));
    }
}
