use serde_json::{Map, Value};

/// JWT decoding failure.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The token is not made of three dot-separated segments
    #[error("Invalid JWS")]
    InvalidJws,
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Header or payload decoded to something other than a JSON object
    #[error("expected JSON object")]
    ExpectedJsonObject,
}

/// JOSE header and claims set of a compact JWT.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedJwt {
    pub header: Map<String, Value>,
    pub payload: Map<String, Value>,
}

/// Capability to decode a compact JWT into its claims.
///
/// Normalization only needs the claims set; whether a decoder also checks
/// the signature is up to the implementation. Any
/// `Fn(&str) -> Result<DecodedJwt, DecodeError>` is a decoder.
pub trait JwtDecoder {
    fn decode(&self, jwt: &str) -> Result<DecodedJwt, DecodeError>;
}

impl<F> JwtDecoder for F
where
    F: Fn(&str) -> Result<DecodedJwt, DecodeError>,
{
    fn decode(&self, jwt: &str) -> Result<DecodedJwt, DecodeError> {
        self(jwt)
    }
}

/// Decodes header and payload without verifying the signature.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnverifiedDecoder;

impl JwtDecoder for UnverifiedDecoder {
    fn decode(&self, jwt: &str) -> Result<DecodedJwt, DecodeError> {
        let (header_b64, payload_b64, _signature_b64) = split_jwt(jwt)?;
        Ok(DecodedJwt {
            header: decode_json_object(header_b64)?,
            payload: decode_json_object(payload_b64)?,
        })
    }
}

fn decode_json_object(segment: &str) -> Result<Map<String, Value>, DecodeError> {
    let bytes = base64::decode_config(segment, base64::URL_SAFE_NO_PAD)?;
    match serde_json::from_slice(&bytes)? {
        Value::Object(object) => Ok(object),
        _ => Err(DecodeError::ExpectedJsonObject),
    }
}

/// Splits a compact JWT into its header, payload and signature segments.
pub fn split_jwt(jwt: &str) -> Result<(&str, &str, &str), DecodeError> {
    let mut parts = jwt.splitn(3, '.');
    Ok(
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), Some(c)) if !c.contains('.') => (a, b, c),
            _ => return Err(DecodeError::InvalidJws),
        },
    )
}

/// Checks that `s` has the shape of a compact JWT: three dot-separated
/// base64url segments, of which only the signature may be empty.
///
/// Equivalent to `^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*$`.
pub fn is_compact_jwt(s: &str) -> bool {
    fn is_base64url(segment: &str) -> bool {
        segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    match split_jwt(s) {
        Ok((header, payload, signature)) => {
            !header.is_empty()
                && !payload.is_empty()
                && is_base64url(header)
                && is_base64url(payload)
                && is_base64url(signature)
        }
        Err(_) => false,
    }
}
