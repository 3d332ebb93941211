use serde_json::{Map, Value};
use vc_interop_jwt::{JwtDecoder, UnverifiedDecoder};

use crate::format::dispatch;
use crate::{
    credential, presentation, Error, JwtCredentialPayload, JwtPresentationPayload,
    NormalizeOptions, VerifiableCredential, VerifiablePresentation,
};

/// Normalize and transform operations bound to a JWT decoder and a set of
/// options.
///
/// ```
/// use serde_json::json;
/// use vc_interop::{Normalizer, NormalizeOptions};
///
/// let normalizer = Normalizer::new().with_options(NormalizeOptions {
///     remove_original_fields: false,
/// });
/// let vc = normalizer
///     .normalize_credential(&json!({ "sub": "did:example:alice" }))
///     .unwrap();
/// assert_eq!(vc.credential_subject.id.value().unwrap(), "did:example:alice");
/// assert_eq!(vc.property_set["sub"], "did:example:alice");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer<D = UnverifiedDecoder> {
    decoder: D,
    options: NormalizeOptions,
}

impl Normalizer {
    /// Normalizer decoding JWTs without verifying them, with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: JwtDecoder> Normalizer<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(self, options: NormalizeOptions) -> Self {
        Self { options, ..self }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalizes a credential given as a compact JWT, as JSON text, or as an
    /// object in JWT claims, JSON-LD, legacy attestation or JWT-proof shape.
    pub fn normalize_credential(&self, input: &Value) -> Result<VerifiableCredential, Error> {
        dispatch(
            input,
            &self.decoder,
            || Error::UnknownCredentialFormat,
            &|object| credential::normalize_claims(object, &self.options),
        )
    }

    /// Maps a credential object to JWT claims.
    pub fn transform_credential_input(
        &self,
        input: &Value,
    ) -> Result<JwtCredentialPayload, Error> {
        credential::transform_claims(expect_object(input)?, &self.options)
    }

    /// Normalizes a presentation and every credential it embeds.
    pub fn normalize_presentation(&self, input: &Value) -> Result<VerifiablePresentation, Error> {
        dispatch(
            input,
            &self.decoder,
            || Error::UnknownPresentationFormat,
            &|object| presentation::normalize_claims(object, self),
        )
    }

    /// Maps a presentation object to JWT claims, reducing embedded credentials
    /// to their compact JWT where they have one.
    pub fn transform_presentation_input(
        &self,
        input: &Value,
    ) -> Result<JwtPresentationPayload, Error> {
        presentation::transform_claims(expect_object(input)?, &self.options)
    }
}

fn expect_object(input: &Value) -> Result<Map<String, Value>, Error> {
    match input {
        Value::Object(object) => Ok(object.clone()),
        _ => Err(Error::ExpectedJsonObject),
    }
}

/// Normalizes a credential to the W3C shape, decoding JWTs without
/// verification.
pub fn normalize_credential(input: &Value) -> Result<VerifiableCredential, Error> {
    Normalizer::new().normalize_credential(input)
}

/// Maps a W3C-shaped credential to JWT claims.
pub fn transform_credential_input(input: &Value) -> Result<JwtCredentialPayload, Error> {
    Normalizer::new().transform_credential_input(input)
}

/// Normalizes a presentation to the W3C shape, decoding JWTs without
/// verification.
pub fn normalize_presentation(input: &Value) -> Result<VerifiablePresentation, Error> {
    Normalizer::new().normalize_presentation(input)
}

/// Maps a W3C-shaped presentation to JWT claims.
pub fn transform_presentation_input(input: &Value) -> Result<JwtPresentationPayload, Error> {
    Normalizer::new().transform_presentation_input(input)
}
