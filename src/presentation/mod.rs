use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vc_interop_core::{Field, OneOrMany, OrderedSet};
use vc_interop_jwt::NumericDate;

use crate::credential::validate_context;
use crate::{Context, Error, Verifiable, VerifiableCredential};

mod normalize;
mod transform;

pub(crate) use normalize::normalize_claims;
pub(crate) use transform::transform_claims;

pub const DEFAULT_VP_TYPE: &str = "VerifiablePresentation";

/// Presentation in the W3C JSON-LD shape, with every embedded credential
/// normalized.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(rename = "@context")]
    pub context: OrderedSet<Context>,
    #[serde(rename = "type")]
    pub type_: OrderedSet<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub holder: Field<Holder>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub verifier: Field<OrderedSet<String>>,
    pub verifiable_credential: Vec<VerifiableCredential>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub issuance_date: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub expiration_date: Field<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

pub type VerifiablePresentation = Verifiable<Presentation>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Holder {
    URI(String),
    /// Anything else, typically an object with an `id`.
    Other(Value),
}

impl Holder {
    pub fn get_id(&self) -> Option<&str> {
        match self {
            Self::URI(uri) => Some(uri),
            Self::Other(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

/// Embedded credential on the JWT side: the compact JWT when there is one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CredentialOrJwt {
    Jwt(String),
    Credential(Map<String, Value>),
}

/// Presentation in the JWT claims shape.
///
/// Produced by [`transform_presentation_input`](crate::transform_presentation_input).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JwtPresentationPayload {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub iss: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub aud: Field<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub jti: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub nbf: Field<NumericDate>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub exp: Field<NumericDate>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub holder: Field<Holder>,
    pub vp: JwtPresentationEnvelope,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// The `vp` claim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JwtPresentationEnvelope {
    #[serde(rename = "@context")]
    pub context: OrderedSet<Context>,
    #[serde(rename = "type")]
    pub type_: OrderedSet<String>,
    pub verifiable_credential: Vec<CredentialOrJwt>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// Presentation members either direction knows how to map, as found on the
/// input.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresentationClaims {
    #[serde(rename = "@context", default)]
    pub json_ld_context: Field<OneOrMany<Context>>,
    #[serde(default)]
    pub context: Field<OneOrMany<Context>>,
    #[serde(rename = "type", default)]
    pub type_: Field<OneOrMany<String>>,
    #[serde(default)]
    pub id: Field<String>,
    #[serde(default)]
    pub jti: Field<String>,
    #[serde(default)]
    pub holder: Field<Holder>,
    #[serde(default)]
    pub iss: Field<String>,
    #[serde(default)]
    pub verifier: Field<OneOrMany<String>>,
    #[serde(default)]
    pub aud: Field<OneOrMany<String>>,
    #[serde(default)]
    pub verifiable_credential: Field<Value>,
    #[serde(default)]
    pub issuance_date: Field<String>,
    #[serde(default)]
    pub expiration_date: Field<String>,
    #[serde(default)]
    pub nbf: Field<NumericDate>,
    #[serde(default)]
    pub iat: Field<NumericDate>,
    #[serde(default)]
    pub exp: Field<NumericDate>,
    #[serde(default)]
    pub vp: Field<PresentationEnvelope>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// The `vp` claim as found on the input.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresentationEnvelope {
    #[serde(rename = "@context", default)]
    pub json_ld_context: Field<OneOrMany<Context>>,
    #[serde(rename = "type", default)]
    pub type_: Field<OneOrMany<String>>,
    #[serde(default)]
    pub verifiable_credential: Field<Value>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl PresentationClaims {
    pub fn from_object(object: Map<String, Value>) -> Result<Self, Error> {
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

impl Presentation {
    pub fn holder_id(&self) -> Option<&str> {
        self.holder.value().and_then(Holder::get_id)
    }

    /// Checks the structure required of a presentation and of every credential
    /// it embeds, without looking at any proof.
    pub fn validate(&self) -> Result<(), Error> {
        validate_context(&self.context)?;
        if !self.type_.iter().any(|type_| type_ == DEFAULT_VP_TYPE) {
            return Err(Error::MissingTypeVerifiablePresentation);
        }
        for vc in &self.verifiable_credential {
            vc.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn holder_id() {
        let holder: Holder = serde_json::from_value(json!("did:example:holder")).unwrap();
        assert_eq!(holder.get_id(), Some("did:example:holder"));
        let holder: Holder =
            serde_json::from_value(json!({ "id": "did:example:holder", "name": "H" })).unwrap();
        assert_eq!(holder.get_id(), Some("did:example:holder"));
        let holder: Holder = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(holder.get_id(), None);
    }

    #[test]
    fn credential_or_jwt() {
        let vcs: Vec<CredentialOrJwt> =
            serde_json::from_value(json!(["eyJ.eyJ.sig", { "type": "VerifiableCredential" }]))
                .unwrap();
        assert_eq!(vcs[0], CredentialOrJwt::Jwt("eyJ.eyJ.sig".to_owned()));
        assert!(matches!(vcs[1], CredentialOrJwt::Credential(_)));
    }

    #[test]
    fn validate_presentation() {
        let vp: Presentation = serde_json::from_value(json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiablePresentation"],
            "holder": "did:example:holder",
            "verifiableCredential": [{
                "@context": ["https://www.w3.org/2018/credentials/v1"],
                "type": ["VerifiableCredential"],
                "issuer": { "id": "did:example:issuer" },
                "issuanceDate": "2020-09-13T12:26:40.000Z",
                "credentialSubject": { "id": "did:example:subject" },
                "proof": {}
            }]
        }))
        .unwrap();
        vp.validate().unwrap();
        assert_eq!(vp.holder_id(), Some("did:example:holder"));

        let mut missing_type = vp.clone();
        missing_type.type_ = OrderedSet::new();
        assert!(matches!(
            missing_type.validate(),
            Err(Error::MissingTypeVerifiablePresentation)
        ));

        let mut bad_credential = vp;
        bad_credential.verifiable_credential[0].issuance_date = Field::Absent;
        assert!(matches!(
            bad_credential.validate(),
            Err(Error::MissingIssuanceDate)
        ));
    }
}
