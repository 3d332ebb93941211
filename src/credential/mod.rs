use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vc_interop_core::{Field, OneOrMany, OrderedSet};
use vc_interop_jwt::NumericDate;

use crate::{Context, Error, Verifiable};

mod legacy;
mod normalize;
mod transform;

pub(crate) use normalize::normalize_claims;
pub(crate) use transform::transform_claims;

pub const DEFAULT_VC_TYPE: &str = "VerifiableCredential";

/// Credential in the W3C JSON-LD shape.
///
/// Produced by [`normalize_credential`](crate::normalize_credential). Members
/// without a dedicated field, including JWT claims no rule consumed, end up in
/// `property_set`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "@context")]
    pub context: OrderedSet<Context>,
    #[serde(rename = "type")]
    pub type_: OrderedSet<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    pub issuer: Issuer,
    pub credential_subject: CredentialSubject,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub issuance_date: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub expiration_date: Field<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

pub type VerifiableCredential = Verifiable<Credential>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Issuer {
    URI(String),
    Object(ObjectWithId),
    /// Any other JSON value, carried over untouched.
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ObjectWithId {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl ObjectWithId {
    pub fn is_empty(&self) -> bool {
        self.id.is_absent() && self.property_set.is_empty()
    }
}

impl Issuer {
    pub fn get_id(&self) -> Option<&str> {
        match self {
            Self::URI(uri) => Some(uri),
            Self::Object(object) => object.id.value().map(String::as_str),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CredentialSubject {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl CredentialSubject {
    pub fn is_empty(&self) -> bool {
        self.id.is_absent() && self.property_set.is_empty()
    }

    /// Properties of `self` overlaid with those of `other`.
    pub(crate) fn merge(self, other: Self) -> Self {
        let mut property_set = self.property_set;
        property_set.extend(other.property_set);
        Self {
            id: other.id.or(self.id),
            property_set,
        }
    }
}

/// Credential in the JWT claims shape.
///
/// Produced by [`transform_credential_input`](crate::transform_credential_input).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JwtCredentialPayload {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub iss: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub sub: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub jti: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub nbf: Field<NumericDate>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub exp: Field<NumericDate>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub issuer: Field<Issuer>,
    pub vc: JwtCredentialEnvelope,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// The `vc` claim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JwtCredentialEnvelope {
    #[serde(rename = "@context")]
    pub context: OrderedSet<Context>,
    #[serde(rename = "type")]
    pub type_: OrderedSet<String>,
    pub credential_subject: CredentialSubject,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// Credential members either direction knows how to map, as found on the
/// input.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CredentialClaims {
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
    pub issuer: Field<Issuer>,
    #[serde(default)]
    pub iss: Field<String>,
    #[serde(default)]
    pub sub: Field<String>,
    #[serde(default)]
    pub credential_subject: Field<CredentialSubject>,
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
    pub vc: Field<CredentialEnvelope>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

/// The `vc` claim as found on the input.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CredentialEnvelope {
    #[serde(rename = "@context", default, skip_serializing_if = "Field::is_absent")]
    pub json_ld_context: Field<OneOrMany<Context>>,
    #[serde(rename = "type", default, skip_serializing_if = "Field::is_absent")]
    pub type_: Field<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub credential_subject: Field<CredentialSubject>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl CredentialClaims {
    pub fn from_object(object: Map<String, Value>) -> Result<Self, Error> {
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

impl Credential {
    pub fn issuer_id(&self) -> Option<&str> {
        self.issuer.get_id()
    }

    /// Checks the structure required of a credential, without looking at any
    /// proof.
    pub fn validate(&self) -> Result<(), Error> {
        validate_context(&self.context)?;
        if !self.type_.iter().any(|type_| type_ == DEFAULT_VC_TYPE) {
            return Err(Error::MissingTypeVerifiableCredential);
        }
        if self.issuer_id().is_none() {
            return Err(Error::MissingIssuer);
        }
        let issuance_date = self
            .issuance_date
            .value()
            .ok_or(Error::MissingIssuanceDate)?;
        if NumericDate::from_date_string(issuance_date).is_none() {
            return Err(Error::InvalidIssuanceDate(issuance_date.clone()));
        }
        if self.credential_subject.is_empty() {
            // https://www.w3.org/TR/vc-data-model/#credential-subject
            return Err(Error::EmptyCredentialSubject);
        }
        Ok(())
    }
}

/// First context must be one of the base contexts.
pub(crate) fn validate_context(context: &OrderedSet<Context>) -> Result<(), Error> {
    match context.first() {
        None => Err(Error::MissingContext),
        Some(first) if !first.is_base_context() => Err(Error::InvalidContext),
        Some(_) => Ok(()),
    }
}
