//! Attestations issued before claims moved into the `vc` envelope.
//!
//! They carry the subject's properties in a top-level `claim` object next to
//! `sub`, `iss` and `iat`.
use log::trace;
use serde_json::Value;
use vc_interop_core::{Field, OneOrMany};

use super::{CredentialClaims, CredentialEnvelope, CredentialSubject, DEFAULT_VC_TYPE};
use crate::{Context, Error, DEFAULT_CONTEXT};

fn non_empty(field: &Field<String>) -> bool {
    field.value().map_or(false, |value| !value.is_empty())
}

impl CredentialClaims {
    pub fn is_legacy_attestation(&self) -> bool {
        non_empty(&self.sub)
            && non_empty(&self.iss)
            && self.iat.value().map_or(false, |iat| iat.as_seconds() != 0.0)
            && matches!(self.property_set.get("claim"), Some(Value::Object(_)))
    }

    /// Moves `claim` into a fresh `vc` envelope.
    ///
    /// A `vc` already on the attestation is set aside under `issVc`, and `iat`
    /// becomes `nbf` unless `nbf` is set.
    pub fn upgrade_legacy_attestation(mut self) -> Result<Self, Error> {
        let claim = match self.property_set.remove("claim") {
            Some(Value::Object(claim)) => claim,
            Some(other) => {
                self.property_set.insert("claim".to_owned(), other);
                return Ok(self);
            }
            None => return Ok(self),
        };
        trace!("upgrading legacy attestation from {:?}", self.iss.value());
        let subject: CredentialSubject = serde_json::from_value(Value::Object(claim))?;

        match self.vc.take() {
            Field::Absent => (),
            Field::Null => {
                self.property_set.insert("issVc".to_owned(), Value::Null);
            }
            Field::Present(vc) => {
                self.property_set
                    .insert("issVc".to_owned(), serde_json::to_value(vc)?);
            }
        }
        self.vc = Field::Present(CredentialEnvelope {
            json_ld_context: Field::Present(OneOrMany::One(Context::from(DEFAULT_CONTEXT))),
            type_: Field::Present(OneOrMany::One(DEFAULT_VC_TYPE.to_owned())),
            credential_subject: Field::Present(subject),
            ..Default::default()
        });
        if self.nbf.value().is_none() {
            self.nbf = self.iat.take();
        }
        Ok(self)
    }
}
