use serde_json::{Map, Value};
use vc_interop_core::Field;

use super::{
    Credential, CredentialClaims, CredentialEnvelope, CredentialSubject, Issuer, ObjectWithId,
};
use crate::reconcile::{self, check_subject_shape, union, PropertySet};
use crate::{Error, NormalizeOptions};

/// Maps a claims-shaped or JSON-LD-shaped credential object to the W3C
/// shape. The `proof` member must already have been taken off.
pub(crate) fn normalize_claims(
    object: Map<String, Value>,
    options: &NormalizeOptions,
) -> Result<Credential, Error> {
    check_subject_shape(&object, "vc")?;
    let mut claims = CredentialClaims::from_object(object)?;
    if claims.is_legacy_attestation() {
        claims = claims.upgrade_legacy_attestation()?;
    }

    let mut properties = PropertySet::new(claims.property_set, options);
    let vc_is_null = matches!(claims.vc, Field::Null);
    let vc_is_present = claims.vc.is_present();
    let CredentialEnvelope {
        json_ld_context: vc_context,
        type_: vc_type,
        credential_subject: vc_subject,
        property_set: vc_properties,
    } = claims.vc.into_value().unwrap_or_default();

    // Subject
    let mut credential_subject = [claims.credential_subject, vc_subject.clone()]
        .into_iter()
        .filter_map(Field::into_value)
        .fold(CredentialSubject::default(), CredentialSubject::merge);
    if credential_subject.id.value().is_none() && claims.sub.is_present() {
        credential_subject.id = claims.sub.clone();
    }
    properties.retain("sub", claims.sub)?;

    // Issuer
    let issuer = match claims.issuer {
        Field::Absent | Field::Null => {
            issuer_object(ObjectWithId::default(), claims.iss, &mut properties)?
        }
        Field::Present(Issuer::Object(object)) => {
            issuer_object(object, claims.iss, &mut properties)?
        }
        Field::Present(issuer) => {
            properties.keep("iss", claims.iss)?;
            issuer
        }
    };

    // Id
    let id = if claims.id.value().is_none() && claims.jti.is_present() {
        let id = claims.jti.clone();
        properties.retain("jti", claims.jti)?;
        id
    } else {
        properties.keep("jti", claims.jti)?;
        claims.id
    };

    let type_ = union([claims.type_, vc_type.clone()]);
    let context = union([
        claims.context.clone(),
        claims.json_ld_context,
        vc_context.clone(),
    ]);
    properties.retain("context", claims.context)?;

    let issuance_date =
        reconcile::issuance_date(claims.issuance_date, claims.nbf, claims.iat, &mut properties)?;
    let expiration_date =
        reconcile::expiration_date(claims.expiration_date, claims.exp, &mut properties)?;

    // What is left of `vc`
    if vc_is_present {
        let mut envelope = PropertySet::new(vc_properties, options);
        envelope.retain("@context", vc_context)?;
        envelope.retain("type", vc_type)?;
        envelope.retain("credentialSubject", vc_subject)?;
        if !(envelope.is_empty() && options.remove_original_fields) {
            properties.insert("vc", Value::Object(envelope.into_map()));
        }
    } else if vc_is_null {
        properties.insert("vc", Value::Null);
    }

    Ok(Credential {
        context,
        type_,
        id,
        issuer,
        credential_subject,
        issuance_date,
        expiration_date,
        property_set: properties.into_map(),
    })
}

/// `{id: iss, ...issuer}`. `iss` goes only once the issuer has an id.
fn issuer_object(
    object: ObjectWithId,
    iss: Field<String>,
    properties: &mut PropertySet,
) -> Result<Issuer, Error> {
    let id = object.id.or(iss.clone());
    if id.value().is_some() {
        properties.retain("iss", iss)?;
    } else {
        properties.keep("iss", iss)?;
    }
    Ok(Issuer::Object(ObjectWithId {
        id,
        property_set: object.property_set,
    }))
}
