use serde_json::{Map, Value};
use vc_interop_core::Field;

use super::{
    CredentialClaims, CredentialEnvelope, CredentialSubject, Issuer, JwtCredentialEnvelope,
    JwtCredentialPayload,
};
use crate::reconcile::{self, check_subject_shape, union, PropertySet};
use crate::{Error, NormalizeOptions};

/// Maps a W3C-shaped (or partially claims-shaped) credential object to JWT
/// claims with a `vc` envelope.
pub(crate) fn transform_claims(
    object: Map<String, Value>,
    options: &NormalizeOptions,
) -> Result<JwtCredentialPayload, Error> {
    check_subject_shape(&object, "vc")?;
    let claims = CredentialClaims::from_object(object)?;
    let mut properties = PropertySet::new(claims.property_set, options);
    let CredentialEnvelope {
        json_ld_context: vc_context,
        type_: vc_type,
        credential_subject: vc_subject,
        property_set: vc_properties,
    } = claims.vc.into_value().unwrap_or_default();

    // Subject
    let mut credential_subject = [claims.credential_subject.clone(), vc_subject]
        .into_iter()
        .filter_map(Field::into_value)
        .fold(CredentialSubject::default(), CredentialSubject::merge);
    properties.retain("credentialSubject", claims.credential_subject)?;
    let sub = if claims.sub.value().is_none() && credential_subject.id.is_present() {
        let id = credential_subject.id.clone();
        credential_subject.id = options.retained(credential_subject.id.take());
        id
    } else {
        claims.sub
    };

    let vc = JwtCredentialEnvelope {
        context: union([
            claims.context.clone(),
            claims.json_ld_context.clone(),
            vc_context,
        ]),
        type_: union([claims.type_.clone(), vc_type]),
        credential_subject,
        property_set: vc_properties,
    };
    properties.retain("context", claims.context)?;
    properties.retain("@context", claims.json_ld_context)?;
    properties.retain("type", claims.type_)?;

    // Id
    let jti = if claims.id.is_present() && claims.jti.is_absent() {
        let jti = claims.id.clone();
        properties.retain("id", claims.id)?;
        jti
    } else {
        properties.keep("id", claims.id)?;
        claims.jti
    };

    let nbf = reconcile::numeric_date(
        "issuanceDate",
        claims.issuance_date,
        claims.nbf,
        &mut properties,
    )?;
    let exp = reconcile::numeric_date(
        "expirationDate",
        claims.expiration_date,
        claims.exp,
        &mut properties,
    )?;
    properties.keep("iat", claims.iat)?;

    // Issuer
    let (iss, issuer) = match (claims.iss, claims.issuer) {
        (Field::Absent, Field::Present(Issuer::Object(mut object))) => {
            let iss = object.id.clone();
            if options.remove_original_fields {
                object.id = Field::Absent;
            }
            if object.is_empty() {
                (iss, Field::Absent)
            } else {
                (iss, Field::Present(Issuer::Object(object)))
            }
        }
        (Field::Absent, Field::Present(Issuer::URI(uri))) => (
            Field::Present(uri.clone()),
            options.retained(Field::Present(Issuer::URI(uri))),
        ),
        (iss, issuer) => (iss, issuer),
    };

    Ok(JwtCredentialPayload {
        iss,
        sub,
        jti,
        nbf,
        exp,
        issuer,
        vc,
        property_set: properties.into_map(),
    })
}
