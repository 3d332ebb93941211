use serde_json::{Map, Value};
use vc_interop_core::{Field, OneOrMany};

use super::{
    CredentialOrJwt, Holder, JwtPresentationEnvelope, JwtPresentationPayload, PresentationClaims,
    PresentationEnvelope,
};
use crate::reconcile::{self, entries, union, PropertySet};
use crate::{Error, NormalizeOptions};

/// Maps a W3C-shaped presentation object to JWT claims with a `vp` envelope.
pub(crate) fn transform_claims(
    object: Map<String, Value>,
    options: &NormalizeOptions,
) -> Result<JwtPresentationPayload, Error> {
    let claims = PresentationClaims::from_object(object)?;
    let mut properties = PropertySet::new(claims.property_set, options);
    let PresentationEnvelope {
        json_ld_context: vp_context,
        type_: vp_type,
        verifiable_credential: vp_credentials,
        property_set: vp_properties,
    } = claims.vp.into_value().unwrap_or_default();

    let verifiable_credential = entries(claims.verifiable_credential.clone())
        .into_iter()
        .chain(entries(vp_credentials))
        .map(credential_or_jwt)
        .collect::<Result<Vec<_>, _>>()?;
    properties.retain("verifiableCredential", claims.verifiable_credential)?;

    let vp = JwtPresentationEnvelope {
        context: union([
            claims.context.clone(),
            claims.json_ld_context.clone(),
            vp_context,
        ]),
        type_: union([claims.type_.clone(), vp_type]),
        verifiable_credential,
        property_set: vp_properties,
    };
    properties.retain("context", claims.context)?;
    properties.retain("@context", claims.json_ld_context)?;
    properties.retain("type", claims.type_)?;

    // Holder
    let (iss, holder) = match (claims.iss, claims.holder) {
        (Field::Absent, Field::Present(Holder::URI(uri))) => (
            Field::Present(uri.clone()),
            options.retained(Field::Present(Holder::URI(uri))),
        ),
        (iss, holder) => (iss, holder),
    };

    // Verifier
    let aud = if claims.verifier.is_present() {
        let aud = union([claims.verifier.clone(), claims.aud]);
        properties.retain("verifier", claims.verifier)?;
        Field::Present(OneOrMany::Many(aud.into_vec()))
    } else {
        properties.keep("verifier", claims.verifier)?;
        claims.aud
    };

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

    Ok(JwtPresentationPayload {
        iss,
        aud,
        jti,
        nbf,
        exp,
        holder,
        vp,
        property_set: properties.into_map(),
    })
}

/// Reduces an embedded credential to its compact JWT when its proof carries
/// one.
fn credential_or_jwt(vc: Value) -> Result<CredentialOrJwt, Error> {
    match vc {
        Value::String(jwt) => Ok(CredentialOrJwt::Jwt(jwt)),
        Value::Object(object) => {
            let jwt = object
                .get("proof")
                .and_then(|proof| proof.get("jwt"))
                .and_then(Value::as_str)
                .filter(|jwt| !jwt.is_empty());
            Ok(match jwt {
                Some(jwt) => CredentialOrJwt::Jwt(jwt.to_owned()),
                None => CredentialOrJwt::Credential(object),
            })
        }
        _ => Err(Error::UnknownCredentialFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transform(value: Value) -> Value {
        transform_with(value, &NormalizeOptions::default())
    }

    fn transform_with(value: Value, options: &NormalizeOptions) -> Value {
        let object = match value {
            Value::Object(object) => object,
            _ => panic!("fixture must be an object"),
        };
        serde_json::to_value(transform_claims(object, options).unwrap()).unwrap()
    }

    #[test]
    fn w3c_to_jwt_claims() {
        let transformed = transform(json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiablePresentation"],
            "id": "urn:uuid:vp",
            "holder": "did:example:holder",
            "verifier": ["did:example:verifier"],
            "issuanceDate": "2020-09-13T12:26:40.000Z",
            "verifiableCredential": [
                {
                    "type": ["VerifiableCredential"],
                    "proof": { "type": "JwtProof2020", "jwt": "eyJhbGciOiJFUzI1NksifQ.e30.c2ln" }
                },
                {
                    "type": ["VerifiableCredential"],
                    "proof": { "type": "Ed25519Signature2018" }
                }
            ]
        }));
        assert_eq!(
            transformed,
            json!({
                "iss": "did:example:holder",
                "aud": ["did:example:verifier"],
                "jti": "urn:uuid:vp",
                "nbf": 1600000000,
                "vp": {
                    "@context": ["https://www.w3.org/2018/credentials/v1"],
                    "type": ["VerifiablePresentation"],
                    "verifiableCredential": [
                        "eyJhbGciOiJFUzI1NksifQ.e30.c2ln",
                        {
                            "type": ["VerifiableCredential"],
                            "proof": { "type": "Ed25519Signature2018" }
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn verifier_is_merged_into_aud() {
        let transformed = transform(json!({
            "verifier": ["did:a", "did:b"],
            "aud": "did:b"
        }));
        assert_eq!(transformed["aud"], json!(["did:a", "did:b"]));
        assert!(transformed.get("verifier").is_none());

        let transformed = transform(json!({ "aud": "did:b" }));
        assert_eq!(transformed["aud"], json!("did:b"));
    }

    #[test]
    fn object_holder_is_left_alone() {
        let transformed = transform(json!({ "holder": { "id": "did:example:holder" } }));
        assert_eq!(transformed["holder"], json!({ "id": "did:example:holder" }));
        assert!(transformed.get("iss").is_none());
    }

    #[test]
    fn declared_iss_blocks_holder_mapping() {
        let transformed = transform(json!({ "holder": "did:example:holder", "iss": null }));
        assert_eq!(transformed["holder"], json!("did:example:holder"));
        assert_eq!(transformed.get("iss"), Some(&Value::Null));
    }

    #[test]
    fn top_level_credentials_come_first() {
        let transformed = transform(json!({
            "verifiableCredential": "eyJ.first.jwt",
            "vp": { "verifiableCredential": ["eyJ.second.jwt"] }
        }));
        assert_eq!(
            transformed["vp"]["verifiableCredential"],
            json!(["eyJ.first.jwt", "eyJ.second.jwt"])
        );
    }

    #[test]
    fn scalar_credentials_are_rejected() {
        let object = json!({ "verifiableCredential": [42] });
        let object = object.as_object().unwrap().clone();
        assert!(matches!(
            transform_claims(object, &NormalizeOptions::default()),
            Err(Error::UnknownCredentialFormat)
        ));
    }

    #[test]
    fn original_fields_can_be_kept() {
        let transformed = transform_with(
            json!({
                "holder": "did:example:holder",
                "verifier": "did:example:verifier",
                "verifiableCredential": ["eyJ.a.b"]
            }),
            &NormalizeOptions {
                remove_original_fields: false,
            },
        );
        assert_eq!(transformed["holder"], json!("did:example:holder"));
        assert_eq!(transformed["iss"], json!("did:example:holder"));
        assert_eq!(transformed["verifier"], json!("did:example:verifier"));
        assert_eq!(transformed["aud"], json!(["did:example:verifier"]));
        assert_eq!(transformed["verifiableCredential"], json!(["eyJ.a.b"]));
        assert_eq!(transformed["vp"]["verifiableCredential"], json!(["eyJ.a.b"]));
    }
}
