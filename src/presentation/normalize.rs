use serde_json::{Map, Value};
use vc_interop_core::{Field, OrderedSet};
use vc_interop_jwt::JwtDecoder;

use super::{Holder, Presentation, PresentationClaims, PresentationEnvelope};
use crate::reconcile::{self, entries, union, PropertySet};
use crate::{Error, Normalizer};

/// Maps a claims-shaped or JSON-LD-shaped presentation object to the W3C
/// shape, normalizing each embedded credential on the way.
pub(crate) fn normalize_claims<D: JwtDecoder>(
    object: Map<String, Value>,
    normalizer: &Normalizer<D>,
) -> Result<Presentation, Error> {
    let options = normalizer.options();
    let claims = PresentationClaims::from_object(object)?;
    let mut properties = PropertySet::new(claims.property_set, options);
    let vp_is_null = matches!(claims.vp, Field::Null);
    let vp_is_present = claims.vp.is_present();
    let PresentationEnvelope {
        json_ld_context: vp_context,
        type_: vp_type,
        verifiable_credential: vp_credentials,
        property_set: vp_properties,
    } = claims.vp.into_value().unwrap_or_default();

    let verifiable_credential = entries(claims.verifiable_credential)
        .into_iter()
        .chain(entries(vp_credentials.clone()))
        .map(|vc| normalizer.normalize_credential(&vc))
        .collect::<Result<Vec<_>, _>>()?;

    // Holder
    let holder = if claims.iss.is_present() && claims.holder.value().is_none() {
        let holder = claims.iss.clone().map(Holder::URI);
        properties.retain("iss", claims.iss)?;
        holder
    } else {
        properties.keep("iss", claims.iss)?;
        claims.holder
    };

    // Verifier
    let verifier = if claims.aud.is_present() {
        let verifier = union([claims.verifier, claims.aud.clone()]);
        properties.retain("aud", claims.aud)?;
        Field::Present(verifier)
    } else {
        properties.keep("aud", claims.aud)?;
        claims.verifier.map(OrderedSet::from)
    };

    // Id
    let id = if claims.jti.is_present() && claims.id.is_absent() {
        let id = claims.jti.clone();
        properties.retain("jti", claims.jti)?;
        id
    } else {
        properties.keep("jti", claims.jti)?;
        claims.id
    };

    let type_ = union([claims.type_, vp_type.clone()]);
    let context = union([
        claims.context.clone(),
        claims.json_ld_context,
        vp_context.clone(),
    ]);
    properties.retain("context", claims.context)?;

    let issuance_date =
        reconcile::issuance_date(claims.issuance_date, claims.nbf, claims.iat, &mut properties)?;
    let expiration_date =
        reconcile::expiration_date(claims.expiration_date, claims.exp, &mut properties)?;

    // What is left of `vp`
    if vp_is_present {
        let mut envelope = PropertySet::new(vp_properties, options);
        envelope.retain("@context", vp_context)?;
        envelope.retain("type", vp_type)?;
        envelope.retain("verifiableCredential", vp_credentials)?;
        if !(envelope.is_empty() && options.remove_original_fields) {
            properties.insert("vp", Value::Object(envelope.into_map()));
        }
    } else if vp_is_null {
        properties.insert("vp", Value::Null);
    }

    Ok(Presentation {
        context,
        type_,
        id,
        holder,
        verifier,
        verifiable_credential,
        issuance_date,
        expiration_date,
        property_set: properties.into_map(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NormalizeOptions;
    use serde_json::json;

    fn normalize(value: Value) -> Value {
        normalize_with(value, NormalizeOptions::default())
    }

    fn normalize_with(value: Value, options: NormalizeOptions) -> Value {
        let object = match value {
            Value::Object(object) => object,
            _ => panic!("fixture must be an object"),
        };
        let normalizer = Normalizer::new().with_options(options);
        serde_json::to_value(normalize_claims(object, &normalizer).unwrap()).unwrap()
    }

    #[test]
    fn jwt_claims_to_w3c() {
        let normalized = normalize(json!({
            "iss": "did:example:holder",
            "aud": "did:example:verifier",
            "jti": "urn:uuid:vp",
            "nbf": 1600000000,
            "vp": {
                "@context": ["https://www.w3.org/2018/credentials/v1"],
                "type": ["VerifiablePresentation"],
                "verifiableCredential": [{
                    "iss": "did:example:issuer",
                    "sub": "did:example:holder",
                    "nbf": 1600000000,
                    "vc": {
                        "@context": ["https://www.w3.org/2018/credentials/v1"],
                        "type": ["VerifiableCredential"],
                        "credentialSubject": { "name": "Alice" }
                    }
                }]
            }
        }));
        assert_eq!(
            normalized,
            json!({
                "@context": ["https://www.w3.org/2018/credentials/v1"],
                "type": ["VerifiablePresentation"],
                "id": "urn:uuid:vp",
                "holder": "did:example:holder",
                "verifier": ["did:example:verifier"],
                "issuanceDate": "2020-09-13T12:26:40.000Z",
                "verifiableCredential": [{
                    "@context": ["https://www.w3.org/2018/credentials/v1"],
                    "type": ["VerifiableCredential"],
                    "issuer": { "id": "did:example:issuer" },
                    "credentialSubject": { "id": "did:example:holder", "name": "Alice" },
                    "issuanceDate": "2020-09-13T12:26:40.000Z",
                    "proof": {}
                }]
            })
        );
    }

    #[test]
    fn credentials_are_concatenated_top_level_first() {
        let normalized = normalize(json!({
            "verifiableCredential": { "id": "urn:first" },
            "vp": { "verifiableCredential": [null, { "id": "urn:second" }] }
        }));
        let ids: Vec<_> = normalized["verifiableCredential"]
            .as_array()
            .unwrap()
            .iter()
            .map(|vc| vc["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("urn:first"), json!("urn:second")]);
    }

    #[test]
    fn verifier_union_only_with_aud() {
        let normalized = normalize(json!({
            "verifier": ["did:a", "did:b"],
            "aud": ["did:b", "did:c"]
        }));
        assert_eq!(normalized["verifier"], json!(["did:a", "did:b", "did:c"]));
        assert!(normalized.get("aud").is_none());

        let normalized = normalize(json!({ "verifier": "did:a" }));
        assert_eq!(normalized["verifier"], json!(["did:a"]));
    }

    #[test]
    fn explicit_holder_keeps_iss() {
        let normalized = normalize(json!({
            "iss": "did:example:iss",
            "holder": "did:example:holder"
        }));
        assert_eq!(normalized["holder"], json!("did:example:holder"));
        assert_eq!(normalized["iss"], json!("did:example:iss"));
    }

    #[test]
    fn declared_id_keeps_jti() {
        let normalized = normalize(json!({ "id": null, "jti": "urn:a" }));
        assert_eq!(normalized.get("id"), Some(&Value::Null));
        assert_eq!(normalized["jti"], json!("urn:a"));
    }

    #[test]
    fn embedded_credential_errors_propagate() {
        let object = json!({ "verifiableCredential": ["not.a.valid.jwt.token"] });
        let object = object.as_object().unwrap().clone();
        assert!(matches!(
            normalize_claims(object, &Normalizer::new()),
            Err(Error::UnknownCredentialFormat)
        ));
    }

    #[test]
    fn original_fields_can_be_kept() {
        let normalized = normalize_with(
            json!({
                "iss": "did:example:holder",
                "aud": ["did:example:verifier"],
                "vp": { "type": ["VerifiablePresentation"], "verifiableCredential": [] }
            }),
            NormalizeOptions {
                remove_original_fields: false,
            },
        );
        assert_eq!(normalized["iss"], json!("did:example:holder"));
        assert_eq!(normalized["aud"], json!(["did:example:verifier"]));
        assert_eq!(
            normalized["vp"],
            json!({ "type": ["VerifiablePresentation"], "verifiableCredential": [] })
        );
    }
}
