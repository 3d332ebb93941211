//! Normalization of Verifiable Credentials and Presentations between the two
//! shapes they are exchanged in:
//! - the [W3C Verifiable Credentials Data Model][vc-data-model] JSON-LD
//!   shape (`issuer`, `credentialSubject`, `issuanceDate`, ...); and
//! - the [JWT claims encoding][jwt-vc] (`iss`, `sub`, `nbf`, ... with the
//!   credential itself nested in a `vc` or `vp` claim).
//!
//! [vc-data-model]: <https://www.w3.org/TR/vc-data-model/>
//! [jwt-vc]: <https://www.w3.org/TR/vc-data-model/#json-web-token>
//!
//! # Basic Usage
//!
//! ```
//! use serde_json::json;
//!
//! // Decoded JWT-VC claims.
//! let claims = json!({
//!   "iss": "did:example:issuer",
//!   "sub": "did:example:alice",
//!   "nbf": 1600000000,
//!   "vc": {
//!     "@context": ["https://www.w3.org/2018/credentials/v1"],
//!     "type": ["VerifiableCredential"],
//!     "credentialSubject": { "name": "Alice" }
//!   }
//! });
//!
//! let vc = vc_interop::normalize_credential(&claims).unwrap();
//! assert_eq!(vc.issuer_id(), Some("did:example:issuer"));
//! assert_eq!(vc.issuance_date.value().unwrap(), "2020-09-13T12:26:40.000Z");
//! vc.validate().unwrap();
//!
//! // And back.
//! let w3c = serde_json::to_value(&vc.claims).unwrap();
//! let payload = vc_interop::transform_credential_input(&w3c).unwrap();
//! assert_eq!(payload.iss.value().unwrap(), "did:example:issuer");
//! assert_eq!(payload.sub.value().unwrap(), "did:example:alice");
//! ```
//!
//! Normalization also accepts compact JWTs, JSON text and objects whose
//! `proof.jwt` holds the JWT they came from. JWTs are decoded through a
//! [`JwtDecoder`](jwt::JwtDecoder); the free functions use
//! [`UnverifiedDecoder`](jwt::UnverifiedDecoder), which does not check
//! signatures. Use a [`Normalizer`] to plug in another decoder or to change
//! the [`NormalizeOptions`].
mod context;
mod credential;
mod error;
mod format;
mod normalizer;
mod options;
mod presentation;
mod proof;
mod reconcile;

// Re-export core types.
#[doc(hidden)]
pub use vc_interop_core::*;

/// JSON Web Token (JWT) decoding and dates.
///
/// See: <https://www.rfc-editor.org/rfc/rfc7519>
#[doc(inline)]
pub use vc_interop_jwt as jwt;

pub use context::{Context, DEFAULT_CONTEXT, DEFAULT_CONTEXT_V2};
pub use credential::{
    Credential, CredentialSubject, Issuer, JwtCredentialEnvelope, JwtCredentialPayload,
    ObjectWithId, VerifiableCredential, DEFAULT_VC_TYPE,
};
pub use error::Error;
pub use normalizer::{
    normalize_credential, normalize_presentation, transform_credential_input,
    transform_presentation_input, Normalizer,
};
pub use options::NormalizeOptions;
pub use presentation::{
    CredentialOrJwt, Holder, JwtPresentationEnvelope, JwtPresentationPayload, Presentation,
    VerifiablePresentation, DEFAULT_VP_TYPE,
};
pub use proof::{Proof, Proofs, Verifiable, JWT_PROOF_TYPE};
