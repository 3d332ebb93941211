use thiserror::Error;

/// Error type for `vc-interop`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// String input that is neither a decodable JWT nor JSON text, or an
    /// object whose `proof.jwt` cannot be used
    #[error("unknown credential format")]
    UnknownCredentialFormat,
    #[error("unknown presentation format")]
    UnknownPresentationFormat,
    /// `credentialSubject` holding an array of subjects
    #[error("Not supported: credentialSubject[]")]
    UnsupportedCredentialSubject,
    #[error("expected JSON object")]
    ExpectedJsonObject,
    #[error("Unable to convert date/time")]
    TimeError,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Missing context")]
    MissingContext,
    #[error("Invalid context")]
    InvalidContext,
    #[error("Missing issuer")]
    MissingIssuer,
    #[error("Missing issuance date")]
    MissingIssuanceDate,
    #[error("Invalid issuance date: {0}")]
    InvalidIssuanceDate(String),
    #[error("Missing type VerifiableCredential")]
    MissingTypeVerifiableCredential,
    #[error("Missing type VerifiablePresentation")]
    MissingTypeVerifiablePresentation,
    #[error("Empty credential subject")]
    EmptyCredentialSubject,
}
