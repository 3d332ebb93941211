use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vc_interop_core::OneOrMany;

/// Proof type attached to material decoded from a JWT.
pub const JWT_PROOF_TYPE: &str = "JwtProof2020";

/// Proof attached to a normalized credential or presentation.
///
/// Normalization never checks proofs. A JWT-sourced value carries
/// `{"type": "JwtProof2020", "jwt": <compact JWT>}`; embedded proofs are
/// carried over with all of their properties.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Proof {
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl Proof {
    /// Proof for a value decoded from `jwt`.
    pub fn from_jwt(jwt: &str) -> Self {
        Self {
            type_: Some(OneOrMany::One(JWT_PROOF_TYPE.to_owned())),
            jwt: Some(jwt.to_owned()),
            property_set: Map::new(),
        }
    }
}

/// `proof` member of a credential or presentation.
///
/// Proofs that do not have the shape of [`Proof`], such as a bare string or
/// an explicit `null`, are carried over as they are.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Proofs {
    Typed(OneOrMany<Proof>),
    Other(Value),
}

impl Default for Proofs {
    fn default() -> Self {
        Self::Typed(OneOrMany::One(Proof::default()))
    }
}

impl From<Proof> for Proofs {
    fn from(proof: Proof) -> Self {
        Self::Typed(OneOrMany::One(proof))
    }
}

impl Proofs {
    /// Proofs of the [`Proof`] shape; none for [`Proofs::Other`].
    pub fn iter(&self) -> impl Iterator<Item = &Proof> {
        let proofs = match self {
            Self::Typed(proofs) => Some(proofs.iter()),
            Self::Other(_) => None,
        };
        proofs.into_iter().flatten()
    }
}

/// `T` together with its proof.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Verifiable<T> {
    #[serde(flatten)]
    pub claims: T,
    pub proof: Proofs,
}

impl<T> Verifiable<T> {
    pub fn new(claims: T, proof: impl Into<Proofs>) -> Self {
        Self {
            claims,
            proof: proof.into(),
        }
    }

    /// Compact JWT this value was decoded from, if any.
    pub fn jwt(&self) -> Option<&str> {
        self.proof.iter().find_map(|proof| proof.jwt.as_deref())
    }
}

impl<T> Deref for Verifiable<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.claims
    }
}

impl<T> DerefMut for Verifiable<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.claims
    }
}
