//! Building blocks shared by the credential and presentation mappings.
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use vc_interop_core::{Field, OneOrMany, OrderedSet};
use vc_interop_jwt::NumericDate;

use crate::{Error, NormalizeOptions};

/// Members of the output object not covered by a typed field.
///
/// Starts from the input members no typed field claimed, then collects the
/// input members each mapping rule leaves behind.
pub(crate) struct PropertySet<'a> {
    properties: Map<String, Value>,
    options: &'a NormalizeOptions,
}

impl<'a> PropertySet<'a> {
    pub fn new(properties: Map<String, Value>, options: &'a NormalizeOptions) -> Self {
        Self {
            properties,
            options,
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_owned(), value);
    }

    /// Carries over a member no rule consumed.
    pub fn keep<T: Serialize>(&mut self, key: &str, field: Field<T>) -> Result<(), Error> {
        match field {
            Field::Absent => (),
            Field::Null => self.insert(key, Value::Null),
            Field::Present(value) => self.insert(key, serde_json::to_value(value)?),
        }
        Ok(())
    }

    /// Carries over a member a rule consumed, unless original fields are
    /// removed.
    pub fn retain<T: Serialize>(&mut self, key: &str, field: Field<T>) -> Result<(), Error> {
        self.keep(key, self.options.retained(field))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.properties
    }
}

/// Deduplicated union of scalar-or-array members, in argument order.
pub(crate) fn union<T, const N: usize>(fields: [Field<OneOrMany<T>>; N]) -> OrderedSet<T>
where
    T: PartialEq,
{
    fields
        .into_iter()
        .filter_map(Field::into_value)
        .flatten()
        .collect()
}

/// Flattens a `verifiableCredential`-like member into its entries, skipping
/// `null`s.
pub(crate) fn entries(field: Field<Value>) -> Vec<Value> {
    match field.into_value() {
        Some(Value::Array(values)) => values.into_iter().filter(|v| !v.is_null()).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(value) => vec![value],
    }
}

fn iso_string(seconds: NumericDate) -> Result<String, Error> {
    seconds.to_iso_string().ok_or(Error::TimeError)
}

/// `issuanceDate` from the `nbf` claim, or `iat` when there is no `nbf`.
///
/// An existing `issuanceDate` always wins.
pub(crate) fn issuance_date(
    issuance_date: Field<String>,
    nbf: Field<NumericDate>,
    iat: Field<NumericDate>,
    properties: &mut PropertySet,
) -> Result<Field<String>, Error> {
    match nbf.value().or(iat.value()).copied() {
        Some(seconds) if issuance_date.value().is_none() => {
            if nbf.is_present() {
                properties.retain("nbf", nbf)?;
                properties.keep("iat", iat)?;
            } else {
                properties.keep("nbf", nbf)?;
                properties.retain("iat", iat)?;
            }
            Ok(Field::Present(iso_string(seconds)?))
        }
        _ => {
            properties.keep("nbf", nbf)?;
            properties.keep("iat", iat)?;
            Ok(issuance_date)
        }
    }
}

/// `expirationDate` from the `exp` claim, unless already set.
pub(crate) fn expiration_date(
    expiration_date: Field<String>,
    exp: Field<NumericDate>,
    properties: &mut PropertySet,
) -> Result<Field<String>, Error> {
    match exp.value().copied() {
        Some(seconds) if expiration_date.value().is_none() => {
            properties.retain("exp", exp)?;
            Ok(Field::Present(iso_string(seconds)?))
        }
        _ => {
            properties.keep("exp", exp)?;
            Ok(expiration_date)
        }
    }
}

/// Seconds claim (`nbf`, `exp`) from the date member `key`.
///
/// Only applies when the claim is not declared on the input at all. A date
/// string that does not parse stays where it is.
pub(crate) fn numeric_date(
    key: &str,
    date: Field<String>,
    claim: Field<NumericDate>,
    properties: &mut PropertySet,
) -> Result<Field<NumericDate>, Error> {
    if claim.is_absent() {
        if let Some(value) = date.value() {
            match NumericDate::from_date_string(value) {
                Some(seconds) => {
                    properties.retain(key, date)?;
                    return Ok(Field::Present(seconds));
                }
                None => debug!("leaving unparseable {} in place: {:?}", key, value),
            }
        }
    }
    properties.keep(key, date)?;
    Ok(claim)
}

/// Rejects subject arrays, which have no single `sub` to map to.
pub(crate) fn check_subject_shape(
    object: &Map<String, Value>,
    envelope: &str,
) -> Result<(), Error> {
    let nested = object
        .get(envelope)
        .and_then(|envelope| envelope.get("credentialSubject"));
    match (object.get("credentialSubject"), nested) {
        (Some(Value::Array(_)), _) | (_, Some(Value::Array(_))) => {
            Err(Error::UnsupportedCredentialSubject)
        }
        _ => Ok(()),
    }
}
