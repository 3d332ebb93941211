use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Optional JSON object member that remembers whether it was written at all.
///
/// JSON distinguishes a member that is missing from one explicitly set to
/// `null`, and the claim mapping rules depend on that difference: an explicit
/// `"jti": null` still counts as a declared `jti`. `Option<T>` collapses the
/// two cases, so struct fields use `Field<T>` instead, together with
/// `#[serde(default, skip_serializing_if = "Field::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field<T> {
    /// The member is not present.
    Absent,

    /// The member is present with a `null` value.
    Null,

    /// The member is present with a value.
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The member is declared on the object, whatever its value.
    pub fn is_declared(&self) -> bool {
        !self.is_absent()
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Present(t) => Some(t),
            _ => None,
        }
    }

    /// Takes the field out, leaving `Absent` in its place.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns `self` if declared, `other` otherwise.
    ///
    /// This is how an object spread resolves a single key: a declared
    /// member, even `null`, overrides the fallback.
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Absent => other,
            declared => declared,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Present(t) => Field::Present(f(t)),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(t) => Self::Present(t),
            None => Self::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Present(t) => t.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the member exists; `#[serde(default)]` covers
        // the absent case.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(t) => Self::Present(t),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        #[serde(default, skip_serializing_if = "Field::is_absent")]
        jti: Field<String>,
    }

    #[test]
    fn tri_state_deserialization() {
        let absent: Claims = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.jti, Field::Absent);

        let null: Claims = serde_json::from_value(json!({ "jti": null })).unwrap();
        assert_eq!(null.jti, Field::Null);
        assert!(null.jti.is_declared());
        assert_eq!(null.jti.value(), None);

        let present: Claims = serde_json::from_value(json!({ "jti": "abc" })).unwrap();
        assert_eq!(present.jti.value().map(String::as_str), Some("abc"));
    }

    #[test]
    fn tri_state_serialization() {
        let value = |jti| serde_json::to_value(Claims { jti }).unwrap();
        assert_eq!(value(Field::Absent), json!({}));
        assert_eq!(value(Field::Null), json!({ "jti": null }));
        assert_eq!(value(Field::Present("abc".into())), json!({ "jti": "abc" }));
    }

    #[test]
    fn declared_member_wins_spread() {
        let fallback = Field::Present(1);
        assert_eq!(Field::Absent.or(fallback.clone()), Field::Present(1));
        assert_eq!(Field::Null.or(fallback.clone()), Field::Null);
        assert_eq!(Field::Present(2).or(fallback), Field::Present(2));
    }
}
