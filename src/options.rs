use serde::{Deserialize, Serialize};
use vc_interop_core::Field;

/// Options shared by the normalize and transform operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct NormalizeOptions {
    /// Drop the members a mapping rule consumed once their value has been
    /// moved to the target member (`sub` after it became
    /// `credentialSubject.id`, `issuanceDate` after it became `nbf`, ...).
    ///
    /// When `false` both members end up in the output, and an emptied `vc`
    /// or `vp` envelope is kept.
    pub remove_original_fields: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_original_fields: true,
        }
    }
}

impl NormalizeOptions {
    /// What remains of a consumed member in the output.
    pub(crate) fn retained<T>(&self, field: Field<T>) -> Field<T> {
        if self.remove_original_fields {
            Field::Absent
        } else {
            field
        }
    }
}
