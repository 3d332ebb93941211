//! JSON Web Token (JWT) support: compact token decoding and the
//! `NumericDate` claim type.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc7519>

mod decode;
mod numeric_date;

pub use decode::{is_compact_jwt, split_jwt, DecodeError, DecodedJwt, JwtDecoder, UnverifiedDecoder};
pub use numeric_date::{NumericDate, NumericDateConversionError};
