//! Core types shared by the credential and presentation mappings.
pub mod field;
pub use field::Field;

pub mod one_or_many;
pub use one_or_many::OneOrMany;

pub mod ordered_set;
pub use ordered_set::OrderedSet;
