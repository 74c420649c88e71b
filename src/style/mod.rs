//! The computed-style data model (spec §3, §9).

pub mod compute;
pub mod properties;
pub mod uncommon;

pub use compute::ComputedStyle;
pub use properties::PropertyId;
