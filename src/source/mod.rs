pub mod metadata;
pub mod probe;
