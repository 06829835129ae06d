pub mod builder;
pub mod stage;
