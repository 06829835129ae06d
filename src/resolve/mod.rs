pub mod field_order;
pub mod target;
