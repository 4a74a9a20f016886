pub mod check_schema;
pub mod validate;
