pub mod project;
pub mod validate;
