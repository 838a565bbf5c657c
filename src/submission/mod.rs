pub mod naming;
pub mod pipeline;
pub mod validate;
