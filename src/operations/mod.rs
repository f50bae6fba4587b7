pub mod query;
pub mod reshape;
pub mod resolve;
