pub mod filter;
pub mod migrate;
pub mod project;
