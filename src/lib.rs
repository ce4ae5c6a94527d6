pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod output;
pub mod parser;
pub mod records;
pub mod store;
