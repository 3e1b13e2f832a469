pub mod batch;
pub mod config;
pub mod parse;
pub mod parsers;
