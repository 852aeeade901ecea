pub mod cli;
pub mod config;
pub mod git;
pub mod interactive;
pub mod models;
pub mod parser;
pub mod query;
pub mod render;
pub mod reports;
pub mod stats;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
