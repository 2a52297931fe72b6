pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod filter;
pub mod forms;
pub mod models;
pub mod output;
pub mod pages;
pub mod stats;
pub mod utils;

#[cfg(test)]
mod tests;
