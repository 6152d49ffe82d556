pub mod app;
pub mod clean;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod fs_util;
pub mod listing;
pub mod output;
pub mod races;
pub mod site;
pub mod store;
