pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod filter;
pub mod sarif;
pub mod ui;
pub mod validator;
