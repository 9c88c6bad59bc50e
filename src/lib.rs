// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod models;
pub mod proxy;
pub mod upstream;
pub mod validator;
