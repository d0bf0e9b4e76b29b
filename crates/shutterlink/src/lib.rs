pub mod config;
pub mod errors;
pub mod models;
pub mod qr;
pub mod services;
pub mod validation;
pub mod web;
