pub mod config;
pub mod logging;

pub mod discovery;
pub mod fetch;
pub mod service;
pub mod store;
pub mod url_model;
