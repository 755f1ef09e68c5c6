pub mod app_state;
pub mod auth;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(test)]
pub mod test_utils;
