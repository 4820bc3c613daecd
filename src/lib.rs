pub mod action_log;
pub mod api;
pub mod config;
pub mod credentials;
pub mod data_models;
pub mod error;
pub mod language_detector;
pub mod result_writer;
pub mod search_client;
