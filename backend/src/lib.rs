pub mod config;
pub mod content;
pub mod documents;
pub mod error;
pub mod generation;
pub mod placeholders;
pub mod registry;
pub mod services;
pub mod state;
