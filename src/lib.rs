pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod lexicon;
pub mod models;
pub mod store;
pub mod templates_structs;
