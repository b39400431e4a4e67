#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod gateway;
pub mod messages;
pub mod permissions;
pub mod players;
pub mod settings;
pub mod utils;
