pub mod config;
pub mod db;
pub mod frontend;
pub mod server;
