pub mod db;
pub mod seed;
pub mod selection;
pub mod server;
pub mod settings;
pub mod telemetry;
