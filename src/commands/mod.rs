pub mod config;
pub mod ics;
pub mod render;
