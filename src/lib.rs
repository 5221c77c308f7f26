pub mod constants;
pub mod engine;
pub mod entity;
pub mod ghost;
pub mod grid;
pub mod log_line;
pub mod player;
pub mod rng;
pub mod scheduler;
pub mod types;
