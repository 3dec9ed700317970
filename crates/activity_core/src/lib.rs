pub mod board;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod model;
pub mod seed;
