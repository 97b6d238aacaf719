pub mod config;
pub mod error;
pub mod graph;
pub mod pose;
pub mod tensor;
pub mod tracker;
