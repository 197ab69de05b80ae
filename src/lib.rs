pub mod cache;
pub mod chart;
pub mod config;
pub mod errors;
pub mod stats;
pub mod tracker;
pub mod web;
