pub mod analysis;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod link_budget;
pub mod predict;
pub mod scheduler;
pub mod units;
