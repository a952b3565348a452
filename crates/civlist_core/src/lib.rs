pub mod activity;
pub mod client;
pub mod config;
pub mod handlers;
pub mod process;
pub mod report;
pub mod run;
pub mod timestamp;
