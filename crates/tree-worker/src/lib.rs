pub mod config;
pub mod error;
pub mod explore;
pub mod feed;
pub mod report;
