pub mod catalog;
pub mod compare;
pub mod config;
pub mod insights;
pub mod status;
pub mod watch;
