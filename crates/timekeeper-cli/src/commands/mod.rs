pub mod completions;
pub mod config;
pub mod notify;
pub mod plan;
pub mod run;
