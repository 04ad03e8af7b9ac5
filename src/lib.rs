pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod layout;
pub mod logger;
pub mod panes;
pub mod project;
pub mod theme;
