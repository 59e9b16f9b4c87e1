pub mod command;
pub mod config;
pub mod context;
pub mod errors;
pub mod foxes;
pub mod registry;
pub mod shell;
pub mod streams;
pub mod tools;
pub mod ui;
