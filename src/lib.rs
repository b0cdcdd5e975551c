pub mod analyzers;
pub mod checker;
pub mod columns;
pub mod config;
pub mod output;
pub mod parser;
pub mod prompt;
pub mod roster;
