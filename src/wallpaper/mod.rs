pub mod apply;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod store;
pub mod xfce;

#[cfg(test)]
pub mod testing;
