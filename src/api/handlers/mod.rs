//! Request handlers

pub mod news;
pub mod portfolio;
pub mod stream;
pub mod trades;
