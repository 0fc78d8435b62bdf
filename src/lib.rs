pub mod api;
pub mod article;
pub mod commands;
pub mod feed_page;
mod http;
pub mod session;
