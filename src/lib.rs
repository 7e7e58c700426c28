pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod contact;
pub mod filter;
pub mod leads;
pub mod session;
pub mod storage;
pub mod ui;
pub mod utils;
