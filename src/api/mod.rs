pub mod client;
pub mod error;
pub mod links;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{ContactRequest, Lead, LeadStatus};
