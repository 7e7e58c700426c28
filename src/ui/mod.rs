pub mod dashboard;
pub mod landing;
pub mod lead_row;
pub mod login;
