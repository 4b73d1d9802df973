pub mod upload;
pub mod users;
