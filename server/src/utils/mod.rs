pub mod current_user;
pub mod error;
pub mod extract;
pub mod response;
