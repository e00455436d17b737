pub mod admin;
pub mod favorites;
pub mod news;
