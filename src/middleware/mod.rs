pub mod article_id;
pub mod auth;
pub mod flash;
