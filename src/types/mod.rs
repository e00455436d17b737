pub mod newsapi;
pub mod theme;
