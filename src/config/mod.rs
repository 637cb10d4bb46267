pub mod database;
pub mod google;
pub mod jwt;
