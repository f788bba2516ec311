pub mod health;
pub mod sharing;
