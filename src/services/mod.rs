pub mod activity;
pub mod streak;
