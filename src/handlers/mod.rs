pub mod health;
pub mod stats;
pub mod transfer;
pub mod wins;
