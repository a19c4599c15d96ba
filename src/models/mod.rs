pub mod stats;
pub mod win;
