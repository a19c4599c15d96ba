pub mod pool;
pub mod store;
mod transfer;

pub use pool::{create_memory_pool, create_pool, migrate};
pub use store::WinStore;
