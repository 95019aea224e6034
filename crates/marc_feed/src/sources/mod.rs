pub mod memory;
pub mod newsapi;
