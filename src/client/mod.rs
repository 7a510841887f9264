pub mod cache;
pub mod descriptor;
pub mod transport;
