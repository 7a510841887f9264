pub mod fetcher;
pub mod manager;
pub mod mutation;
pub mod options;
pub mod reorder;
