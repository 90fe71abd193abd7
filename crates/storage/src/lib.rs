#![forbid(unsafe_code)]

pub mod fs;
pub mod http;
pub mod repository;

pub use repository::{DocumentSource, InMemorySource, Storage, StorageError};
