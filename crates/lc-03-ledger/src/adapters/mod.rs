//! Adapters implementing the outbound ports

pub mod archive;

pub use archive::InMemoryArchive;
