//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_metadata_source;
mod in_memory_session_source;
mod json_directory_source;

pub use in_memory_metadata_source::InMemoryMetadataSource;
pub use in_memory_session_source::InMemorySessionSource;
pub use json_directory_source::{JsonDirectorySource, read_json_file};
