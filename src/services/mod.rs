//! Service implementations for the Memic API.

pub mod files;
pub mod projects;
pub mod search;

pub use files::{FilesService, FilesServiceImpl};
pub use projects::{ProjectsService, ProjectsServiceImpl};
pub use search::{SearchService, SearchServiceImpl};
