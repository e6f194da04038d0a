//! Remote repository access: URL parsing, the write seam, and the GitHub
//! client behind it.

pub mod error;
pub mod github;
pub mod reference;
pub mod writer;

pub use error::{AccessError, UploadError};
pub use github::GithubClient;
pub use reference::RepoReference;
pub use writer::{FileWrite, RemoteRepo};
