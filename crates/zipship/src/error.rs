use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipshipError {
    #[error("Submission rejected: {0}")]
    Validation(#[from] crate::upload::ValidationError),

    #[error("Repository access error: {0}")]
    Access(#[from] crate::remote::AccessError),

    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),

    #[error("Upload error: {0}")]
    Upload(#[from] crate::remote::UploadError),
}

pub type Result<T> = std::result::Result<T, ZipshipError>;
