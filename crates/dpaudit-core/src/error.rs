use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("unable to access backup archive {path}: {source}")]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed backup archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive member not found: {0}")]
    MemberMissing(String),

    #[error("malformed configuration document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed configuration document: {0}")]
    MalformedDocument(String),

    #[error("configuration document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
