// src/core/error.rs
use crate::core::tree::EntryId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VifiError {
    #[error("unknown header line [{line}]")]
    BadHeader { line: String },
    #[error("missing tabulator in [{line}]")]
    MissingSeparator { line: String },
    #[error("invalid entry id in [{line}]")]
    InvalidId { line: String },
    #[error("duplicate path in [{line}]")]
    DuplicatePath { line: String },
    #[error("entry id {id} of [{name}] already in use")]
    IdConflict { id: EntryId, name: String },
    #[error("missing entry id {id} from original tree")]
    SparseIds { id: EntryId },
    #[error("target id {} at [{}] has no original entry", .id, .path.display())]
    UnknownId { id: EntryId, path: PathBuf },
    #[error("in copies outnumber out copies at [{}]", .path.display())]
    CopyAccounting { path: PathBuf },
    #[error("unusable directory for temporary space [{}]", .path.display())]
    TempDir { path: PathBuf },
    #[error("failed to read manifest {}", .file.display())]
    ReadManifest {
        file: PathBuf,
        #[source]
        source: Box<VifiError>,
    },
    #[error("failed to write manifest {}", .file.display())]
    WriteManifest {
        file: PathBuf,
        #[source]
        source: Box<VifiError>,
    },
    #[error("failed to scan directory {}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: Box<VifiError>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl VifiError {
    /// Whether the error stems from bad input rather than a failed
    /// filesystem operation. Decides the process exit code.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            VifiError::Io(_) | VifiError::WalkDir(_) | VifiError::TempDir { .. }
        )
    }
}
