use crate::error::{AuditError, Result};
use indexmap::IndexMap;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// A fully indexed backup archive: every member read into memory, keyed by
/// its path inside the zip. Domain sub-archives are members of the outer
/// backup and are opened with [`Archive::from_bytes`] in turn.
#[derive(Debug, Clone)]
pub struct Archive {
    members: IndexMap<String, Vec<u8>>,
}

impl Archive {
    /// Open a backup archive from disk. An unreadable or missing file is the
    /// one fatal error class of the whole run.
    pub fn open(path: &Path) -> Result<Archive> {
        let bytes = std::fs::read(path).map_err(|source| AuditError::ArchiveUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Archive> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        let mut members = IndexMap::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;
            members.insert(file.name().to_string(), buf);
        }
        Ok(Archive { members })
    }

    pub fn member(&self, name: &str) -> Option<&[u8]> {
        self.members.get(name).map(Vec::as_slice)
    }

    /// Required member as UTF-8 text (used for `export.xml`).
    pub fn member_text(&self, name: &str) -> Result<&str> {
        let bytes = self
            .member(name)
            .ok_or_else(|| AuditError::MemberMissing(name.to_string()))?;
        Ok(std::str::from_utf8(bytes)?)
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
