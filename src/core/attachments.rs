//! Local stand-in for the blob channel: bill images are copied into a
//! directory and only the returned relative path is stored on the record.

use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::transaction::TransactionRecord;
use chrono::{Duration, Local};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub struct AttachmentStore {
    root: PathBuf,
}

fn sanitize(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "shop".to_string()
    } else {
        trimmed.to_string()
    }
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under `owner_key` and return the stored path, relative
    /// to the store root.
    pub fn upload(&self, bytes: &[u8], owner_key: &str, file_name: &str) -> AppResult<String> {
        let owner = sanitize(owner_key);
        let dir = self.root.join(&owner);
        fs::create_dir_all(&dir)?;

        let name = format!(
            "{}-{}-{}",
            Local::now().format("%Y%m%d%H%M%S"),
            uuid::Uuid::new_v4().simple(),
            sanitize(file_name)
        );
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&name))
            .and_then(|mut f| f.write_all(bytes))?;

        Ok(format!("{}/{}", owner, name))
    }

    /// Read a local file and upload it.
    pub fn upload_file(&self, src: &Path, owner_key: &str) -> AppResult<String> {
        let bytes = fs::read(src)?;
        let file_name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Validation(format!("not a file: {}", src.display())))?;

        self.upload(&bytes, owner_key, &file_name)
    }

    /// Delete a stored document. A file that is already gone is not an error.
    pub fn remove(&self, path: &str) -> AppResult<()> {
        match fs::remove_file(self.root.join(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the documents of `removed` that no record left in `ledger`
    /// still points to. Returns how many files were released.
    pub fn release_unreferenced(
        &self,
        ledger: &Ledger,
        removed: &[TransactionRecord],
    ) -> AppResult<usize> {
        let mut released = 0;

        for doc in removed
            .iter()
            .filter_map(|r| r.income().and_then(|d| d.document.as_deref()))
        {
            let still_used = ledger
                .iter()
                .any(|r| r.income().and_then(|d| d.document.as_deref()) == Some(doc));
            if !still_used {
                self.remove(doc)?;
                released += 1;
            }
        }

        Ok(released)
    }

    /// Time-limited link to a stored document, valid for `ttl_minutes`.
    pub fn access_url(&self, path: &str, ttl_minutes: i64) -> AppResult<String> {
        let expires = Duration::try_minutes(ttl_minutes.max(1))
            .and_then(|ttl| Local::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Validation(format!("link lifetime of {ttl_minutes} minutes is too long"))
            })?;

        Ok(format!(
            "file://{}?expires={}",
            self.root.join(path).display(),
            expires.timestamp()
        ))
    }
}
