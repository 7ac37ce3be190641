// SPDX-License-Identifier: MIT

//! `resources/data_model.fboot`: the append-only deployment log. One line
//! per applied `CREATE`/`WRITE` request, prefixed `<start_fb_name>;<xml>`.
//! Open-or-create, monotonic append, explicit `flush`; no processed/
//! truncate bookkeeping, since the whole file is replayed in order into a
//! fresh `Configuration` at startup rather than resumed from a snapshot.

use crate::error::FbootError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// A decoded line of the deployment log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FbootEntry {
    pub seq: u64,
    pub start_fb_name: String,
    pub raw_request: String,
}

/// Requests containing a `<Watch>` element are never persisted — watches
/// are session state, not deployment state.
pub fn should_persist(raw_request: &str) -> bool {
    !raw_request.contains("<Watch")
}

pub struct FbootLog {
    path: PathBuf,
    file: File,
    seq: u64,
}

impl FbootLog {
    /// Opens (or creates) the log at `path` for appending, counting the
    /// lines already present so `seq` continues from where a prior run
    /// left off.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FbootError> {
        let path = path.as_ref().to_path_buf();
        let seq = if path.exists() {
            BufReader::new(File::open(&path)?).lines().count() as u64
        } else {
            0
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self { path, file, seq })
    }

    /// Appends `start_fb_name;raw_request\n` and returns the new sequence
    /// number. Callers are expected to check `should_persist` first; this
    /// method does not filter.
    pub fn append(&mut self, start_fb_name: &str, raw_request: &str) -> Result<u64, FbootError> {
        writeln!(self.file, "{start_fb_name};{raw_request}")?;
        self.seq += 1;
        Ok(self.seq)
    }

    pub fn flush(&mut self) -> Result<(), FbootError> {
        self.file.flush()?;
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every line of `path` and decodes it into `(start_fb_name,
    /// raw_request)` pairs, in file order. A missing file replays as empty. A
    /// line with no `;` separator is `InvalidFbootState`: the whole replay
    /// aborts so the caller can start an empty graph rather than apply a
    /// partially-understood deployment.
    pub fn replay(path: impl AsRef<Path>) -> Result<Vec<FbootEntry>, FbootError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (start_fb_name, raw_request) = line
                .split_once(';')
                .ok_or(FbootError::MalformedLine { line_no: idx + 1 })?;
            entries.push(FbootEntry {
                seq: (idx + 1) as u64,
                start_fb_name: start_fb_name.to_string(),
                raw_request: raw_request.to_string(),
            });
        }
        Ok(entries)
    }
}
