use std::{
    ffi::{OsStr, OsString},
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::errors::IoError;

use super::archive_stamp;

pub fn file_exists(file_name: &Path) -> bool {
    File::open(file_name).is_ok()
}

pub fn read_file(file_name: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(file_name)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

pub fn create_directories_if_needed(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| IoError::with_context("create directory", &parent.display().to_string(), e))?;
        }
    }
    Ok(())
}

/* A new version of `target` written to a sibling temp file. Nothing is replaced until commit. */
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
    previous: Option<Vec<u8>>,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        return &self.target;
    }

    fn discard(&self) {
        let _ = fs::remove_file(&self.tmp);
    }

    /* Put back what was there before this file was committed */
    fn restore(&self) {
        let _ = match &self.previous {
            Some(contents) => fs::write(&self.target, contents),
            None => fs::remove_file(&self.target),
        };
    }
}

pub fn stage_file(path: &Path, contents: &[u8]) -> Result<StagedFile, IoError> {
    if path.is_dir() {
        return Err(IoError::new(format!("Cannot write '{}': is a directory", path.display())));
    }
    create_directories_if_needed(path)?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents).map_err(|e| IoError::with_context("write", &tmp.display().to_string(), e))?;
    return Ok(StagedFile {
        tmp,
        target: path.to_path_buf(),
        previous: read_file(path).ok(),
    });
}

/* Stage every output or none of them */
pub fn stage_files(outputs: &[(&Path, &[u8])]) -> Result<Vec<StagedFile>, IoError> {
    let mut staged: Vec<StagedFile> = Vec::new();
    for (path, contents) in outputs {
        match stage_file(path, contents) {
            Ok(file) => staged.push(file),
            Err(e) => {
                staged.iter().for_each(StagedFile::discard);
                return Err(e);
            }
        }
    }
    return Ok(staged);
}

/* Rename every staged file into place. When one rename fails, the files already replaced get their
previous contents back and the remaining temp files are removed. */
pub fn commit_staged(staged: Vec<StagedFile>) -> Result<(), IoError> {
    let mut committed: Vec<StagedFile> = Vec::new();
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        if let Err(e) = fs::rename(&file.tmp, &file.target) {
            file.discard();
            pending.by_ref().for_each(|rest| rest.discard());
            committed.iter().rev().for_each(StagedFile::restore);
            return Err(IoError::with_context("replace", &file.target.display().to_string(), e));
        }
        committed.push(file);
    }
    Ok(())
}

pub fn sha256_hex(contents: &[u8]) -> String {
    return hex::encode(Sha256::digest(contents));
}

/* None when there is no previous file to compare with */
pub fn file_digest(path: &Path) -> Option<String> {
    return read_file(path).ok().map(|contents| sha256_hex(&contents));
}

#[cfg(windows)]
const CROSS_DEVICE: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(windows))]
const CROSS_DEVICE: i32 = 18; // EXDEV

fn archive_name(stamp: &str, attempt: usize, file_name: &OsStr) -> OsString {
    let mut name = if attempt == 0 {
        OsString::from(format!("{stamp}_"))
    } else {
        OsString::from(format!("{stamp}_{attempt}_"))
    };
    name.push(file_name);
    return name;
}

/* Move `source` into `archive_dir` as `<stamp>_<file name>`, returns the new location.

An earlier archive is never overwritten: a second export archived within the same second gets
`<stamp>_1_<file name>`, then `_2_`...
*/
pub fn archive_file(source: &Path, archive_dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, IoError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| IoError::new(format!("Cannot archive '{}': not a file", source.display())))?;

    fs::create_dir_all(archive_dir)
        .map_err(|e| IoError::with_context("create directory", &archive_dir.display().to_string(), e))?;

    let stamp = archive_stamp(now);
    let mut attempt = 0;
    let mut target = archive_dir.join(archive_name(&stamp, attempt, file_name));
    while target.exists() {
        attempt += 1;
        target = archive_dir.join(archive_name(&stamp, attempt, file_name));
    }

    match fs::rename(source, &target) {
        Ok(()) => {}
        Err(e) if e.raw_os_error() == Some(CROSS_DEVICE) => {
            fs::copy(source, &target)
                .map_err(|e| IoError::with_context("archive", &source.display().to_string(), e))?;
            if let Err(e) = fs::remove_file(source) {
                // Keep the export in exactly one place
                let _ = fs::remove_file(&target);
                return Err(IoError::with_context("remove", &source.display().to_string(), e));
            }
        }
        Err(e) => return Err(IoError::with_context("archive", &source.display().to_string(), e)),
    }
    return Ok(target);
}

/* Fresh directory under .data_test for tests touching the filesystem */
#[cfg(test)]
pub fn reset_test_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(".data_test").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}
