//! Archive transformation pipeline.
//!
//! Streams entries out of the source zip in their stored order. Entries
//! without a registered chain are copied raw, keeping their compressed data
//! and metadata byte-identical. Entries with a chain are decoded as UTF-8,
//! folded through the chain, and written back deflated, or omitted when the
//! chain signals deletion.
//!
//! The target is written as a `.part` sibling and renamed into place only
//! after the whole run succeeded, so a failed run never leaves a target
//! archive behind.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::FixError;
use crate::registry::{Outcome, Registry};
use crate::report::RunSummary;

/// Transforms `source` into `target`, applying the registered chains.
///
/// # Errors
///
/// Any chain failure, invalid UTF-8 in a chained entry, or I/O error aborts
/// the run. The partial target file is removed on failure.
#[tracing::instrument(skip(registry), fields(source = %source.display(), target = %target.display()))]
pub fn transform_zip(
    source: &Path,
    target: &Path,
    registry: &Registry,
) -> Result<RunSummary, FixError> {
    let mut archive = ZipArchive::new(File::open(source)?)?;
    let part_path = partial_path(target);

    match write_entries(&mut archive, &part_path, registry) {
        Ok(summary) => {
            fs::rename(&part_path, target)?;
            info!(
                entries = summary.entries,
                copied = summary.copied,
                transformed = summary.transformed,
                deleted = summary.deleted,
                "Archive written"
            );
            Ok(summary)
        }
        Err(err) => {
            let _ = fs::remove_file(&part_path);
            Err(err)
        }
    }
}

fn write_entries(
    archive: &mut ZipArchive<File>,
    part_path: &Path,
    registry: &Registry,
) -> Result<RunSummary, FixError> {
    let mut writer = ZipWriter::new(File::create(part_path)?);
    let mut summary = RunSummary {
        entries: archive.len(),
        ..Default::default()
    };

    for index in 0..archive.len() {
        let name = archive.by_index_raw(index)?.name().to_string();

        if !registry.contains(&name) {
            // Raw copy: the stored compressed data is moved over untouched.
            let entry = archive.by_index_raw(index)?;
            writer.raw_copy_file(entry)?;
            summary.copied += 1;
            debug!(entry = %name, "Copied without modification");
            continue;
        }

        let mut raw = Vec::new();
        archive.by_index(index)?.read_to_end(&mut raw)?;
        let text = String::from_utf8(raw).map_err(|source| FixError::InvalidUtf8 {
            entry: name.clone(),
            source,
        })?;

        let outcome = registry
            .apply(&name, &text)
            .map_err(|source| FixError::Transform {
                entry: name.clone(),
                source: Box::new(source),
            })?;

        match outcome {
            Outcome::Continue(output) => {
                let options: FileOptions<'_, ()> =
                    FileOptions::default().compression_method(CompressionMethod::Deflated);
                writer.start_file(name.as_str(), options)?;
                writer.write_all(output.as_bytes())?;
                summary.transformed += 1;
                debug!(entry = %name, "Rewrote entry");
            }
            Outcome::Delete => {
                summary.deleted += 1;
                info!(entry = %name, "Deleted entry from archive");
            }
        }
    }

    writer.finish()?;
    Ok(summary)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut file_name = target
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".part");
    target.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path_appends_part_suffix() {
        let path = partial_path(Path::new("/tmp/out/target.zip"));
        assert_eq!(path, Path::new("/tmp/out/target.zip.part"));
    }
}
