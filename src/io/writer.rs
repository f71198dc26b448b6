use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::report::{RecoveryResult, Report};

const REPORT_FILE: &str = "report.json";

/// Flatten a carved filename into one safe path component.
///
/// Separators, drive colons and control characters become `_`, and `..`
/// can no longer climb out of the output directory.
pub fn safe_name(name: &str) -> String {
    let flat: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let flat = flat.replace("..", "_");
    if flat.trim_matches(['_', '.', ' ']).is_empty() {
        "unnamed".to_string()
    } else {
        flat
    }
}

/// Files touched by one [`ReportWriter::write`] call
#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    /// Already present and left alone
    pub existing: Vec<PathBuf>,
}

/// Writes recovered entries of a report into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    overwrite: bool,
    save_failed: bool,
    json: bool,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
            save_failed: false,
            json: false,
        }
    }

    pub fn overwrite(mut self, yes: bool) -> Self {
        self.overwrite = yes;
        self
    }

    /// Also write raw payloads of entries nothing could recover
    pub fn save_failed(mut self, yes: bool) -> Self {
        self.save_failed = yes;
        self
    }

    /// Also write `report.json`
    pub fn json(mut self, yes: bool) -> Self {
        self.json = yes;
        self
    }

    /// Output path of the entry at `index`
    pub fn entry_path(&self, index: usize, name: &str, failed: bool) -> PathBuf {
        let suffix = if failed { ".raw.bin" } else { "" };
        self.dir
            .join(format!("{:03}_{}{}", index, safe_name(name), suffix))
    }

    /// Write every entry of `report`; `buffer` is the buffer it was carved
    /// from and supplies raw payloads for failed entries.
    pub async fn write(&self, report: &Report, buffer: &[u8]) -> Result<WriteSummary> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("cannot create {}", self.dir.display()))?;

        let mut summary = WriteSummary::default();
        for (index, (entry, result)) in report.iter().enumerate() {
            let (path, data) = match result {
                RecoveryResult::Recovered { bytes, .. } => {
                    (self.entry_path(index, &entry.file_name, false), &bytes[..])
                }
                RecoveryResult::Failed { .. } if self.save_failed => (
                    self.entry_path(index, &entry.file_name, true),
                    entry.payload(buffer),
                ),
                RecoveryResult::Failed { .. } => continue,
            };
            self.write_file(&path, data, &mut summary).await?;
        }

        if self.json {
            let path = self.dir.join(REPORT_FILE);
            let json = report.to_json()?;
            self.write_file(&path, json.as_bytes(), &mut summary).await?;
        }

        Ok(summary)
    }

    async fn write_file(&self, path: &Path, data: &[u8], summary: &mut WriteSummary) -> Result<()> {
        if !self.overwrite && fs::try_exists(path).await? {
            tracing::info!(path = %path.display(), "exists, not overwriting");
            summary.existing.push(path.to_path_buf());
            return Ok(());
        }

        let mut file = fs::File::create(path)
            .await
            .with_context(|| format!("cannot create {}", path.display()))?;
        file.write_all(data).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), len = data.len(), "written");
        summary.written.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_names() {
        assert_eq!(safe_name("REPORT.TXT"), "REPORT.TXT");
        assert_eq!(safe_name("dir/sub\\file"), "dir_sub_file");
        assert_eq!(safe_name("../../etc/passwd"), "____etc_passwd");
        assert_eq!(safe_name("C:\\x"), "C__x");
        assert_eq!(safe_name("a\0b"), "a_b");
        assert_eq!(safe_name(""), "unnamed");
        assert_eq!(safe_name(".."), "unnamed");
    }

    #[test]
    fn entry_paths_are_indexed() {
        let writer = ReportWriter::new("/out");
        assert_eq!(
            writer.entry_path(7, "A", false),
            PathBuf::from("/out/007_A")
        );
        assert_eq!(
            writer.entry_path(12, "x/y", true),
            PathBuf::from("/out/012_x_y.raw.bin")
        );
    }
}
