use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::common::errors::SweepError;
use crate::common::format;

/// Free space on one filesystem at one moment
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceSample {
    pub available_bytes: u64,
    pub filesystem_root: PathBuf,
    pub taken_at: DateTime<Utc>,
}

/// Measures available space on the filesystem mounted at `root`
#[derive(Debug, Clone)]
pub struct SpaceMeter {
    root: PathBuf,
}

impl SpaceMeter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Take a sample via `df -Pk`
    pub fn sample(&self) -> Result<SpaceSample, SweepError> {
        let measurement_error = |message: String| SweepError::Measurement {
            root: self.root.clone(),
            message,
        };

        let out = std::process::Command::new("df")
            .arg("-Pk")
            .arg(&self.root)
            .output()
            .map_err(|e| measurement_error(format!("failed to run df: {}", e)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(measurement_error(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        let available_kib = parse_df_available(&stdout)
            .ok_or_else(|| measurement_error("unrecognised df output".to_string()))?;

        Ok(SpaceSample {
            available_bytes: available_kib.saturating_mul(1024),
            filesystem_root: self.root.clone(),
            taken_at: Utc::now(),
        })
    }
}

/// Pull the "Available" column (KiB) out of POSIX `df -Pk` output.
///
/// Filesystem names and mount points may contain spaces, so the column is
/// located relative to the capacity field (the one ending in `%`).
pub fn parse_df_available(output: &str) -> Option<u64> {
    let line = output.lines().skip(1).find(|l| !l.trim().is_empty())?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    let capacity = fields.iter().position(|f| f.ends_with('%'))?;
    if capacity < 1 {
        return None;
    }
    fields[capacity - 1].parse().ok()
}

/// Signed change in free space between two samples
pub fn reclaimed(before: &SpaceSample, after: &SpaceSample) -> i128 {
    after.available_bytes as i128 - before.available_bytes as i128
}

/// Human summary of reclaimed space, "unknown" when either sample is missing
pub fn describe_reclaimed(before: Option<&SpaceSample>, after: Option<&SpaceSample>) -> String {
    match (before, after) {
        (Some(b), Some(a)) => format::to_human(reclaimed(b, a)),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(available_bytes: u64) -> SpaceSample {
        SpaceSample {
            available_bytes,
            filesystem_root: PathBuf::from("/"),
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_df_linux() {
        let out = "Filesystem     1024-blocks     Used Available Capacity Mounted on\n\
                   /dev/nvme0n1p2   479151816 81234567 373517249      18% /\n";
        assert_eq!(parse_df_available(out), Some(373517249));
    }

    #[test]
    fn test_parse_df_macos_with_spaces() {
        let out = "Filesystem     1024-blocks      Used Available Capacity  Mounted on\n\
                   map auto_home            0         0         0   100%    /System/Volumes/Data/home\n";
        assert_eq!(parse_df_available(out), Some(0));

        let out = "Filesystem 1024-blocks Used Available Capacity Mounted on\n\
                   /dev/disk3s1s1 482797652 10032276 212345678 5% /Volumes/My Disk\n";
        assert_eq!(parse_df_available(out), Some(212345678));
    }

    #[test]
    fn test_parse_df_garbage() {
        assert_eq!(parse_df_available(""), None);
        assert_eq!(parse_df_available("Filesystem only header\n"), None);
        assert_eq!(parse_df_available("h\n/dev/x 1 2 lots 5% /\n"), None);
    }

    #[test]
    fn test_reclaimed_delta() {
        assert_eq!(reclaimed(&sample(1000), &sample(3048)), 2048);
        assert_eq!(reclaimed(&sample(3048), &sample(1000)), -2048);
    }

    #[test]
    fn test_describe_reclaimed() {
        assert_eq!(
            describe_reclaimed(Some(&sample(0)), Some(&sample(1536))),
            "1.50 KiB"
        );
        assert_eq!(
            describe_reclaimed(Some(&sample(5000)), Some(&sample(10))),
            "0 Bytes"
        );
        assert_eq!(describe_reclaimed(None, Some(&sample(10))), "unknown");
        assert_eq!(describe_reclaimed(Some(&sample(10)), None), "unknown");
    }

    #[test]
    fn test_sample_root_filesystem() {
        let meter = SpaceMeter::new("/");
        let s = meter.sample().unwrap();
        assert_eq!(s.filesystem_root, PathBuf::from("/"));
    }

    #[test]
    fn test_sample_unreachable_root_is_measurement_error() {
        let meter = SpaceMeter::new("/definitely/not/a/mount/point");
        let err = meter.sample().unwrap_err();
        assert!(matches!(err, SweepError::Measurement { .. }));
    }
}
