/// Batch statistics and size formatting for display.
use super::DroppedBatch;

/// Aggregate numbers for one dropped batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropSummary {
    pub file_count: usize,
    pub total_size: u64,
    pub largest_size: u64,
    pub skipped_count: usize,
}

impl DropSummary {
    pub fn of(batch: &DroppedBatch) -> Self {
        batch.files.iter().fold(
            Self {
                skipped_count: batch.skipped.len(),
                ..Self::default()
            },
            |mut acc, f| {
                acc.file_count += 1;
                acc.total_size += f.size;
                acc.largest_size = acc.largest_size.max(f.size);
                acc
            },
        )
    }
}

/// Human-readable byte count using binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DropPoint, DroppedFile};

    #[test]
    fn summary_counts_files_and_bytes() {
        let batch = DroppedBatch::from_files(
            vec![
                DroppedFile::new("a", 10),
                DroppedFile::new("b", 300),
                DroppedFile::new("c", 5),
            ],
            DropPoint::default(),
        );
        let s = DropSummary::of(&batch);
        assert_eq!(s.file_count, 3);
        assert_eq!(s.total_size, 315);
        assert_eq!(s.largest_size, 300);
        assert_eq!(s.skipped_count, 0);
    }

    #[test]
    fn empty_batch_summary() {
        assert_eq!(DropSummary::of(&DroppedBatch::default()), DropSummary::default());
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_099_511_627_776), "1.0 TB");
    }
}
