//! Remote metadata to domain entries

use crate::path;
use crate::types::{DirectoryEntry, Entry, FileEntry, RemoteEntry};

/// Map one filer record into an [`Entry`].
///
/// The filer reports directories through the mode bits; this is the only
/// place where that flag becomes the `Directory` variant.
pub fn map_entry(remote: &RemoteEntry) -> Entry {
    let full_path = path::strip_root(&remote.full_path);
    let name = path::leaf_name(&full_path).to_string();

    if remote.is_directory() {
        Entry::Directory(DirectoryEntry {
            name,
            full_path,
            mode: remote.mode,
            created_at: remote.crtime,
            updated_at: remote.mtime,
        })
    } else {
        Entry::File(FileEntry {
            name,
            full_path,
            size: remote.file_size,
            mode: remote.mode,
            mime_type: remote.mime.clone(),
            md5: remote.md5.as_deref().map(hex::encode),
            created_at: remote.crtime,
            updated_at: remote.mtime,
        })
    }
}

/// Map a batch of records, keeping the filer's order.
pub fn map_entries<'a>(remote: impl IntoIterator<Item = &'a RemoteEntry>) -> Vec<Entry> {
    remote.into_iter().map(map_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MODE_DIR;
    use chrono::{TimeZone, Utc};

    fn remote(full_path: &str, mode: u32) -> RemoteEntry {
        RemoteEntry {
            full_path: full_path.to_string(),
            mtime: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            crtime: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            mode,
            mime: "text/plain".to_string(),
            md5: Some(vec![0xde, 0xad, 0xbe, 0xef]),
            file_size: 42,
        }
    }

    #[test]
    fn test_map_file() {
        let entry = map_entry(&remote("/buckets/a/b/c.txt", 0o644));

        let file = entry.as_file().expect("file entry");
        assert_eq!(file.name, "c.txt");
        assert_eq!(file.full_path, "/a/b/c.txt");
        assert_eq!(file.size, 42);
        assert_eq!(file.mode, 0o644);
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.md5.as_deref(), Some("deadbeef"));
        assert_eq!(file.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        assert_eq!(file.updated_at, Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_map_directory() {
        let entry = map_entry(&remote("/buckets/a/b", MODE_DIR | 0o755));

        match entry {
            Entry::Directory(dir) => {
                assert_eq!(dir.name, "b");
                assert_eq!(dir.full_path, "/a/b");
                assert_eq!(dir.mode, MODE_DIR | 0o755);
            }
            Entry::File(_) => panic!("Expected directory"),
        }
    }

    #[test]
    fn test_map_root_directory() {
        for root in ["/buckets", "/buckets/"] {
            let entry = map_entry(&remote(root, MODE_DIR | 0o755));
            assert!(entry.is_dir());
            assert_eq!(entry.name(), "");
            assert_eq!(entry.full_path(), "/");
        }
    }

    #[test]
    fn test_root_segment_never_leaks() {
        for root in ["buckets", "data", "tenant-7"] {
            let entry = map_entry(&remote(&format!("/{}/x/y.bin", root), 0o600));
            assert_eq!(entry.full_path(), "/x/y.bin");
            assert!(!entry.full_path().contains(root));
        }
    }

    #[test]
    fn test_map_entries_keeps_order() {
        let records = vec![
            remote("/buckets/b.txt", 0o644),
            remote("/buckets/a.txt", 0o644),
        ];

        let names: Vec<_> = map_entries(&records)
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
    }
}
