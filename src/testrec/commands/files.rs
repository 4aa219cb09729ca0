use crate::codec;
use crate::commands::{CmdResult, DatabaseFile};
use crate::error::Result;
use crate::store::StorageBackend;
use std::path::Path;

const DATABASE_EXT: &str = "csv";

/// List candidate database files in `dir`, sorted by name.
pub fn run<B: StorageBackend>(backend: &B, dir: &Path) -> Result<CmdResult> {
    let mut paths: Vec<_> = backend
        .list_dir(dir)?
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(DATABASE_EXT))
        })
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        // An unreadable candidate is listed as invalid rather than failing the scan.
        let valid_header = matches!(
            backend.read(&path),
            Ok(Some(text)) if codec::check_header(&text).is_ok()
        );
        files.push(DatabaseFile { path, valid_header });
    }

    Ok(CmdResult::default().with_database_files(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HEADER;
    use crate::store::MemBackend;
    use std::path::PathBuf;

    #[test]
    fn lists_csv_files_with_header_check() {
        let backend = MemBackend::new()
            .with_file("data/b.csv", format!("{}\n", HEADER))
            .with_file("data/a.CSV", "not,a,database\n")
            .with_file("data/notes.txt", HEADER)
            .with_file("elsewhere/c.csv", HEADER);

        let result = run(&backend, Path::new("data")).unwrap();
        assert_eq!(
            result.database_files,
            vec![
                DatabaseFile {
                    path: PathBuf::from("data/a.CSV"),
                    valid_header: false
                },
                DatabaseFile {
                    path: PathBuf::from("data/b.csv"),
                    valid_header: true
                },
            ]
        );
    }

    #[test]
    fn current_directory_lists_bare_file_names() {
        let backend = MemBackend::new()
            .with_file("test_records.csv", format!("{}\n", HEADER))
            .with_file("data/other.csv", HEADER);

        let result = run(&backend, Path::new(".")).unwrap();
        assert_eq!(result.database_files.len(), 1);
        assert_eq!(result.database_files[0].path, PathBuf::from("test_records.csv"));
        assert!(result.database_files[0].valid_header);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let result = run(&MemBackend::new(), Path::new("data")).unwrap();
        assert!(result.database_files.is_empty());
    }
}
