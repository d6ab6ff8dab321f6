//! Cache manager for persisting downloaded menu files to disk
//!
//! Provides a `CacheManager` that stores each response body verbatim, one line
//! per line of the original, under a file named by its cache key.

use directories::ProjectDirs;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Extension appended to every cache key
const CACHE_FILE_EXTENSION: &str = "csv";

/// Manages reading and writing cached menu files
///
/// Files live in an XDG-compliant cache directory (`~/.cache/lunch/` on Linux).
/// Entries never expire: once written, an entry is returned for its key until
/// a newer download replaces it.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "lunch")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the directory cache files are stored in
    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key, CACHE_FILE_EXTENSION))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Reads a cache entry
    ///
    /// The content is rebuilt line by line, with every line terminated by `\n`.
    ///
    /// # Returns
    /// * `Ok(Some(text))` if the entry exists
    /// * `Ok(None)` if there is no entry for `key`
    /// * `Err` if the entry exists but cannot be read
    pub fn read(&self, key: &str) -> io::Result<Option<String>> {
        let file = match File::open(self.cache_path(key)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut content = String::new();
        for line in BufReader::new(file).lines() {
            content.push_str(&line?);
            content.push('\n');
        }

        Ok(Some(content))
    }

    /// Opens a writer for a new cache entry
    ///
    /// Nothing is visible under `key` until [`CacheWriter::commit`] succeeds.
    pub fn writer(&self, key: &str) -> io::Result<CacheWriter> {
        self.ensure_dir()?;

        let final_path = self.cache_path(key);
        let partial_path = final_path.with_extension(format!("{}.part", CACHE_FILE_EXTENSION));
        let file = File::create(&partial_path)?;

        Ok(CacheWriter {
            writer: Some(BufWriter::new(file)),
            partial_path,
            final_path,
        })
    }
}

/// Line writer for a single cache entry
///
/// Lines go to a `.part` file that is renamed into place on commit. Dropping
/// the writer without committing deletes the partial file.
#[derive(Debug)]
pub struct CacheWriter {
    writer: Option<BufWriter<File>>,
    partial_path: PathBuf,
    final_path: PathBuf,
}

impl CacheWriter {
    /// Appends one line, terminated with `\n`
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "cache writer already closed"))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }

    /// Flushes the entry and moves it to its final location
    ///
    /// On failure the partial file is removed and any previous entry is kept.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        let result = self.finish();
        if result.is_err() {
            let _ = fs::remove_file(&self.partial_path);
        }
        result
    }

    fn finish(&mut self) -> io::Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&self.partial_path, &self.final_path)?;
        Ok(self.final_path.clone())
    }
}

impl Drop for CacheWriter {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.partial_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn write_entry(cache: &CacheManager, key: &str, lines: &[&str]) {
        let mut writer = cache.writer(key).expect("Writer should open");
        for line in lines {
            writer.write_line(line).expect("Write should succeed");
        }
        writer.commit().expect("Commit should succeed");
    }

    #[test]
    fn test_commit_creates_file_in_cache_directory() {
        let (cache, temp_dir) = create_test_cache();

        write_entry(&cache, "2025-2026-september-Menu", &["Header,Header2"]);

        let expected_path = temp_dir.path().join("2025-2026-september-Menu.csv");
        assert!(expected_path.exists(), "Cache file should exist");
        let content = fs::read_to_string(&expected_path).unwrap();
        assert_eq!(content, "Header,Header2\n");
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();

        let result = cache.read("nonexistent_key").expect("Read should succeed");

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_read_returns_written_lines() {
        let (cache, _temp_dir) = create_test_cache();
        write_entry(&cache, "key", &["a,b", "\"c, d\",e", ""]);

        let content = cache.read("key").unwrap().expect("Entry should exist");

        assert_eq!(content, "a,b\n\"c, d\",e\n\n");
    }

    #[test]
    fn test_read_normalizes_crlf_and_missing_final_newline() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("key.csv"), "a,b\r\nc,d").unwrap();

        let content = cache.read("key").unwrap().unwrap();

        assert_eq!(content, "a,b\nc,d\n");
    }

    #[test]
    fn test_uncommitted_writer_leaves_no_entry() {
        let (cache, temp_dir) = create_test_cache();
        {
            let mut writer = cache.writer("partial").unwrap();
            writer.write_line("half a file").unwrap();
        }

        assert!(cache.read("partial").unwrap().is_none());
        assert!(!temp_dir.path().join("partial.csv.part").exists());
    }

    #[test]
    fn test_writer_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::with_dir(nested_path.clone());

        write_entry(&cache, "nested_key", &["x"]);

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(nested_path.join("nested_key.csv").exists(), "Cache file should exist");
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (cache, _temp_dir) = create_test_cache();

        write_entry(&cache, "overwrite_key", &["first"]);
        write_entry(&cache, "overwrite_key", &["second"]);

        assert_eq!(cache.read("overwrite_key").unwrap().unwrap(), "second\n");
    }

    #[test]
    fn test_failed_commit_removes_partial_file() {
        let (cache, temp_dir) = create_test_cache();
        // A non-empty directory in the entry's place makes the rename fail
        let blocker = temp_dir.path().join("blocked.csv");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("occupied"), "x").unwrap();

        let mut writer = cache.writer("blocked").unwrap();
        writer.write_line("body").unwrap();
        let result = writer.commit();

        assert!(result.is_err(), "Rename onto a directory should fail");
        assert!(!temp_dir.path().join("blocked.csv.part").exists());
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(cache) = CacheManager::new() {
            let path_str = cache.dir().to_string_lossy();
            assert!(path_str.contains("lunch"), "Cache path should contain project name");
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
