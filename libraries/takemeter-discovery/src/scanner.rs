//! File and folder expansion into takes

use crate::{DiscoveryError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Audio file extensions picked up by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "m4a", "aac"];

/// Expands file and folder arguments into audio takes
#[derive(Debug, Clone)]
pub struct TakeScanner {
    /// Lowercase extensions without the leading dot
    extensions: Vec<String>,

    /// Descend into subfolders instead of listing only direct children
    recursive: bool,

    /// Whether to follow symbolic links
    follow_links: bool,
}

impl Default for TakeScanner {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            recursive: false,
            follow_links: false,
        }
    }
}

impl TakeScanner {
    /// Create a scanner with the default extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted extensions (case-insensitive, leading dot optional)
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set whether folders are walked recursively
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Check if a path has one of the accepted extensions
    pub fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
            .unwrap_or(false)
    }

    /// Audio files inside a folder, in walk order
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(DiscoveryError::FileNotFound(path.display().to_string()));
        }

        if !path.is_dir() {
            return Err(DiscoveryError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut walker = WalkDir::new(path).follow_links(self.follow_links);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut audio_files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The folder itself is unreadable
                Err(e) if e.depth() == 0 => {
                    return Err(DiscoveryError::Walk {
                        path: path.display().to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(folder = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let entry_path = entry.path();
            if entry_path.is_dir() {
                continue;
            }

            if self.is_audio_file(entry_path) {
                audio_files.push(entry_path.to_path_buf());
            }
        }

        Ok(audio_files)
    }

    /// Expand `paths` into the sorted, de-duplicated list of takes
    ///
    /// Folders contribute their audio files; files are kept when their
    /// extension is accepted. A path that does not exist aborts discovery.
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut takes = Vec::new();

        for path in paths {
            if !path.exists() {
                return Err(DiscoveryError::FileNotFound(path.display().to_string()));
            }

            if path.is_dir() {
                let mut found = self.scan_directory(path)?;
                debug!(folder = %path.display(), count = found.len(), "Scanned folder");
                takes.append(&mut found);
            } else if self.is_audio_file(path) {
                takes.push(path.clone());
            } else {
                debug!(path = %path.display(), "Skipping non-audio file");
            }
        }

        takes.sort();
        takes.dedup();

        info!(inputs = paths.len(), takes = takes.len(), "Discovered takes");
        Ok(takes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"fake audio").unwrap();
    }

    #[test]
    fn test_is_audio_file() {
        let scanner = TakeScanner::new();
        assert!(scanner.is_audio_file(Path::new("take.wav")));
        assert!(scanner.is_audio_file(Path::new("take.WAV")));
        assert!(scanner.is_audio_file(Path::new("take.flac")));
        assert!(scanner.is_audio_file(Path::new("take.m4a")));
        assert!(!scanner.is_audio_file(Path::new("notes.txt")));
        assert!(!scanner.is_audio_file(Path::new("take")));
    }

    #[test]
    fn test_custom_extensions() {
        let scanner = TakeScanner::new().extensions([".WAV"]);
        assert!(scanner.is_audio_file(Path::new("take.wav")));
        assert!(!scanner.is_audio_file(Path::new("take.flac")));
    }

    #[test]
    fn test_folder_lists_direct_children_only() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        touch(&base.join("b.wav"));
        touch(&base.join("a.flac"));
        touch(&base.join("readme.txt"));

        let subdir = base.join("alt");
        fs::create_dir(&subdir).unwrap();
        touch(&subdir.join("c.wav"));

        let takes = TakeScanner::new().discover(&[base.to_path_buf()]).unwrap();
        assert_eq!(takes, vec![base.join("a.flac"), base.join("b.wav")]);
    }

    #[test]
    fn test_recursive_scan() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        touch(&base.join("a.wav"));
        let subdir = base.join("alt");
        fs::create_dir(&subdir).unwrap();
        touch(&subdir.join("c.wav"));

        let takes = TakeScanner::new()
            .recursive(true)
            .discover(&[base.to_path_buf()])
            .unwrap();
        assert_eq!(takes, vec![base.join("a.wav"), subdir.join("c.wav")]);
    }

    #[test]
    fn test_files_and_folders_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        touch(&base.join("take2.wav"));
        touch(&base.join("take1.wav"));
        touch(&base.join("cover.png"));

        let inputs = vec![
            base.join("take2.wav"),
            base.to_path_buf(),
            base.join("cover.png"),
        ];
        let takes = TakeScanner::new().discover(&inputs).unwrap();
        assert_eq!(takes, vec![base.join("take1.wav"), base.join("take2.wav")]);
    }

    #[test]
    fn test_missing_path_aborts() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.wav");

        let result = TakeScanner::new().discover(&[missing]);
        assert!(matches!(result, Err(DiscoveryError::FileNotFound(_))));
    }

    #[test]
    fn test_scan_directory_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("take.wav");
        touch(&file);

        let result = TakeScanner::new().scan_directory(&file);
        assert!(matches!(result, Err(DiscoveryError::InvalidPath(_))));
    }

    #[test]
    fn test_empty_inputs() {
        let takes = TakeScanner::new().discover(&[]).unwrap();
        assert!(takes.is_empty());
    }
}
