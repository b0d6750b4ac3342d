use std::path::{Path, PathBuf};

/// Environment variable pointing at the native library (file or directory)
pub const LIBRARY_PATH_VARIABLE: &str = "TSCLIB_PATH";
/// File name of the vendor library
pub const DEFAULT_LIBRARY_NAME: &str = "TSCLIB.dll";

/// Where to find the vendor library
///
/// Without an explicit path, the library is searched for in the location given by the `TSCLIB_PATH` environment variable, then next to the running executable, then in the current directory. Use the [builder](LibraryConfig::builder) to change any of these.
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    /// Exact location, skips the search
    pub(crate) path: Option<PathBuf>,
    /// File name looked for in each search directory
    pub(crate) file_name: String,
    /// Searched before the default locations
    pub(crate) search_dirs: Vec<PathBuf>
}

impl Default for LibraryConfig {
    fn default() -> LibraryConfig {
        LibraryConfig {
            path: None,
            file_name: DEFAULT_LIBRARY_NAME.to_string(),
            search_dirs: Vec::new()
        }
    }
}

impl LibraryConfig {
    /// Creates a [LibraryConfigBuilder](crate::LibraryConfigBuilder)
    ///
    /// ```rust
    /// use tsclib::LibraryConfig;
    /// let config = LibraryConfig::builder()
    ///     .path(r"C:\drivers\TSCLIB.dll")
    ///     .build();
    /// assert_eq!(config.candidates()[0], std::path::PathBuf::from(r"C:\drivers\TSCLIB.dll"));
    /// ```
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::new()
    }

    /// Every location that will be tried, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.path {
            return vec![path.clone()];
        }
        let mut candidates: Vec<PathBuf> = self.search_dirs.iter().map(|dir| dir.join(&self.file_name)).collect();
        if let Some(value) = std::env::var_os(LIBRARY_PATH_VARIABLE) {
            let value = PathBuf::from(value);
            if value.is_dir() {
                candidates.push(value.join(&self.file_name));
            } else {
                candidates.push(value);
            }
        }
        if let Some(dir) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
            candidates.push(dir.join(&self.file_name));
        }
        if let Ok(dir) = std::env::current_dir() {
            candidates.push(dir.join(&self.file_name));
        }
        candidates
    }

    /// First candidate that exists, or the last one tried
    pub(crate) fn locate(&self) -> (PathBuf, bool) {
        let candidates = self.candidates();
        for candidate in candidates.iter() {
            if candidate.is_file() {
                return (candidate.clone(), true);
            }
        }
        let last = candidates.last().cloned().unwrap_or_else(|| PathBuf::from(&self.file_name));
        (last, false)
    }
}

/// Helper structure to create a [LibraryConfig](crate::LibraryConfig)
pub struct LibraryConfigBuilder {
    config: LibraryConfig
}

impl LibraryConfigBuilder {
    pub fn new() -> LibraryConfigBuilder {
        LibraryConfigBuilder {
            config: LibraryConfig::default()
        }
    }

    /// Uses exactly this file
    pub fn path<T: Into<PathBuf>>(mut self, path: T) -> LibraryConfigBuilder {
        self.config.path = Some(path.into());
        self
    }

    /// Looks for a differently named file, `TSCLIB.dll` by default
    pub fn file_name<T: Into<String>>(mut self, file_name: T) -> LibraryConfigBuilder {
        self.config.file_name = file_name.into();
        self
    }

    /// Adds a directory searched before the default ones
    pub fn search_dir<T: Into<PathBuf>>(mut self, dir: T) -> LibraryConfigBuilder {
        self.config.search_dirs.push(dir.into());
        self
    }

    pub fn build(self) -> LibraryConfig {
        self.config
    }
}

impl Default for LibraryConfigBuilder {
    fn default() -> LibraryConfigBuilder {
        LibraryConfigBuilder::new()
    }
}
