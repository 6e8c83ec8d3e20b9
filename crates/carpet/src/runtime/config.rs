use std::{env, path::PathBuf};

use tracing::warn;

pub const LOAD_PATH_ENV: &str = "CARPET_LOAD_PATH";
pub const MAX_STACK_SIZE_ENV: &str = "CARPET_MAX_STACK_SIZE";
pub const MEMORY_LIMIT_ENV: &str = "CARPET_MEMORY_LIMIT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directories searched, in order, by `require` inside scripts.
    pub load_paths: Vec<PathBuf>,
    /// Script stack limit in bytes, measured from where the engine starts.
    /// The home thread needs stack headroom beyond this for host frames.
    pub max_stack_size: usize,
    /// Heap limit in bytes. `0` leaves the engine unbounded.
    pub memory_limit: usize,
}

impl RuntimeConfig {
    /// Must stay well under the 2 MiB stack of a default spawned thread.
    pub const DEFAULT_MAX_STACK_SIZE: usize = 512 * 1024;
    pub const DEFAULT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

    /// Default limits and an empty load path.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            load_paths: Vec::new(),
            max_stack_size: Self::DEFAULT_MAX_STACK_SIZE,
            memory_limit: Self::DEFAULT_MEMORY_LIMIT,
        }
    }

    /// Defaults overridden by `CARPET_LOAD_PATH` (a platform path list),
    /// `CARPET_MAX_STACK_SIZE` and `CARPET_MEMORY_LIMIT`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::minimal();
        if let Some(paths) = env::var_os(LOAD_PATH_ENV) {
            config.load_paths = env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Some(size) = size_from_env(MAX_STACK_SIZE_ENV) {
            config.max_stack_size = size;
        }
        if let Some(size) = size_from_env(MEMORY_LIMIT_ENV) {
            config.memory_limit = size;
        }
        config
    }

    #[must_use]
    pub fn load_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.load_paths.push(path.into());
        self
    }

    #[must_use]
    pub const fn max_stack_size(mut self, size: usize) -> Self {
        self.max_stack_size = size;
        self
    }

    #[must_use]
    pub const fn memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

fn size_from_env(name: &str) -> Option<usize> {
    let value = env::var(name).ok()?;
    match value.trim().parse() {
        Ok(size) => Some(size),
        Err(e) => {
            warn!(variable = name, value = %value, error = %e, "ignoring invalid size");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::RuntimeConfig;

    #[test]
    fn builder_overrides_defaults() {
        let config = RuntimeConfig::minimal()
            .load_path("/usr/share/carpet")
            .load_path("vendor/js")
            .max_stack_size(256 * 1024)
            .memory_limit(0);

        assert_eq!(
            config.load_paths,
            vec![
                PathBuf::from("/usr/share/carpet"),
                PathBuf::from("vendor/js")
            ]
        );
        assert_eq!(config.max_stack_size, 256 * 1024);
        assert_eq!(config.memory_limit, 0);
    }

    #[test]
    fn default_is_minimal() {
        let config = RuntimeConfig::default();
        assert!(config.load_paths.is_empty());
        assert_eq!(config.max_stack_size, RuntimeConfig::DEFAULT_MAX_STACK_SIZE);
        assert_eq!(config.memory_limit, RuntimeConfig::DEFAULT_MEMORY_LIMIT);
        assert!(RuntimeConfig::DEFAULT_MAX_STACK_SIZE <= 1024 * 1024);
    }
}
