//! Share-directory lookup through the ament resource index
//!
//! ROS 2 installs register every package in
//! `<prefix>/share/ament_index/resource_index/packages/<name>`. Resolution
//! walks the prefixes in `AMENT_PREFIX_PATH` order and returns
//! `<prefix>/share/<name>` for the first prefix carrying the marker.

use std::path::PathBuf;

const RESOURCE_INDEX: &str = "share/ament_index/resource_index/packages";

/// Ordered list of install prefixes to search for packages
#[derive(Debug, Clone, Default)]
pub struct AmentIndex {
    prefixes: Vec<PathBuf>,
}

impl AmentIndex {
    /// Build from an explicit prefix list
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Build from `AMENT_PREFIX_PATH`
    ///
    /// An unset or empty variable yields an index with no prefixes; every
    /// lookup will then fail with [`AmentError::PackageNotFound`].
    pub fn from_env() -> Self {
        let prefixes = std::env::var("AMENT_PREFIX_PATH")
            .map(|raw| {
                raw.split(':')
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();
        Self { prefixes }
    }

    /// The prefixes searched, in order
    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Resolve the share directory of an installed package
    pub fn share_directory(&self, package: &str) -> Result<PathBuf, AmentError> {
        for prefix in &self.prefixes {
            let marker = prefix.join(RESOURCE_INDEX).join(package);
            if marker.is_file() {
                return Ok(prefix.join("share").join(package));
            }
        }

        Err(AmentError::PackageNotFound {
            package: package.to_string(),
        })
    }
}

/// Errors that can occur during package resolution
#[derive(Debug, thiserror::Error)]
pub enum AmentError {
    #[error("Package '{package}' not found on AMENT_PREFIX_PATH")]
    PackageNotFound { package: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_package(prefix: &std::path::Path, name: &str) {
        let index = prefix.join(RESOURCE_INDEX);
        std::fs::create_dir_all(&index).unwrap();
        std::fs::write(index.join(name), "").unwrap();
        std::fs::create_dir_all(prefix.join("share").join(name)).unwrap();
    }

    #[test]
    fn test_share_directory_resolution() {
        let dir = tempfile::tempdir().unwrap();
        install_package(dir.path(), "turtlebot3_gazebo");

        let index = AmentIndex::new(vec![dir.path().to_path_buf()]);
        let share = index.share_directory("turtlebot3_gazebo").unwrap();
        assert_eq!(share, dir.path().join("share/turtlebot3_gazebo"));
    }

    #[test]
    fn test_first_prefix_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        install_package(first.path(), "turtlebot3_navigation2");
        install_package(second.path(), "turtlebot3_navigation2");

        let index = AmentIndex::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let share = index.share_directory("turtlebot3_navigation2").unwrap();
        assert!(share.starts_with(first.path()));
    }

    #[test]
    fn test_missing_package() {
        let dir = tempfile::tempdir().unwrap();
        let index = AmentIndex::new(vec![dir.path().to_path_buf()]);

        let result = index.share_directory("nonexistent_pkg");
        assert!(matches!(
            result,
            Err(AmentError::PackageNotFound { package }) if package == "nonexistent_pkg"
        ));
    }

    #[test]
    fn test_empty_index() {
        let index = AmentIndex::default();
        assert!(index.share_directory("anything").is_err());
    }
}
