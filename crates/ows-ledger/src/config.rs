//! Node configuration.

use std::path::PathBuf;

/// Home directory used when `HOME` is unset.
pub const ROOT_HOME_DIR: &str = "/ows";

/// Subdirectory of `$HOME` holding node state.
pub const USER_HOME_SUBDIR: &str = ".ows/node";

/// Configuration for a ledger node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Root of the content-addressed project directories.
    pub home_dir: PathBuf,

    /// Whether loads and appends run the resource replay check.
    pub validate_assets: bool,
}

impl NodeConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::with_home(std::env::var_os("HOME").map(PathBuf::from))
    }

    /// Resolve the configuration for a given `HOME` value.
    ///
    /// Without a home directory the node is assumed to run with root rights
    /// and keeps its state under [`ROOT_HOME_DIR`].
    pub fn with_home(home: Option<PathBuf>) -> Self {
        let home_dir = match home {
            Some(home) => home.join(USER_HOME_SUBDIR),
            None => PathBuf::from(ROOT_HOME_DIR),
        };
        Self {
            home_dir,
            ..Self::default()
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            home_dir: PathBuf::from(ROOT_HOME_DIR),
            validate_assets: true,
        }
    }
}
