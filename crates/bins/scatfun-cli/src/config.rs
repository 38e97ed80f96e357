use crate::error::CliError;
use base::Endianness;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Scatfun configuration.
#[derive(Debug)]
pub struct Config {
    /// Path of the loaded user configuration file, if any.
    pub(crate) config_file: Option<PathBuf>,

    /// Current working directory (where the user started the program).
    pub(crate) cwd: PathBuf,

    /// User-defined configuration.
    pub(crate) user: UserConfig,
}

/// Options configured by user.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Directory searched for tables given by a relative path that does not
    /// exist in the current working directory.
    pub data_dir: Option<PathBuf>,

    /// Byte order of the tables to read.
    pub byte_order: Endianness,
}

impl UserConfig {
    /// Load [`UserConfig`] from a .toml file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let string = std::fs::read_to_string(path).map_err(|err| {
            CliError::from_io_error(
                err,
                format!("Failed to read user configuration file: {}", path.display()),
            )
        })?;
        let config = Self::parse(&string, base).map_err(|err| {
            CliError::new(
                format!(
                    "Failed to parse user configuration file: {}",
                    path.display()
                ),
                Some(Box::new(err)),
            )
        })?;
        log::info!("    - User data directory: {:?}", config.data_dir);
        log::info!("    - Byte order: {}", config.byte_order);
        Ok(config)
    }

    /// Parses the configuration; relative paths are taken relative to `base`.
    fn parse(string: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let mut config: UserConfig = toml::from_str(string)?;
        if let Some(data_dir) = config.data_dir {
            config.data_dir = Some(canonicalize_path(base, &data_dir));
        }
        Ok(config)
    }
}

impl Config {
    /// Name of the configuration file searched for.
    pub const FILE_NAME: &'static str = "scatfun.toml";

    /// Load the configuration.
    ///
    /// This function accepts a file path to the user-defined configuration
    /// file. If it's not set, the function tries to load `scatfun.toml` from
    /// the current working directory, then from the `scatfun` folder of the
    /// system configuration directory. If neither exists the default
    /// configuration is used.
    ///
    /// # Default configuration directory
    ///
    /// + On *nix system: "$XDG_CONFIG_HOME" or "$HOME/.config"
    ///
    /// + On windows system: `%APPDATA%` which is usually
    ///   "C:\Users\username\AppData\Roaming"
    ///
    /// + On macos system: "$HOME/Library/Application Support"
    pub fn load_config(filepath: Option<&Path>) -> Result<Self, CliError> {
        log::info!("Loading configurations...");
        let cwd = std::env::current_dir().map_err(|err| {
            CliError::from_io_error(err, "Failed to get current working directory.")
        })?;

        let config_file = match filepath {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::new(
                        format!("Configuration file {} not found.", path.display()),
                        None,
                    ));
                }
                Some(path.to_path_buf())
            },
            None => {
                let sys_config_file =
                    dirs::config_dir().map(|dir| dir.join("scatfun").join(Self::FILE_NAME));
                std::iter::once(Some(cwd.join(Self::FILE_NAME)))
                    .chain(std::iter::once(sys_config_file))
                    .flatten()
                    .find(|path| path.exists())
            },
        };

        let user = match &config_file {
            Some(path) => {
                log::info!("  - User configuration file: {}", path.display());
                UserConfig::load(path)?
            },
            None => {
                log::info!("  - No configuration file found, using defaults");
                UserConfig::default()
            },
        };

        Ok(Self {
            config_file,
            cwd,
            user,
        })
    }

    /// Byte order of the tables to read.
    pub fn byte_order(&self) -> Endianness { self.user.byte_order }

    /// Resolves the path of a table.
    ///
    /// Absolute paths are returned if they exist. Relative paths are looked
    /// up in the current working directory, then in the data directory.
    pub fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }
        let in_cwd = self.cwd.join(path);
        if in_cwd.exists() {
            return Some(in_cwd);
        }
        self.user
            .data_dir
            .as_ref()
            .map(|dir| dir.join(path))
            .filter(|path| path.exists())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration file: {}\nCurrent working directory: {}\nData directory: {}\nByte \
             order: {}",
            self.config_file
                .as_ref()
                .map_or_else(|| String::from("none"), |p| p.display().to_string()),
            self.cwd.display(),
            self.user
                .data_dir
                .as_ref()
                .map_or_else(|| String::from("none"), |p| p.display().to_string()),
            self.user.byte_order
        )
    }
}

/// Returns the absolute path of `path`, relative paths being taken relative
/// to `base`.
fn canonicalize_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}
