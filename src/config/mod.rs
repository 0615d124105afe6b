//! INI-backed settings, read once at startup.
//!
//! The raw file is wrapped in a [`ConfigStore`] whose getters always take a
//! fallback, then resolved into the immutable [`Settings`] value that the
//! facade and every engine receive at construction.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use tracing::{debug, info, warn};

use crate::core::error::ConfigError;
use crate::core::types::{EngineOrder, ProxySpec};
use crate::proxy;
use crate::transport::http::DEFAULT_TIMEOUT_SECS;

pub const CONFIG_FILE_NAME: &str = "CONFIG.ini";
const ENV_PREFIX: &str = "TRANSLATION_FAILOVER";

pub const NETWORK_SECTION: &str = "network";
pub const TRANSLATION_SECTION: &str = "translation";

pub const DEFAULT_GOOGLE_HOST: &str = "translate.google.com";
pub const DEFAULT_MICROSOFT_REGION: &str = "global";
pub const DEFAULT_CUSTOM_SOURCE_LANG: &str = "auto";
pub const DEFAULT_CUSTOM_TARGET_LANG: &str = "zh";

/// Section-organized key/value store with typed, fallback-taking getters.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    inner: Config,
}

impl ConfigStore {
    pub fn empty() -> Self {
        Self {
            inner: Config::default(),
        }
    }

    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let inner = Config::builder()
            .add_source(File::from_str(strip_bom(contents), FileFormat::Ini))
            .build()?;
        Ok(Self { inner })
    }

    /// Decodes UTF-8, falling back to GB18030 for files saved by
    /// Chinese-locale editors.
    pub fn from_ini_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        Self::from_ini_str(&decode_config_bytes(bytes))
    }

    /// Loads `path` and layers `TRANSLATION_FAILOVER__SECTION__KEY`
    /// environment overrides on top. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if path.exists() {
            let bytes = std::fs::read(path).map_err(|error| ConfigError::Read {
                path: path.display().to_string(),
                message: error.to_string(),
            })?;
            let contents = decode_config_bytes(&bytes);
            builder = builder.add_source(File::from_str(strip_bom(&contents), FileFormat::Ini));
            info!(path = %path.display(), "loaded config file");
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        Ok(Self {
            inner: builder.build()?,
        })
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.inner.get_table(section).is_ok()
    }

    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.get_str(section, key).is_some()
    }

    pub fn get_str(&self, section: &str, key: &str) -> Option<String> {
        self.inner.get_string(&path_of(section, key)).ok()
    }

    pub fn get_str_or(&self, section: &str, key: &str, fallback: &str) -> String {
        self.get_str(section, key).unwrap_or_else(|| fallback.to_string())
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_str(section, key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn get_bool_or(&self, section: &str, key: &str, fallback: bool) -> bool {
        let path = path_of(section, key);
        if self.get_str(section, key).is_none() {
            return fallback;
        }

        match self.inner.get_bool(&path) {
            Ok(value) => value,
            Err(error) => {
                warn!(key = %path, %error, "invalid boolean, using fallback");
                fallback
            }
        }
    }

    pub fn get_u64_or(&self, section: &str, key: &str, fallback: u64) -> u64 {
        let Some(raw) = self.get_str(section, key) else {
            return fallback;
        };

        match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(error) => {
                warn!(key = %path_of(section, key), %error, "invalid integer, using fallback");
                fallback
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSettings {
    pub proxy: Option<ProxySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSettings {
    pub engine_order: EngineOrder,
    pub google_host: String,
    pub google_word_details: bool,
    pub microsoft_key: Option<String>,
    pub microsoft_region: String,
    pub custom_api_url: Option<String>,
    pub custom_api_key: Option<String>,
    pub custom_source_lang: String,
    pub custom_target_lang: String,
    pub timeout_secs: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            engine_order: EngineOrder::default(),
            google_host: DEFAULT_GOOGLE_HOST.to_string(),
            google_word_details: true,
            microsoft_key: None,
            microsoft_region: DEFAULT_MICROSOFT_REGION.to_string(),
            custom_api_url: None,
            custom_api_key: None,
            custom_source_lang: DEFAULT_CUSTOM_SOURCE_LANG.to_string(),
            custom_target_lang: DEFAULT_CUSTOM_TARGET_LANG.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Immutable settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub network: NetworkSettings,
    pub translation: TranslationSettings,
}

impl Settings {
    /// Reads `CONFIG.ini` from the current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let store = ConfigStore::load(path)?;
        Ok(Self::from_store(&store))
    }

    pub fn from_store(store: &ConfigStore) -> Self {
        let section = TRANSLATION_SECTION;

        let translation = TranslationSettings {
            engine_order: store
                .get_str(section, "engine_order")
                .map(|raw| EngineOrder::parse(&raw))
                .unwrap_or_default(),
            google_host: store
                .get_non_empty(section, "google_host")
                .unwrap_or_else(|| DEFAULT_GOOGLE_HOST.to_string()),
            google_word_details: store.get_bool_or(section, "google_word_details", true),
            microsoft_key: store.get_non_empty(section, "microsoft_key"),
            microsoft_region: store.get_str_or(
                section,
                "microsoft_region",
                DEFAULT_MICROSOFT_REGION,
            ),
            custom_api_url: store.get_non_empty(section, "custom_api_url"),
            custom_api_key: store.get_non_empty(section, "custom_api_key"),
            custom_source_lang: store.get_str_or(
                section,
                "custom_source_lang",
                DEFAULT_CUSTOM_SOURCE_LANG,
            ),
            custom_target_lang: store.get_str_or(
                section,
                "custom_target_lang",
                DEFAULT_CUSTOM_TARGET_LANG,
            ),
            timeout_secs: store.get_u64_or(section, "timeout_secs", DEFAULT_TIMEOUT_SECS),
        };

        Self {
            network: NetworkSettings {
                proxy: proxy::resolve(store),
            },
            translation,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

fn path_of(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

fn strip_bom(contents: &str) -> &str {
    contents.strip_prefix('\u{feff}').unwrap_or(contents)
}

fn decode_config_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = encoding_rs::GB18030.decode(bytes);
            if had_errors {
                warn!(
                    "config file is neither valid UTF-8 nor GB18030, some characters were replaced"
                );
            }
            decoded.into_owned()
        }
    }
}
