//! Simple CLI configuration loader for fundsearch
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./fundsearch.json or ./.fundsearch/config.json
//! 3. Git repository root: <repo_root>/.fundsearch/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/fundsearch/config.json or ~/.config/fundsearch/config.json
//! 5. Environment variables only (no files)
//!
//! Environment variables are applied on top of whichever source was found,
//! and flags are applied last.

use anyhow::{anyhow, Context, Result};
use fundsearch_core::{EndpointConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const BASE_URL_ENV: &str = "FUNDSEARCH_BASE_URL";
const DEBOUNCE_ENV: &str = "FUNDSEARCH_DEBOUNCE_MS";

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Fund search endpoint base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Path appended to the base URL
    #[serde(default)]
    pub search_path: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Additional headers (values can be "env:VAR_NAME")
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Debounce quiet period in milliseconds
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    /// Maximum number of funds shown
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Local JSON catalog used instead of the endpoint
    #[serde(default)]
    pub catalog: Option<String>,
    /// Artificial catalog latency in milliseconds
    #[serde(default)]
    pub catalog_latency_ms: Option<u64>,
}

/// Local catalog backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub path: PathBuf,
    pub latency: Option<Duration>,
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone)]
pub struct ResolvedCliConfig {
    pub search: SearchConfig,
    /// When set, funds come from this catalog rather than the endpoint
    pub catalog: Option<CatalogSource>,
}

/// CLI configuration loader
#[derive(Debug, Clone)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory searched for project configuration
    working_dir: Option<PathBuf>,
    /// Flag overrides
    base_url_override: Option<String>,
    catalog_override: Option<String>,
    latency_override: Option<u64>,
    debounce_override: Option<u64>,
    max_results_override: Option<usize>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            working_dir: None,
            base_url_override: None,
            catalog_override: None,
            latency_override: None,
            debounce_override: None,
            max_results_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Search `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set catalog path override
    pub fn with_catalog_override(mut self, catalog: String) -> Self {
        self.catalog_override = Some(catalog);
        self
    }

    /// Set catalog latency override
    pub fn with_latency_override(mut self, latency_ms: u64) -> Self {
        self.latency_override = Some(latency_ms);
        self
    }

    /// Set debounce override
    pub fn with_debounce_override(mut self, debounce_ms: u64) -> Self {
        self.debounce_override = Some(debounce_ms);
        self
    }

    /// Set result limit override
    pub fn with_max_results_override(mut self, max_results: usize) -> Self {
        self.max_results_override = Some(max_results);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedCliConfig> {
        self.load_with_env(|name| std::env::var(name).ok()).await
    }

    /// Load with environment variables read through `env`
    async fn load_with_env<E>(&self, env: E) -> Result<ResolvedCliConfig>
    where
        E: Fn(&str) -> Option<String>,
    {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply environment and flag overrides
        self.apply_env_overrides(&mut config, env)?;
        self.apply_flag_overrides(&mut config);

        // Step 3: Resolve to final config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        let cwd = self.working_dir()?;

        // 1. Current working directory
        if let Some(config) = self.try_load_dir(&cwd).await? {
            return Ok(config);
        }

        // 2. Git repository root
        if let Some(git_root) = find_git_root(&cwd) {
            let config_path = git_root.join(".fundsearch").join("config.json");
            if config_path.exists() {
                return self.load_file(&config_path).await;
            }
        }

        // 3. XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("fundsearch").join("config.json");
            if config_path.exists() {
                return self.load_file(&config_path).await;
            }
        }

        // 4. Environment variables only
        debug!("No configuration file found, using environment only");
        Ok(RawConfig::default())
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    /// Try ./fundsearch.json, then ./.fundsearch/config.json
    async fn try_load_dir(&self, dir: &Path) -> Result<Option<RawConfig>> {
        let project_json = dir.join("fundsearch.json");
        if project_json.exists() {
            return Ok(Some(self.load_file(&project_json).await?));
        }

        let project_dir_config = dir.join(".fundsearch").join("config.json");
        if project_dir_config.exists() {
            return Ok(Some(self.load_file(&project_dir_config).await?));
        }

        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        debug!(path = %path.display(), "Loading configuration");
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn apply_env_overrides<E>(&self, config: &mut RawConfig, env: E) -> Result<()>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = env(BASE_URL_ENV) {
            config.base_url = Some(base_url);
        }
        if let Some(debounce) = env(DEBOUNCE_ENV) {
            let debounce_ms = debounce
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", DEBOUNCE_ENV))?;
            config.debounce_ms = Some(debounce_ms);
        }
        Ok(())
    }

    fn apply_flag_overrides(&self, config: &mut RawConfig) {
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(catalog) = &self.catalog_override {
            config.catalog = Some(catalog.clone());
        }
        if let Some(latency_ms) = self.latency_override {
            config.catalog_latency_ms = Some(latency_ms);
        }
        if let Some(debounce_ms) = self.debounce_override {
            config.debounce_ms = Some(debounce_ms);
        }
        if let Some(max_results) = self.max_results_override {
            config.max_results = Some(max_results);
        }
    }

    /// Resolve raw config to ResolvedCliConfig
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedCliConfig> {
        let endpoint = match config.base_url {
            Some(base_url) => {
                let mut endpoint = EndpointConfig::new(base_url)
                    .with_headers(resolve_headers(config.headers)?);
                if let Some(search_path) = config.search_path {
                    endpoint.search_path = search_path;
                }
                if let Some(timeout_ms) = config.timeout_ms {
                    endpoint.timeout_ms = timeout_ms;
                }
                Some(endpoint)
            }
            None => None,
        };

        let catalog = match config.catalog {
            Some(path) => Some(CatalogSource {
                path: expand_path(&path)?,
                latency: config.catalog_latency_ms.map(Duration::from_millis),
            }),
            None => None,
        };

        if endpoint.is_none() && catalog.is_none() {
            return Err(anyhow!(
                "No fund source configured. Create a fundsearch.json file, set {} or pass --catalog",
                BASE_URL_ENV
            ));
        }

        let mut search = SearchConfig::default().with_max_results(config.max_results);
        if let Some(debounce_ms) = config.debounce_ms {
            search = search.with_debounce_ms(debounce_ms);
        }
        if let Some(endpoint) = endpoint {
            search = search.with_endpoint(endpoint);
        }

        search
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(ResolvedCliConfig { search, catalog })
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `env:VAR_NAME` header values
fn resolve_headers(headers: HashMap<String, String>) -> Result<HashMap<String, String>> {
    headers
        .into_iter()
        .map(|(name, value)| match value.strip_prefix("env:") {
            Some(var_name) => std::env::var(var_name)
                .map(|resolved| (name, resolved))
                .with_context(|| format!("Environment variable not found: {}", var_name)),
            None => Ok((name, value)),
        })
        .collect()
}

fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand catalog path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Find git repository root
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_config_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "custom.json",
            r#"{"base_url": "https://funds.example.com/api", "timeout_ms": 2500, "max_results": 5}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .load_with_env(env_of(&[]))
            .await
            .unwrap();

        let endpoint = config.search.endpoint.unwrap();
        assert_eq!(endpoint.base_url, "https://funds.example.com/api");
        assert_eq!(endpoint.search_path, "search");
        assert_eq!(endpoint.timeout_ms, 2500);
        assert_eq!(config.search.max_results, Some(5));
        assert!(config.catalog.is_none());
    }

    #[tokio::test]
    async fn test_config_override_directory() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "config.json",
            r#"{"base_url": "http://localhost:9000", "debounce_ms": 150}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(dir.path().to_path_buf())
            .load_with_env(env_of(&[]))
            .await
            .unwrap();

        assert_eq!(config.search.debounce_ms, 150);
    }

    #[tokio::test]
    async fn test_config_override_directory_without_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = CliConfigLoader::new()
            .with_config_override(dir.path().to_path_buf())
            .load_with_env(env_of(&[]))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("No config.json found"));
    }

    #[tokio::test]
    async fn test_project_file_preferred_over_project_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fundsearch.json", r#"{"catalog": "top.json"}"#);
        write(
            dir.path(),
            ".fundsearch/config.json",
            r#"{"catalog": "nested.json"}"#,
        );

        let config = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .load_with_env(env_of(&[]))
            .await
            .unwrap();

        assert_eq!(config.catalog.unwrap().path, PathBuf::from("top.json"));
    }

    #[tokio::test]
    async fn test_project_dir_config_used_when_no_project_file() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            ".fundsearch/config.json",
            r#"{"catalog": "nested.json", "catalog_latency_ms": 250}"#,
        );

        let config = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .load_with_env(env_of(&[]))
            .await
            .unwrap();

        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.path, PathBuf::from("nested.json"));
        assert_eq!(catalog.latency, Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_flag_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "fundsearch.json",
            r#"{"base_url": "https://a.example.com", "debounce_ms": 500}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .with_base_url_override("https://b.example.com".to_string())
            .with_debounce_override(100)
            .with_max_results_override(3)
            .load_with_env(env_of(&[]))
            .await
            .unwrap();

        assert_eq!(
            config.search.endpoint.unwrap().base_url,
            "https://b.example.com"
        );
        assert_eq!(config.search.debounce_ms, 100);
        assert_eq!(config.search.max_results, Some(3));
    }

    #[tokio::test]
    async fn test_header_env_reference_is_resolved() {
        std::env::set_var("FUNDSEARCH_TEST_TOKEN", "secret-token");
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "fundsearch.json",
            r#"{
                "base_url": "https://funds.example.com",
                "headers": {"Authorization": "env:FUNDSEARCH_TEST_TOKEN", "X-Client": "cli"}
            }"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .load()
            .await
            .unwrap();

        let headers = config.search.endpoint.unwrap().headers;
        assert_eq!(headers.get("Authorization").unwrap(), "secret-token");
        assert_eq!(headers.get("X-Client").unwrap(), "cli");
    }

    #[tokio::test]
    async fn test_missing_header_env_reference_fails() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "fundsearch.json",
            r#"{"base_url": "https://funds.example.com", "headers": {"X-Key": "env:FUNDSEARCH_TEST_UNSET_VAR"}}"#,
        );

        let err = CliConfigLoader::new()
            .with_config_override(path)
            .load_with_env(env_of(&[]))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("FUNDSEARCH_TEST_UNSET_VAR"));
    }

    #[tokio::test]
    async fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "fundsearch.json",
            r#"{"base_url": "ftp://funds.example.com"}"#,
        );

        let err = CliConfigLoader::new()
            .with_config_override(path.clone())
            .load_with_env(env_of(&[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("validation failed"));

        let err = CliConfigLoader::new()
            .with_config_override(path)
            .with_base_url_override("https://funds.example.com".to_string())
            .with_max_results_override(0)
            .load_with_env(env_of(&[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }

    #[tokio::test]
    async fn test_unparseable_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "fundsearch.json", "{ not json");

        let err = CliConfigLoader::new()
            .with_config_override(path)
            .load_with_env(env_of(&[]))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_resolve_requires_a_fund_source() {
        let err = CliConfigLoader::new()
            .resolve_config(RawConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("No fund source configured"));
    }

    #[test]
    fn test_catalog_path_expands_home() {
        let home = dirs::home_dir().unwrap();
        let expanded = expand_path("~/funds.json").unwrap();
        assert_eq!(expanded, home.join("funds.json"));
    }

    #[test]
    fn test_find_git_root_walks_up() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(&nested), Some(dir.path().to_path_buf()));
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[tokio::test]
    async fn test_env_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "fundsearch.json",
            r#"{"base_url": "https://file.example.com", "debounce_ms": 500}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .load_with_env(env_of(&[
                (BASE_URL_ENV, "https://env.example.com"),
                (DEBOUNCE_ENV, "120"),
            ]))
            .await
            .unwrap();

        assert_eq!(
            config.search.endpoint.unwrap().base_url,
            "https://env.example.com"
        );
        assert_eq!(config.search.debounce_ms, 120);
    }

    #[tokio::test]
    async fn test_flags_win_over_env() {
        let dir = TempDir::new().unwrap();

        let config = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_base_url_override("https://flag.example.com".to_string())
            .with_debounce_override(50)
            .load_with_env(env_of(&[
                (BASE_URL_ENV, "https://env.example.com"),
                (DEBOUNCE_ENV, "120"),
            ]))
            .await
            .unwrap();

        assert_eq!(
            config.search.endpoint.unwrap().base_url,
            "https://flag.example.com"
        );
        assert_eq!(config.search.debounce_ms, 50);
    }

    #[tokio::test]
    async fn test_env_only_configuration() {
        let dir = TempDir::new().unwrap();

        let config = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .load_with_env(env_of(&[(BASE_URL_ENV, "http://localhost:8080")]))
            .await
            .unwrap();

        assert_eq!(
            config.search.endpoint.unwrap().base_url,
            "http://localhost:8080"
        );
        assert_eq!(config.search.debounce_ms, 300);
    }

    #[tokio::test]
    async fn test_non_numeric_debounce_env_fails() {
        let dir = TempDir::new().unwrap();

        let err = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_catalog_override("funds.json".to_string())
            .load_with_env(env_of(&[(DEBOUNCE_ENV, "soon")]))
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("FUNDSEARCH_DEBOUNCE_MS must be a number of milliseconds"));
    }

    #[tokio::test]
    async fn test_git_root_config_found_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        write(
            dir.path(),
            ".fundsearch/config.json",
            r#"{"base_url": "https://repo.example.com", "max_results": 7}"#,
        );
        let nested = dir.path().join("services").join("web");
        std::fs::create_dir_all(&nested).unwrap();

        let config = CliConfigLoader::new()
            .with_working_dir(nested.clone())
            .load_with_env(env_of(&[]))
            .await
            .unwrap();
        assert_eq!(
            config.search.endpoint.unwrap().base_url,
            "https://repo.example.com"
        );
        assert_eq!(config.search.max_results, Some(7));

        // A project file in the working directory still comes first
        write(&nested, "fundsearch.json", r#"{"catalog": "local.json"}"#);
        let config = CliConfigLoader::new()
            .with_working_dir(nested)
            .load_with_env(env_of(&[]))
            .await
            .unwrap();
        assert!(config.search.endpoint.is_none());
        assert_eq!(config.catalog.unwrap().path, PathBuf::from("local.json"));
    }
}
