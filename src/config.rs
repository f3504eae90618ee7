//! Hydrator configuration and the page markup contract.

use std::time::Duration;

/// Modrinth public API (v2). No key required.
pub const DEFAULT_API_BASE: &str = "https://api.modrinth.com/v2";

/// Upper bound on a single project lookup, request and body decode included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(6000);

/// Prefix for every cache key; the full key is `CACHE_NAMESPACE + slug`.
pub const CACHE_NAMESPACE: &str = "mr_icon_url:";

pub const USER_AGENT: &str = concat!("icon_hydrator/", env!("CARGO_PKG_VERSION"));

/// Selectors and names the hydrator expects in the page.
///
/// Only existence is checked; the markup itself comes from the site templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupContract {
    /// CSS selector for hydration targets
    pub card_selector: String,
    /// Attribute on the card holding the project slug
    pub slug_attribute: String,
    /// CSS selector (relative to the card) for the logo image
    pub logo_selector: String,
    /// Class added to the card once its icon has loaded
    pub has_icon_class: String,
    /// Attribute on the logo remembering its `src` from before hydration
    pub fallback_src_attribute: String,
}

impl Default for MarkupContract {
    fn default() -> Self {
        Self {
            card_selector: "article.shaderCard[data-modrinth]".to_string(),
            slug_attribute: "data-modrinth".to_string(),
            logo_selector: ".shaderCard__logoImg".to_string(),
            has_icon_class: "has-icon".to_string(),
            fallback_src_attribute: "data-fallback-src".to_string(),
        }
    }
}

/// Settings for a `Hydrator` and the clients it builds.
#[derive(Debug, Clone)]
pub struct HydratorConfig {
    /// Base URL of the project API, without trailing slash
    pub api_base: String,
    /// Time budget for each project lookup
    pub timeout: Duration,
    /// Time budget for each icon load attempt
    pub image_timeout: Duration,
    /// Cache key namespace
    pub cache_namespace: String,
    pub markup: MarkupContract,
}

impl Default for HydratorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            image_timeout: DEFAULT_TIMEOUT,
            cache_namespace: CACHE_NAMESPACE.to_string(),
            markup: MarkupContract::default(),
        }
    }
}

impl HydratorConfig {
    /// Point the API client at another base URL (e.g. a mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
