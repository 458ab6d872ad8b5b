// ABOUTME: Config/ConfigBuilder: the explicit, threaded-through configuration for an extraction run.
// ABOUTME: Replaces the teacher's global-ish Options/ClientBuilder with a value passed into extract().

use std::collections::HashMap;
use std::time::Duration;

use crate::logger::DebugSinks;

/// Everything an extraction run needs beyond the parsed document itself:
/// debug sinks, host-specific extraction fallback tables, and the
/// SSRF-relevant fetch knobs the CLI's URL mode uses.
#[derive(Debug, Clone)]
pub struct Config {
    pub debug: DebugSinks,
    pub allow_private_networks: bool,
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra host -> section overrides, merged on top of the built-in
    /// ft.com/news.sky.com/itv.com worked examples (§4.4).
    pub section_host_overrides: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: DebugSinks::default(),
            allow_private_networks: false,
            timeout: Duration::from_secs(30),
            user_agent: "digests-arts/1.0".to_string(),
            section_host_overrides: HashMap::new(),
        }
    }
}

/// Fluent builder for `Config`, mirroring the teacher's `ClientBuilder` chain style.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(mut self, debug: DebugSinks) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.config.allow_private_networks = allow;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn section_host_override(mut self, host: impl Into<String>, section: impl Into<String>) -> Self {
        self.config
            .section_host_overrides
            .insert(host.into(), section.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_null_debug_sinks() {
        let config = Config::default();
        assert!(!config.debug.content.is_enabled());
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = ConfigBuilder::new()
            .allow_private_networks(true)
            .user_agent("test-agent")
            .build();
        assert!(config.allow_private_networks);
        assert_eq!(config.user_agent, "test-agent");
    }
}
