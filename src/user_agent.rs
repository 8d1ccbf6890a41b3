//! User-Agent rotation.
//!
//! Every page fetch and every search attempt picks a user agent at random from
//! the configured pool so consecutive requests do not share one fingerprint.

use rand::seq::IndexedRandom;

use crate::config::DEFAULT_USER_AGENT;

/// Chrome version used in the built-in pool.
const CHROME_VERSION: &str = "131.0.0.0";

/// Built-in desktop browser user agents used when no pool is configured.
pub fn default_user_agent_pool() -> Vec<String> {
    vec![
        format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{CHROME_VERSION} Safari/537.36"
        ),
        format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{CHROME_VERSION} Safari/537.36"
        ),
        format!(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{CHROME_VERSION} Safari/537.36"
        ),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15".to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0".to_string(),
    ]
}

/// Random choice over a fixed list of user agents.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Creates a pool; blank entries are dropped and an empty pool falls back
    /// to [`DEFAULT_USER_AGENT`].
    pub fn new(agents: &[String]) -> Self {
        let agents: Vec<String> = agents
            .iter()
            .map(|ua| ua.trim())
            .filter(|ua| !ua.is_empty())
            .map(str::to_string)
            .collect();
        if agents.is_empty() {
            log::warn!("User agent pool is empty, using the default user agent");
            return Self {
                agents: vec![DEFAULT_USER_AGENT.to_string()],
            };
        }
        Self { agents }
    }

    /// Picks a user agent uniformly at random.
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
