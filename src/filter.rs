use crate::config::ProfileUrlConfig;
use regex::Regex;
use url::Url;

/// Decides whether a URL points at a scrapeable profile page
#[derive(Debug)]
pub struct ProfileUrlFilter {
    allowed_hosts: Vec<String>,
    path_regex: Regex,
}

impl Default for ProfileUrlFilter {
    fn default() -> Self {
        Self::new(&ProfileUrlConfig::default())
            .expect("Default profile path pattern should be valid")
    }
}

impl ProfileUrlFilter {
    /// Create a new filter from configuration
    pub fn new(config: &ProfileUrlConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            allowed_hosts: config
                .allowed_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            path_regex: Regex::new(&config.path_pattern)?,
        })
    }

    /// True for http(s) URLs on an allowed host whose path matches the profile pattern
    pub fn is_profile(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if !self.is_allowed_host(url) {
            return false;
        }
        self.path_regex.is_match(url.path())
    }

    /// Parse and check a raw URL string
    pub fn is_profile_str(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => self.is_profile(&url),
            Err(e) => {
                ::log::debug!("Rejecting unparseable URL {}: {}", url, e);
                false
            }
        }
    }

    fn is_allowed_host(&self, url: &Url) -> bool {
        // An empty list allows any host
        if self.allowed_hosts.is_empty() {
            return true;
        }
        match url.host_str() {
            Some(host) => {
                let host = host.to_ascii_lowercase();
                self.allowed_hosts.iter().any(|allowed| *allowed == host)
            }
            None => false,
        }
    }
}
