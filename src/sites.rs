//! Supported subscription sites and their regional-pricing identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sites the system knows regional prices for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Netflix,
    Spotify,
    Adobe,
}

impl Site {
    /// Returns the identifier used in config and pricing tables.
    pub fn id(&self) -> &'static str {
        match self {
            Site::Netflix => "netflix",
            Site::Spotify => "spotify",
            Site::Adobe => "adobe",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Site::Netflix => "Netflix",
            Site::Spotify => "Spotify",
            Site::Adobe => "Adobe",
        }
    }

    /// Returns the primary domain.
    pub fn domain(&self) -> &'static str {
        match self {
            Site::Netflix => "netflix.com",
            Site::Spotify => "spotify.com",
            Site::Adobe => "adobe.com",
        }
    }

    /// Detects a site from a hostname ("www.netflix.com" matches Netflix).
    pub fn from_hostname(hostname: &str) -> Option<Site> {
        let hostname = hostname.to_lowercase();
        Site::all().iter().copied().find(|site| hostname.contains(site.id()))
    }

    /// Returns all supported sites.
    pub fn all() -> &'static [Site] {
        &[Site::Netflix, Site::Spotify, Site::Adobe]
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Site {
    type Err = SiteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        match lowered.as_str() {
            "netflix" | "netflix.com" => Ok(Site::Netflix),
            "spotify" | "spotify.com" => Ok(Site::Spotify),
            "adobe" | "adobe.com" => Ok(Site::Adobe),
            _ => Site::from_hostname(&lowered).ok_or_else(|| SiteParseError(s.to_string())),
        }
    }
}

/// Error for unrecognized site names.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown site '{0}'. Valid sites: netflix, spotify, adobe")]
pub struct SiteParseError(String);
