//! Professional-network name lookup through web search results

use async_trait::async_trait;
use dossier_domain::traits::{NetworkIdentity, ProfessionalNetworkLookup, WebSearch};
use std::sync::Arc;
use tracing::debug;

/// Results requested when searching for a profile url
const PROFILE_SEARCH_RESULTS: usize = 2;

/// Marker a result title must carry to be treated as the profile page
const NETWORK_TITLE_MARKER: &str = "LinkedIn";

/// Resolves a profile url to a name by searching for the url and reading
/// the title of the first result that belongs to the network
pub struct SearchNameLookup {
    search: Arc<dyn WebSearch>,
}

impl SearchNameLookup {
    /// Create a lookup over a web search backend
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ProfessionalNetworkLookup for SearchNameLookup {
    async fn lookup_identity(&self, url: &str) -> NetworkIdentity {
        let query = url.strip_suffix('/').unwrap_or(url);
        let hits = match self.search.search(query, PROFILE_SEARCH_RESULTS).await {
            Ok(hits) => hits,
            Err(e) => {
                debug!(url, error = %e, "Profile search failed");
                return NetworkIdentity::default();
            }
        };

        hits.iter()
            .find(|h| h.title.contains(NETWORK_TITLE_MARKER))
            .map(|h| parse_profile_title(&h.title))
            .unwrap_or_default()
    }
}

/// Recover a name and location from a `"Name - Headline - Place, Region"`
/// style result title.
///
/// Segments are separated by `" - "`, so hyphenated names stay whole. The
/// name is the first segment. The location is read only when there are
/// exactly three segments: the first comma-separated part of the last
/// segment. A title with no separator yields an empty identity.
///
/// # Examples
///
/// ```
/// use dossier_sources::parse_profile_title;
///
/// let id = parse_profile_title("Jane Doe - Software Engineer - Seattle, Washington | LinkedIn");
/// assert_eq!(id.name, "Jane Doe");
/// assert_eq!(id.location, "Seattle");
///
/// let id = parse_profile_title("Jane Doe - Acme | LinkedIn");
/// assert_eq!(id.name, "Jane Doe");
/// assert_eq!(id.location, "");
/// ```
pub fn parse_profile_title(title: &str) -> NetworkIdentity {
    let segments: Vec<&str> = title.split(" - ").collect();
    if segments.len() < 2 {
        return NetworkIdentity::default();
    }

    let name = segments[0].trim();
    if name.is_empty() {
        return NetworkIdentity::default();
    }

    let location = if segments.len() == 3 {
        segments[2]
            .split('|')
            .next()
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .unwrap_or_default()
    } else {
        ""
    };

    NetworkIdentity {
        name: name.to_string(),
        location: location.to_string(),
    }
}
