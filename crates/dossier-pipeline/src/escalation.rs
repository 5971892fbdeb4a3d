//! Escalation to secondary sources
//!
//! When the filter confirms too few tail pages, the core cluster may still
//! contain a source-hosting profile or a professional-network profile. Both
//! are consulted for a name and a few facts, and a name search can turn up
//! further pages about the person.

use crate::config::EscalationConfig;
use dossier_domain::traits::{
    HostedProfile, NetworkIdentity, ProfessionalNetworkLookup, SourceHostingLookup, WebSearch,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Url fragment of a professional-network profile page
pub const NETWORK_PROFILE_MARKER: &str = "linkedin.com/in";

/// Url fragment of a source-hosting profile page
pub const HOSTING_PROFILE_MARKER: &str = "github.com";

/// What escalation found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationOutcome {
    /// Newline-separated facts for the extraction prompt
    pub supplement_text: String,

    /// Supplementary pages to fetch, in discovery order
    pub urls: Vec<String>,
}

impl EscalationOutcome {
    /// Whether escalation found nothing at all
    pub fn is_empty(&self) -> bool {
        self.supplement_text.is_empty() && self.urls.is_empty()
    }
}

/// Gathers supplementary evidence from profile pages in the core cluster
pub struct EscalationSource {
    hosting: Arc<dyn SourceHostingLookup>,
    network: Arc<dyn ProfessionalNetworkLookup>,
    search: Arc<dyn WebSearch>,
    config: EscalationConfig,
}

impl EscalationSource {
    /// Create an escalation source
    pub fn new(
        hosting: Arc<dyn SourceHostingLookup>,
        network: Arc<dyn ProfessionalNetworkLookup>,
        search: Arc<dyn WebSearch>,
        config: EscalationConfig,
    ) -> Self {
        Self {
            hosting,
            network,
            search,
            config,
        }
    }

    /// Whether `confirmed` tail matches are too few and escalation should run
    pub fn is_needed(&self, confirmed: usize) -> bool {
        confirmed < self.config.min_confirmed
    }

    /// Look for profile urls among `core_urls` and collect what they say.
    ///
    /// The first url of each kind wins. Failures of any lookup only shrink
    /// the outcome.
    pub async fn escalate(&self, core_urls: &[&str]) -> EscalationOutcome {
        let network_url = core_urls.iter().find(|u| u.contains(NETWORK_PROFILE_MARKER));
        let hosting_url = core_urls.iter().find(|u| u.contains(HOSTING_PROFILE_MARKER));

        if network_url.is_none() && hosting_url.is_none() {
            debug!("No profile urls in the core cluster");
            return EscalationOutcome::default();
        }

        let hosted = match hosting_url {
            Some(url) => self.hosting.lookup_profile(url).await,
            None => None,
        };
        let readme = match &hosted {
            Some(profile) => self.hosting.fetch_readme(profile).await,
            None => String::new(),
        };
        let identity = match network_url {
            Some(url) => self.network.lookup_identity(url).await,
            None => NetworkIdentity::default(),
        };

        let mut lines = Vec::new();
        let mut urls = Vec::new();
        let names_agree = describe(&mut lines, hosted.as_ref(), &readme, &identity);

        if let Some(blog) = hosted.as_ref().and_then(|p| p.blog_url.clone()) {
            urls.push(blog);
        }

        if identity.is_resolved() && !names_agree {
            for url in self.name_search(&identity).await {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }

        urls.truncate(self.config.max_supplementary_urls);

        info!(
            facts = lines.len(),
            urls = urls.len(),
            hosting = hosted.is_some(),
            network = identity.is_resolved(),
            "Escalation complete"
        );

        EscalationOutcome {
            supplement_text: lines.join("\n"),
            urls,
        }
    }

    /// Search the open web for `"{name} {location}"`, keeping pages that
    /// mention the name and are not network profiles
    async fn name_search(&self, identity: &NetworkIdentity) -> Vec<String> {
        tokio::time::sleep(self.config.search_delay()).await;

        let query = format!("{} {}", identity.name, identity.location);
        let query = query.trim();
        let hits = match self.search.search(query, self.config.name_search_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "Name search failed");
                return Vec::new();
            }
        };

        let name = identity.name.to_lowercase();
        hits.into_iter()
            .filter(|hit| !hit.url.contains(NETWORK_PROFILE_MARKER))
            .filter(|hit| {
                hit.body.to_lowercase().contains(&name) || hit.title.to_lowercase().contains(&name)
            })
            .map(|hit| hit.url)
            .collect()
    }
}

/// Write the fact lines for the two profiles. Returns whether both sources
/// agree on the name.
fn describe(
    lines: &mut Vec<String>,
    hosted: Option<&HostedProfile>,
    readme: &str,
    identity: &NetworkIdentity,
) -> bool {
    let hosted_name = hosted.and_then(|p| p.name.as_deref()).unwrap_or("");
    let names_agree = identity.is_resolved()
        && !hosted_name.is_empty()
        && identity.name.to_lowercase() == hosted_name.to_lowercase();

    if names_agree {
        lines.push(format!(
            "Both GitHub and LinkedIn source agree the person's name is {}.",
            identity.name
        ));
    } else if !hosted_name.is_empty() {
        lines.push(format!(
            "GitHub source suggests the person's name is {}.",
            hosted_name
        ));
    }

    if let Some(profile) = hosted {
        let subject = if hosted_name.is_empty() {
            profile.login.as_str()
        } else {
            hosted_name
        };
        if let Some(email) = &profile.email {
            lines.push(format!("{}'s GitHub email: {}.", subject, email));
        }
        if !readme.trim().is_empty() {
            lines.push(format!("{}'s GitHub README: {}.", subject, readme.trim()));
        }
        if let Some(url) = &profile.profile_url {
            lines.push(format!("{}'s GitHub profile: {}.", subject, url));
        }
    }

    if identity.is_resolved() && !names_agree {
        lines.push(format!(
            "LinkedIn source suggests the person's name is {}.",
            identity.name
        ));
    }

    names_agree
}
