use serde::{Deserialize, Serialize};

/// Site-wide registration policy, managed by admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub registration_enabled: bool,
    /// E-mail domains that may not register.
    pub disallowed_domains: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            registration_enabled: true,
            disallowed_domains: Vec::new(),
        }
    }
}

impl SiteSettings {
    /// Keep only entries that look like domains, lowercased and deduplicated.
    pub fn sanitize_domains<I, S>(domains: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for domain in domains {
            let domain = domain.as_ref().trim().to_lowercase();
            let looks_valid = domain.contains('.') && !domain.contains(' ') && domain.len() > 3;
            if looks_valid && !kept.contains(&domain) {
                kept.push(domain);
            }
        }
        kept
    }

    /// Whether an address on this domain may register.
    pub fn allows_email(&self, email: &str) -> bool {
        let Some((_, domain)) = email.rsplit_once('@') else {
            return true;
        };
        let domain = domain.to_lowercase();

        !self
            .disallowed_domains
            .iter()
            .any(|blocked| domain == *blocked || domain.ends_with(&format!(".{}", blocked)))
    }
}
