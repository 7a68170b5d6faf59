use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Upper bound on links per profile.
pub const MAX_LINKS: usize = 100;

/// An outbound link on a user's public page, with its display styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_icon_position")]
    pub icon_position: String,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_hover_color")]
    pub hover_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    #[serde(default)]
    pub border: String,
    #[serde(default)]
    pub shadow: String,
}

fn default_icon_position() -> String {
    "left".to_string()
}

fn default_bg_color() -> String {
    "bg-violet-500".to_string()
}

fn default_hover_color() -> String {
    "hover:bg-violet-600".to_string()
}

fn default_text_color() -> String {
    "text-white".to_string()
}

fn default_font_size() -> String {
    "text-base".to_string()
}

fn default_font_weight() -> String {
    "font-medium".to_string()
}

fn default_opacity() -> u8 {
    100
}

impl Link {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: None,
            icon_position: default_icon_position(),
            bg_color: default_bg_color(),
            hover_color: default_hover_color(),
            text_color: default_text_color(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            opacity: default_opacity(),
            border: String::new(),
            shadow: String::new(),
        }
    }

    /// Trim the text fields, drop an empty icon and default the scheme to https.
    fn normalized(mut self) -> Result<Self, DomainError> {
        self.title = self.title.trim().to_string();
        self.url = self.url.trim().to_string();

        if self.title.is_empty() || self.url.is_empty() {
            return Err(DomainError::Validation(
                "Every link needs a title and a url".to_string(),
            ));
        }
        if !self.url.starts_with("http") {
            self.url = format!("https://{}", self.url);
        }
        if self.icon.as_deref().is_some_and(|icon| icon.trim().is_empty()) {
            self.icon = None;
        }
        self.opacity = self.opacity.min(100);

        Ok(self)
    }
}

/// Validate and normalize a full replacement list, keeping its order.
pub fn validate_links(links: Vec<Link>) -> Result<Vec<Link>, DomainError> {
    if links.len() > MAX_LINKS {
        return Err(DomainError::Validation(format!(
            "A profile can hold at most {} links",
            MAX_LINKS
        )));
    }

    links.into_iter().map(Link::normalized).collect()
}
