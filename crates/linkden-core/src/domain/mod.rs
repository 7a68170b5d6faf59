//! Domain entities - the core business objects.

mod client;
mod link;
mod profile;
mod site_settings;
mod user;

pub use client::{ANONYMOUS_CLIENT, derive_client_key};
pub use link::{Link, MAX_LINKS, validate_links};
pub use profile::{DEFAULT_PROFILE_IMAGE, Profile, Theme, normalize_handle};
pub use site_settings::SiteSettings;
pub use user::{User, validate_username};
