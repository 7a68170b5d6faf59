//! SeaORM entities.

pub mod profile;
pub mod site_settings;
pub mod user;
