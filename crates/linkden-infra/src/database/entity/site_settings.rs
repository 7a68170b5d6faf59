//! Site settings entity. A single row with id [`SETTINGS_ID`].

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use linkden_core::domain::SiteSettings;

pub const SETTINGS_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub registration_enabled: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub disallowed_domains: Json,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SiteSettings {
    fn from(model: Model) -> Self {
        let domains: Vec<String> =
            serde_json::from_value(model.disallowed_domains).unwrap_or_default();

        Self {
            registration_enabled: model.registration_enabled,
            disallowed_domains: domains,
        }
    }
}

impl From<SiteSettings> for ActiveModel {
    fn from(settings: SiteSettings) -> Self {
        Self {
            id: Set(SETTINGS_ID),
            registration_enabled: Set(settings.registration_enabled),
            disallowed_domains: Set(Json::from(settings.disallowed_domains)),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}
