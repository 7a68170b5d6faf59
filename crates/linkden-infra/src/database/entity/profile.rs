//! Profile settings entity, one row per user.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use linkden_core::domain::{Profile, Theme};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub handle: String,
    pub display_name: String,
    pub profile_image: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub theme: Json,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Profile {
    fn from(model: Model) -> Self {
        let theme: Theme = serde_json::from_value(model.theme).unwrap_or_default();

        Self {
            user_id: model.user_id,
            handle: model.handle,
            display_name: model.display_name,
            profile_image: model.profile_image,
            theme,
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Profile> for ActiveModel {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: Set(profile.user_id),
            handle: Set(profile.handle),
            display_name: Set(profile.display_name),
            profile_image: Set(profile.profile_image),
            theme: Set(serde_json::to_value(&profile.theme).unwrap_or(Json::Null)),
            updated_at: Set(profile.updated_at.into()),
        }
    }
}
