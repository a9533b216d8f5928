use sea_orm::entity::prelude::*;

/// One session row per (user, device) pair. Creating a new session for the
/// same pair overwrites this row in place.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub device_id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub access_token: String,

    #[sea_orm(unique)]
    pub refresh_token: String,

    /// RFC 3339 instant the access token stops being valid. Authoritative;
    /// the embedded JWT exp is never consulted.
    pub access_expires: String,

    /// RFC 3339 instant the refresh token stops being valid.
    pub refresh_expires: String,

    /// "active" or "expired"
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,

    #[sea_orm(
        belongs_to = "super::devices::Entity",
        from = "Column::DeviceId",
        to = "super::devices::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Devices,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
