//! Profile entity for SeaORM. Nested lists live in JSONB columns so a profile
//! is read and written as one row.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use circle_core::domain::{Education, Experience, FollowEntry, ProfileFields, SocialLinks};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Skills(pub Vec<String>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Social(pub SocialLinks);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ExperienceList(pub Vec<Experience>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct EducationList(pub Vec<Education>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct FollowList(pub Vec<FollowEntry>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub company: String,
    pub website: String,
    pub country: String,
    pub location: String,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Skills,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub social: Social,
    #[sea_orm(column_type = "JsonBinary")]
    pub experience: ExperienceList,
    #[sea_orm(column_type = "JsonBinary")]
    pub education: EducationList,
    #[sea_orm(column_type = "JsonBinary")]
    pub followers: FollowList,
    #[sea_orm(column_type = "JsonBinary")]
    pub following: FollowList,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
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

impl From<Model> for circle_core::domain::Profile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            fields: ProfileFields {
                company: model.company,
                website: model.website,
                country: model.country,
                location: model.location,
                status: model.status,
                skills: model.skills.0,
                bio: model.bio,
                social: model.social.0,
            },
            experience: model.experience.0,
            education: model.education.0,
            followers: model.followers.0,
            following: model.following.0,
            created_at: model.created_at.into(),
        }
    }
}

impl From<circle_core::domain::Profile> for ActiveModel {
    fn from(profile: circle_core::domain::Profile) -> Self {
        let fields = profile.fields;
        Self {
            id: Set(profile.id),
            user_id: Set(profile.user_id),
            company: Set(fields.company),
            website: Set(fields.website),
            country: Set(fields.country),
            location: Set(fields.location),
            status: Set(fields.status),
            skills: Set(Skills(fields.skills)),
            bio: Set(fields.bio),
            social: Set(Social(fields.social)),
            experience: Set(ExperienceList(profile.experience)),
            education: Set(EducationList(profile.education)),
            followers: Set(FollowList(profile.followers)),
            following: Set(FollowList(profile.following)),
            created_at: Set(profile.created_at.into()),
        }
    }
}
