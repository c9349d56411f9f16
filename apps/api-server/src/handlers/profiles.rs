//! Profile upsert and reads, experience/education entries, follows and
//! account removal.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde_json::{Value, json};
use uuid::Uuid;

use circle_core::domain::{
    Education, Experience, FollowEntry, Profile, ProfileChange, ProfileFields, SocialLinks, User,
};
use circle_core::error::RepoError;
use circle_shared::dto::{EducationRequest, ExperienceRequest, ProfileRequest};
use circle_shared::{FieldError, MessageResponse};

use super::validated;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn profile_fields(req: ProfileRequest) -> ProfileFields {
    ProfileFields {
        company: req.company,
        website: req.website,
        country: req.country,
        location: req.location,
        status: req.status,
        skills: req.skills.map(|s| s.into_items()).unwrap_or_default(),
        bio: req.bio,
        social: SocialLinks {
            youtube: req.youtube,
            twitter: req.twitter,
            facebook: req.facebook,
            linkedin: req.linkedin,
            instagram: req.instagram,
            github: req.github,
        },
    }
}

fn required_from(from: Option<chrono::NaiveDate>) -> AppResult<chrono::NaiveDate> {
    from.ok_or_else(|| {
        AppError::Validation(vec![FieldError {
            field: "from".to_string(),
            message: "From date is required".to_string(),
        }])
    })
}

/// Profile JSON with `user` expanded to the owner's id, name and avatar.
fn populate(profile: &Profile, owner: Option<&User>) -> AppResult<Value> {
    let mut value =
        serde_json::to_value(profile).map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(owner) = owner {
        value["user"] = json!({
            "id": owner.id,
            "name": owner.name,
            "avatar": owner.avatar,
        });
    }

    Ok(value)
}

async fn populated(state: &AppState, profile: &Profile) -> AppResult<Value> {
    let owner = state.users.find_by_id(profile.user_id).await?;
    populate(profile, owner.as_ref())
}

async fn profile_of(state: &AppState, user_id: Uuid, missing: &str) -> AppResult<Profile> {
    state
        .profiles
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(missing.to_string()))
}

/// POST /api/profiles - create or overwrite the caller's profile.
pub async fn upsert(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let owner = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = state.profiles.upsert(owner.id, profile_fields(req)).await?;

    Ok(HttpResponse::Ok().json(populate(&profile, Some(&owner))?))
}

/// GET /api/profiles/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, identity.user_id, "There is no profile for this user")
        .await?;
    Ok(HttpResponse::Ok().json(populated(&state, &profile).await?))
}

/// GET /api/profiles
pub async fn list(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let profiles = state.profiles.list().await?;

    let ids: Vec<Uuid> = profiles.iter().map(|p| p.user_id).collect();
    let owners: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let body = profiles
        .iter()
        .map(|p| populate(p, owners.get(&p.user_id)))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/profiles/user/{user_id}
pub async fn by_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, path.into_inner(), "Profile not found").await?;
    Ok(HttpResponse::Ok().json(populated(&state, &profile).await?))
}

/// DELETE /api/profiles - remove the caller's posts, profile and account.
pub async fn delete_account(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let removed = state
        .accounts
        .delete_account(identity.user_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        user_id = %identity.user_id,
        posts = removed.posts,
        profile = removed.profile,
        "Account deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}

async fn apply_change(
    state: &AppState,
    identity: Identity,
    change: ProfileChange,
) -> AppResult<Value> {
    let profile = state.profiles.modify(identity.user_id, change).await?;
    populated(state, &profile).await
}

/// PUT /api/profiles/experience
pub async fn add_experience(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ExperienceRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let entry = Experience {
        id: Uuid::nil(),
        title: req.title,
        company: req.company,
        location: req.location,
        from: required_from(req.from)?,
        to: req.to,
        current: req.current,
        description: req.description,
    };

    let body = apply_change(&state, identity, ProfileChange::AddExperience(entry)).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/profiles/experience/{id} - unknown ids leave the list as is.
pub async fn remove_experience(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let change = ProfileChange::RemoveExperience(path.into_inner());
    let body = apply_change(&state, identity, change).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/profiles/education
pub async fn add_education(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<EducationRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let entry = Education {
        id: Uuid::nil(),
        school: req.school,
        degree: req.degree,
        field_of_study: req.fieldofstudy,
        from: required_from(req.from)?,
        to: req.to,
        current: req.current,
        description: req.description,
    };

    let body = apply_change(&state, identity, ProfileChange::AddEducation(entry)).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/profiles/education/{id}
pub async fn remove_education(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let change = ProfileChange::RemoveEducation(path.into_inner());
    let body = apply_change(&state, identity, change).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/profiles/follow/{user_id} - returns the caller's `following`.
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let target = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let entry = FollowEntry::new(target.id, target.name, target.avatar);
    let profile = state
        .profiles
        .modify(identity.user_id, ProfileChange::Follow(entry))
        .await?;

    Ok(HttpResponse::Ok().json(profile.following))
}

/// PUT /api/profiles/unfollow/{user_id} - returns the caller's `following`.
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = state
        .profiles
        .modify(identity.user_id, ProfileChange::Unfollow(path.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(profile.following))
}

/// GET /api/profiles/followers
pub async fn my_followers(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, identity.user_id, "Profile not found").await?;
    Ok(HttpResponse::Ok().json(profile.followers))
}

/// GET /api/profiles/followers/{user_id}
pub async fn followers(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, path.into_inner(), "Profile not found").await?;
    Ok(HttpResponse::Ok().json(profile.followers))
}

/// GET /api/profiles/following
pub async fn my_following(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, identity.user_id, "Profile not found").await?;
    Ok(HttpResponse::Ok().json(profile.following))
}

/// GET /api/profiles/following/{user_id}
pub async fn following(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = profile_of(&state, path.into_inner(), "Profile not found").await?;
    Ok(HttpResponse::Ok().json(profile.following))
}
