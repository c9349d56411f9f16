//! Domain entities - the core business objects and their consistency rules.

mod normalize;
mod post;
mod profile;
mod user;

pub use normalize::{normalize_skills, normalize_url, split_skills};
pub use post::{Comment, Like, Post, PostChange};
pub use profile::{
    Education, Experience, FollowEntry, Profile, ProfileChange, ProfileFields, SocialLinks,
};
pub use user::{DEFAULT_AVATAR, User};
