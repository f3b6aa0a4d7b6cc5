pub mod link;
pub mod profile;
pub mod social_link;
pub mod user;

pub use link::Entity as LinkEntity;
pub use profile::Entity as ProfileEntity;
pub use social_link::Entity as SocialLinkEntity;
pub use user::Entity as UserEntity;
