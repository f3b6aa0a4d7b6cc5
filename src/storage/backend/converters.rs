use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{Link, LinkChanges, NewLink, Profile, SocialLink, Theme, User};
use migration::entities::{link, profile, social_link, user};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        owner: model.user_id,
        title: model.title,
        url: model.url,
        description: model.description,
        position: model.position,
        is_active: model.is_active,
        click_count: model.click_count.max(0),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn new_link_to_active_model(
    link: &NewLink,
    now: chrono::DateTime<chrono::Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(link.id.clone()),
        user_id: Set(link.owner.clone()),
        title: Set(link.title.clone()),
        url: Set(link.url.clone()),
        description: Set(link.description.clone()),
        position: Set(link.position),
        is_active: Set(true),
        click_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// 只设置提供了的字段，其余保持 NotSet；position 永远不在这里修改
pub fn changes_to_active_model(
    changes: &LinkChanges,
    now: chrono::DateTime<chrono::Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        title: changes.title.clone().map_or(NotSet, Set),
        url: changes.url.clone().map_or(NotSet, Set),
        description: changes.description.clone().map_or(NotSet, Set),
        is_active: changes.is_active.map_or(NotSet, Set),
        updated_at: Set(now),
        ..Default::default()
    }
}

pub fn model_to_profile(model: profile::Model) -> Profile {
    let theme = model.theme.parse::<Theme>().unwrap_or_else(|e| {
        warn!("Profile {} has unknown theme, using light: {}", model.user_id, e);
        Theme::Light
    });

    Profile {
        user_id: model.user_id,
        username: model.username,
        display_name: model.display_name,
        bio: model.bio,
        avatar_url: model.avatar_url,
        theme,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

pub fn model_to_social_link(model: social_link::Model) -> SocialLink {
    SocialLink {
        id: model.id,
        user_id: model.user_id,
        platform: model.platform,
        url: model.url,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let now = Utc::now();
        let am = changes_to_active_model(
            &LinkChanges {
                is_active: Some(false),
                ..Default::default()
            },
            now,
        );

        assert!(matches!(am.is_active, ActiveValue::Set(false)));
        assert!(matches!(am.title, ActiveValue::NotSet));
        assert!(matches!(am.url, ActiveValue::NotSet));
        assert!(matches!(am.description, ActiveValue::NotSet));
        assert!(matches!(am.position, ActiveValue::NotSet));
        assert!(matches!(am.updated_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_clearing_description() {
        let am = changes_to_active_model(
            &LinkChanges {
                description: Some(None),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(matches!(am.description, ActiveValue::Set(None)));
    }

    #[test]
    fn test_unknown_theme_falls_back_to_light() {
        let now = Utc::now();
        let profile = model_to_profile(profile::Model {
            user_id: "u1".into(),
            username: "alice".into(),
            display_name: None,
            bio: None,
            avatar_url: None,
            theme: "neon".into(),
            position_high_water: 0,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(profile.theme, Theme::Light);
    }

    #[test]
    fn test_new_link_defaults() {
        let now = Utc::now();
        let am = new_link_to_active_model(
            &NewLink {
                id: "l1".into(),
                owner: "u1".into(),
                title: "t".into(),
                url: "https://a.com".into(),
                description: None,
                position: 4,
            },
            now,
        );
        assert!(matches!(am.is_active, ActiveValue::Set(true)));
        assert!(matches!(am.click_count, ActiveValue::Set(0)));
        assert!(matches!(am.position, ActiveValue::Set(4)));
    }
}
