use super::FieldError;
use super::urls::is_valid_url;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const DISPLAY_NAME_MAX_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 500;
pub const PLATFORM_MAX_CHARS: usize = 30;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 6;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const PLATFORM_REQUIRED: &str = "Platform is required";

const USERNAME_RULE: &str = "Username must be 3-30 characters and contain only lowercase letters, numbers, hyphens, and underscores";

/// Candidate link fields; `None` means "not supplied".
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkFields<'a> {
    pub title: Option<&'a str>,
    pub url: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Candidate profile fields; `None` means "not supplied".
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileFields<'a> {
    pub username: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AccountFields<'a> {
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SocialLinkFields<'a> {
    pub platform: Option<&'a str>,
    pub url: Option<&'a str>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 校验链接字段，返回全部字段错误（空 Vec 表示通过）
///
/// 空 description 视为"未填写"，不做长度检查。
pub fn validate_link_data(data: &LinkFields<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(title) = data.title {
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", TITLE_REQUIRED));
        } else if char_len(title) > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                "Title must be 100 characters or less",
            ));
        }
    }

    if let Some(url) = data.url {
        if url.trim().is_empty() {
            errors.push(FieldError::new("url", "URL is required"));
        } else if !is_valid_url(url) {
            errors.push(FieldError::new("url", "Invalid URL format"));
        }
    }

    if let Some(description) = data.description
        && !description.is_empty()
        && char_len(description) > DESCRIPTION_MAX_CHARS
    {
        errors.push(FieldError::new(
            "description",
            "Description must be 500 characters or less",
        ));
    }

    errors
}

/// 清洗后再检查一次必填文本
///
/// 只由 `<`、`>` 和空白组成的输入能通过原始校验，清洗后却是空串。
/// 该字段已经有错误时不再重复报告。
pub fn require_sanitized(
    errors: &mut Vec<FieldError>,
    field: &str,
    sanitized: &str,
    message: &str,
) {
    if sanitized.is_empty() && !errors.iter().any(|e| e.field == field) {
        errors.push(FieldError::new(field, message));
    }
}

/// 校验个人主页字段
///
/// username 不在这里做大小写归一化，调用方需先调用 [`normalize_username`]。
pub fn validate_profile_data(data: &ProfileFields<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(username) = data.username {
        if username.is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        } else if !is_valid_username(username) {
            errors.push(FieldError::new("username", USERNAME_RULE));
        }
    }

    if let Some(display_name) = data.display_name
        && char_len(display_name) > DISPLAY_NAME_MAX_CHARS
    {
        errors.push(FieldError::new(
            "display_name",
            "Display name must be 50 characters or less",
        ));
    }

    if let Some(bio) = data.bio
        && char_len(bio) > BIO_MAX_CHARS
    {
        errors.push(FieldError::new("bio", "Bio must be 500 characters or less"));
    }

    if let Some(avatar_url) = data.avatar_url
        && !avatar_url.trim().is_empty()
        && !is_valid_url(avatar_url)
    {
        errors.push(FieldError::new("avatar_url", "Invalid avatar URL"));
    }

    errors
}

pub fn validate_account_data(data: &AccountFields<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(email) = data.email
        && !is_valid_email(email)
    {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if let Some(password) = data.password
        && char_len(password) < PASSWORD_MIN_CHARS
    {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    errors
}

pub fn validate_social_link_data(data: &SocialLinkFields<'_>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(platform) = data.platform {
        if platform.trim().is_empty() {
            errors.push(FieldError::new("platform", PLATFORM_REQUIRED));
        } else if char_len(platform) > PLATFORM_MAX_CHARS {
            errors.push(FieldError::new(
                "platform",
                "Platform must be 30 characters or less",
            ));
        }
    }

    if let Some(url) = data.url {
        if url.trim().is_empty() {
            errors.push(FieldError::new("url", "URL is required"));
        } else if !is_valid_url(url) {
            errors.push(FieldError::new("url", "Invalid URL format"));
        }
    }

    errors
}

/// `^[a-z0-9_-]{3,30}$`，大小写敏感
pub fn is_valid_username(username: &str) -> bool {
    let len = username.len();
    (USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len)
        && username
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// Registration and profile edits accept "  Alice " and store "alice".
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@domain.tld`, no whitespace anywhere, exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_link_passes() {
        let errors = validate_link_data(&LinkFields {
            title: Some("My site"),
            url: Some("https://example.com"),
            description: Some("About me"),
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn test_absent_fields_are_not_checked() {
        assert!(validate_link_data(&LinkFields::default()).is_empty());
        assert!(validate_profile_data(&ProfileFields::default()).is_empty());
    }

    #[test]
    fn test_title_rules() {
        let errors = validate_link_data(&LinkFields {
            title: Some("   "),
            ..Default::default()
        });
        assert_eq!(errors, vec![FieldError::new("title", "Title is required")]);

        let exactly_100 = "a".repeat(100);
        assert!(
            validate_link_data(&LinkFields {
                title: Some(&exactly_100),
                ..Default::default()
            })
            .is_empty()
        );

        let too_long = "a".repeat(101);
        let errors = validate_link_data(&LinkFields {
            title: Some(&too_long),
            ..Default::default()
        });
        assert_eq!(errors[0].message, "Title must be 100 characters or less");
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        let multibyte = "é".repeat(100);
        assert!(
            validate_link_data(&LinkFields {
                title: Some(&multibyte),
                ..Default::default()
            })
            .is_empty()
        );
    }

    #[test]
    fn test_url_rules() {
        let errors = validate_link_data(&LinkFields {
            url: Some(""),
            ..Default::default()
        });
        assert_eq!(errors, vec![FieldError::new("url", "URL is required")]);

        let errors = validate_link_data(&LinkFields {
            url: Some("javascript:alert(1)"),
            ..Default::default()
        });
        assert_eq!(errors, vec![FieldError::new("url", "Invalid URL format")]);
    }

    #[test]
    fn test_empty_description_skips_length_check() {
        assert!(
            validate_link_data(&LinkFields {
                description: Some(""),
                ..Default::default()
            })
            .is_empty()
        );

        let too_long = "d".repeat(501);
        let errors = validate_link_data(&LinkFields {
            description: Some(&too_long),
            ..Default::default()
        });
        assert_eq!(fields(&errors), vec!["description"]);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let long_description = "d".repeat(600);
        let errors = validate_link_data(&LinkFields {
            title: Some(""),
            url: Some("ftp://x"),
            description: Some(&long_description),
        });
        assert_eq!(fields(&errors), vec!["title", "url", "description"]);
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("user_name-01"));
        assert!(is_valid_username(&"a".repeat(30)));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"a".repeat(31)));
        assert!(!is_valid_username("Alice"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dot.name"));
        assert!(!is_valid_username("ünï"));
    }

    #[test]
    fn test_profile_username_is_case_sensitive() {
        let errors = validate_profile_data(&ProfileFields {
            username: Some("Alice"),
            ..Default::default()
        });
        assert_eq!(errors[0].message, USERNAME_RULE);

        let normalized = normalize_username("  Alice ");
        assert_eq!(normalized, "alice");
        assert!(
            validate_profile_data(&ProfileFields {
                username: Some(&normalized),
                ..Default::default()
            })
            .is_empty()
        );
    }

    #[test]
    fn test_profile_optional_fields() {
        let long_name = "n".repeat(51);
        let long_bio = "b".repeat(501);
        let errors = validate_profile_data(&ProfileFields {
            username: None,
            display_name: Some(&long_name),
            bio: Some(&long_bio),
            avatar_url: Some("not-a-url"),
        });
        assert_eq!(fields(&errors), vec!["display_name", "bio", "avatar_url"]);
        assert_eq!(errors[2].message, "Invalid avatar URL");

        assert!(
            validate_profile_data(&ProfileFields {
                avatar_url: Some(""),
                ..Default::default()
            })
            .is_empty()
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@example.org"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@example"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b.c@d.e"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn test_account_password_length() {
        let errors = validate_account_data(&AccountFields {
            email: Some("a@b.co"),
            password: Some("12345"),
        });
        assert_eq!(fields(&errors), vec!["password"]);
    }

    #[test]
    fn test_social_link_rules() {
        let errors = validate_social_link_data(&SocialLinkFields {
            platform: Some(""),
            url: Some("gopher://old"),
        });
        assert_eq!(fields(&errors), vec!["platform", "url"]);
    }

    #[test]
    fn test_require_sanitized() {
        let mut errors = Vec::new();
        require_sanitized(&mut errors, "title", "", TITLE_REQUIRED);
        assert_eq!(fields(&errors), vec!["title"]);
        assert_eq!(errors[0].message, TITLE_REQUIRED);

        // 已有同字段错误时不重复
        require_sanitized(&mut errors, "title", "", TITLE_REQUIRED);
        assert_eq!(errors.len(), 1);

        let mut errors = Vec::new();
        require_sanitized(&mut errors, "platform", "github", PLATFORM_REQUIRED);
        assert!(errors.is_empty());
    }
}
