//! Form drafts as the presentation layer collects them, and the checks that
//! turn them into request bodies.

use shared::{
    domain::{LinkIcon, Niche},
    protocol::{LinkChanges, NewLeadMagnet, NewLink, ProfilePayload},
};
use url::Url;

use crate::error::ValidationError;

const ALLOWED_URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];
const NAME_MIN_CHARS: usize = 2;
const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    pub icon: String,
}

impl LinkDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    pub fn validate(&self) -> Result<NewLink, ValidationError> {
        Ok(NewLink {
            title: required_text("title", &self.title)?,
            url: absolute_url("url", &self.url)?,
            icon: icon("icon", &self.icon)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl LinkPatch {
    pub fn validate(&self) -> Result<LinkChanges, ValidationError> {
        Ok(LinkChanges {
            title: self
                .title
                .as_deref()
                .map(|title| required_text("title", title))
                .transpose()?,
            url: self
                .url
                .as_deref()
                .map(|url| absolute_url("url", url))
                .transpose()?,
            icon: self
                .icon
                .as_deref()
                .map(|key| icon("icon", key))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadMagnetDraft {
    pub title: String,
    pub description: String,
    pub download_url: String,
}

impl LeadMagnetDraft {
    pub fn validate(&self) -> Result<NewLeadMagnet, ValidationError> {
        Ok(NewLeadMagnet {
            title: required_text("title", &self.title)?,
            description: required_text("description", &self.description)?,
            download_url: absolute_url("downloadUrl", &self.download_url)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub username: String,
    pub niche: String,
    pub avatar: Option<String>,
}

impl ProfileDraft {
    pub fn validate(&self) -> Result<ProfilePayload, ValidationError> {
        let name = self.name.trim();
        if name.chars().count() < NAME_MIN_CHARS {
            return Err(ValidationError::new(
                "name",
                format!("must be at least {NAME_MIN_CHARS} characters"),
            ));
        }

        let username = self.username.trim();
        let username_len = username.chars().count();
        if username_len < USERNAME_MIN_CHARS {
            return Err(ValidationError::new(
                "username",
                format!("must be at least {USERNAME_MIN_CHARS} characters"),
            ));
        }
        if username_len > USERNAME_MAX_CHARS {
            return Err(ValidationError::new(
                "username",
                format!("must be at most {USERNAME_MAX_CHARS} characters"),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ValidationError::new(
                "username",
                "can only contain letters, numbers and underscores",
            ));
        }

        if self.niche.trim().is_empty() {
            return Err(ValidationError::new("niche", "please select a niche"));
        }
        let niche = self
            .niche
            .trim()
            .parse::<Niche>()
            .map_err(|err| ValidationError::new("niche", err.to_string()))?;

        Ok(ProfilePayload {
            name: name.to_string(),
            username: username.to_string(),
            niche,
            avatar: self.avatar.clone().filter(|avatar| !avatar.is_empty()),
        })
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn absolute_url(field: &'static str, value: &str) -> Result<Url, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| ValidationError::new(field, format!("not an absolute URL ({err})")))?;
    if !ALLOWED_URL_SCHEMES.contains(&url.scheme()) {
        return Err(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if matches!(url.scheme(), "http" | "https") && url.host_str().is_none() {
        return Err(ValidationError::new(field, "missing host"));
    }
    Ok(url)
}

fn icon(field: &'static str, key: &str) -> Result<LinkIcon, ValidationError> {
    key.trim()
        .parse::<LinkIcon>()
        .map_err(|err| ValidationError::new(field, err.to_string()))
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
