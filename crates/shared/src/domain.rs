use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(LinkId);
id_newtype!(LeadMagnetId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{key}'")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub key: String,
}

/// Icons a link may carry. The serialized form is the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LinkIcon {
    #[default]
    Link,
    Globe,
    Mail,
    Instagram,
    Twitter,
    Facebook,
    Youtube,
    Linkedin,
    Github,
    Spotify,
    Twitch,
    Tiktok,
    ShoppingBag,
    Download,
}

impl LinkIcon {
    pub const ALL: [LinkIcon; 14] = [
        LinkIcon::Link,
        LinkIcon::Globe,
        LinkIcon::Mail,
        LinkIcon::Instagram,
        LinkIcon::Twitter,
        LinkIcon::Facebook,
        LinkIcon::Youtube,
        LinkIcon::Linkedin,
        LinkIcon::Github,
        LinkIcon::Spotify,
        LinkIcon::Twitch,
        LinkIcon::Tiktok,
        LinkIcon::ShoppingBag,
        LinkIcon::Download,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LinkIcon::Link => "Link",
            LinkIcon::Globe => "Globe",
            LinkIcon::Mail => "Mail",
            LinkIcon::Instagram => "Instagram",
            LinkIcon::Twitter => "Twitter",
            LinkIcon::Facebook => "Facebook",
            LinkIcon::Youtube => "Youtube",
            LinkIcon::Linkedin => "Linkedin",
            LinkIcon::Github => "Github",
            LinkIcon::Spotify => "Spotify",
            LinkIcon::Twitch => "Twitch",
            LinkIcon::Tiktok => "Tiktok",
            LinkIcon::ShoppingBag => "ShoppingBag",
            LinkIcon::Download => "Download",
        }
    }

    /// Terminal-renderable glyph for the icon.
    pub fn glyph(self) -> &'static str {
        match self {
            LinkIcon::Link => "🔗",
            LinkIcon::Globe => "🌐",
            LinkIcon::Mail => "✉",
            LinkIcon::Instagram => "📷",
            LinkIcon::Twitter => "🐦",
            LinkIcon::Facebook => "📘",
            LinkIcon::Youtube => "▶",
            LinkIcon::Linkedin => "💼",
            LinkIcon::Github => "🐙",
            LinkIcon::Spotify => "🎵",
            LinkIcon::Twitch => "🎮",
            LinkIcon::Tiktok => "🎶",
            LinkIcon::ShoppingBag => "🛍",
            LinkIcon::Download => "⬇",
        }
    }
}

impl fmt::Display for LinkIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LinkIcon {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkIcon::ALL
            .into_iter()
            .find(|icon| icon.key() == s)
            .ok_or_else(|| UnknownKey {
                kind: "icon",
                key: s.to_string(),
            })
    }
}

/// Creator niches offered during onboarding and in profile settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Niche {
    Fitness,
    Beauty,
    Business,
    Technology,
    Lifestyle,
    Travel,
    Food,
    Fashion,
    Health,
    Finance,
}

impl Niche {
    pub const ALL: [Niche; 10] = [
        Niche::Fitness,
        Niche::Beauty,
        Niche::Business,
        Niche::Technology,
        Niche::Lifestyle,
        Niche::Travel,
        Niche::Food,
        Niche::Fashion,
        Niche::Health,
        Niche::Finance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Niche::Fitness => "Fitness",
            Niche::Beauty => "Beauty",
            Niche::Business => "Business",
            Niche::Technology => "Technology",
            Niche::Lifestyle => "Lifestyle",
            Niche::Travel => "Travel",
            Niche::Food => "Food",
            Niche::Fashion => "Fashion",
            Niche::Health => "Health",
            Niche::Finance => "Finance",
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Niche {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Niche::ALL
            .into_iter()
            .find(|niche| niche.label() == s)
            .ok_or_else(|| UnknownKey {
                kind: "niche",
                key: s.to_string(),
            })
    }
}
