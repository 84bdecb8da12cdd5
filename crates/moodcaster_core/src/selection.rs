//! Mood and category enumerations shared by client and endpoint.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// How the user feels right now.
///
/// The snake_case key is the wire format sent to the endpoint.
///
/// # Examples
///
/// ```
/// use moodcaster_core::Mood;
/// use std::str::FromStr;
///
/// let mood = Mood::from_str("low_key").unwrap();
/// assert_eq!(mood, Mood::LowKey);
/// assert_eq!(mood.key(), "low_key");
/// assert_eq!(mood.label(), "Low-key");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mood {
    Calm,
    Happy,
    Curious,
    Motivated,
    Focused,
    LowKey,
    Grateful,
}

impl Mood {
    /// Wire key, e.g. `"low_key"`.
    pub fn key(&self) -> &str {
        self.as_ref()
    }

    /// Human-readable title shown on the mood tile.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Calm => "Calm",
            Mood::Happy => "Happy",
            Mood::Curious => "Curious",
            Mood::Motivated => "Motivated",
            Mood::Focused => "Focused",
            Mood::LowKey => "Low-key",
            Mood::Grateful => "Grateful",
        }
    }

    /// Emoji shown on the mood tile.
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Calm => "🙂",
            Mood::Happy => "😄",
            Mood::Curious => "🤔",
            Mood::Motivated => "🔥",
            Mood::Focused => "🧘",
            Mood::LowKey => "🌧️",
            Mood::Grateful => "😌",
        }
    }
}

/// What the cast is about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    GoodMorning,
    GoodNight,
    BuilderDev,
    CryptoNews,
    #[serde(rename = "web3_tips")]
    #[strum(serialize = "web3_tips")]
    Web3Tips,
    Motivation,
    Productivity,
    Wellness,
    Meme,
    FunFact,
}

impl Category {
    /// Wire key, e.g. `"good_morning"`.
    pub fn key(&self) -> &str {
        self.as_ref()
    }

    /// Human-readable title shown on the category tile.
    pub fn label(&self) -> &'static str {
        match self {
            Category::GoodMorning => "Good Morning",
            Category::GoodNight => "Good Night",
            Category::BuilderDev => "Builder/Dev",
            Category::CryptoNews => "Crypto News",
            Category::Web3Tips => "Web3 Tips",
            Category::Motivation => "Motivation",
            Category::Productivity => "Productivity",
            Category::Wellness => "Wellness",
            Category::Meme => "Meme",
            Category::FunFact => "Fun Fact",
        }
    }
}
