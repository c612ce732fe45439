use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A paid marketing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Tv,
    Digital,
    Social,
    Email,
    Sem,
}

impl Channel {
    /// All channels in canonical column order.
    pub const ALL: [Channel; 5] = [
        Channel::Tv,
        Channel::Digital,
        Channel::Social,
        Channel::Email,
        Channel::Sem,
    ];

    /// Column name in the weekly dataset file.
    pub fn column(&self) -> &'static str {
        match self {
            Channel::Tv => "tv_spend",
            Channel::Digital => "digital_spend",
            Channel::Social => "social_spend",
            Channel::Email => "email_spend",
            Channel::Sem => "sem_spend",
        }
    }

    /// Regressor label of the log-transformed spend.
    pub fn log_label(&self) -> &'static str {
        match self {
            Channel::Tv => "log(tv)",
            Channel::Digital => "log(digital)",
            Channel::Social => "log(social)",
            Channel::Email => "log(email)",
            Channel::Sem => "log(sem)",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Channel::Tv => "TV",
            Channel::Digital => "Digital",
            Channel::Social => "Social Media",
            Channel::Email => "Email",
            Channel::Sem => "SEM",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Channel::Tv => 0,
            Channel::Digital => 1,
            Channel::Social => 2,
            Channel::Email => 3,
            Channel::Sem => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-channel values indexed by [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelMap<T> {
    pub tv: T,
    pub digital: T,
    pub social: T,
    pub email: T,
    pub sem: T,
}

impl<T> ChannelMap<T> {
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            tv: f(Channel::Tv),
            digital: f(Channel::Digital),
            social: f(Channel::Social),
            email: f(Channel::Email),
            sem: f(Channel::Sem),
        }
    }

    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::Tv => &self.tv,
            Channel::Digital => &self.digital,
            Channel::Social => &self.social,
            Channel::Email => &self.email,
            Channel::Sem => &self.sem,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// One row of the weekly marketing dataset. Field order is the file's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    pub week: u32,
    pub date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub sales: f64,
    pub tv_spend: f64,
    pub digital_spend: f64,
    pub social_spend: f64,
    pub email_spend: f64,
    pub sem_spend: f64,
    #[serde(with = "flag")]
    pub promotion: bool,
    #[serde(with = "flag")]
    pub holiday: bool,
    pub competitor_index: f64,
    pub economic_index: f64,
}

impl WeeklyRecord {
    pub fn spend(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Tv => self.tv_spend,
            Channel::Digital => self.digital_spend,
            Channel::Social => self.social_spend,
            Channel::Email => self.email_spend,
            Channel::Sem => self.sem_spend,
        }
    }

    /// Copy with sales/spend rounded to cents and indices to one decimal,
    /// the precision the dataset file carries.
    pub fn rounded(&self) -> Self {
        Self {
            sales: round_to(self.sales, 2),
            tv_spend: round_to(self.tv_spend, 2),
            digital_spend: round_to(self.digital_spend, 2),
            social_spend: round_to(self.social_spend, 2),
            email_spend: round_to(self.email_spend, 2),
            sem_spend: round_to(self.sem_spend, 2),
            competitor_index: round_to(self.competitor_index, 1),
            economic_index: round_to(self.economic_index, 1),
            ..self.clone()
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Serializes booleans as `0`/`1` columns.
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("expected 0 or 1, got {}", other))),
        }
    }
}
