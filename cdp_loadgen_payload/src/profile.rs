//! Profile event payload.
//!
//! A profile event couples a user action with the identity, demographic,
//! device and campaign data an ingestion endpoint uses to build a customer
//! profile. Field names match the endpoint's JSON contract.

use std::{fmt, io::Write};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{
    Error, IdentityPool,
    locale::{self, pick},
};

const GENDERS: [&str; 3] = ["male", "female", "other"];
const RELIGIONS: [&str; 5] = ["Buddhism", "Catholic", "None", "Protestant", "Other"];
const OS_LIST: [&str; 6] = ["Windows 10", "Windows 11", "macOS", "Ubuntu", "iOS", "Android"];
const DEVICES: [&str; 6] = [
    "Desktop",
    "MacBook Pro",
    "iPhone 15",
    "Samsung Galaxy S24",
    "iPad",
    "Laptop",
];
const BROWSERS: [&str; 5] = ["Chrome", "Safari", "Firefox", "Edge", "Opera"];
const UTM_SOURCES: [&str; 6] = ["google", "facebook", "instagram", "direct", "email", "tiktok"];
const UTM_CAMPAIGNS: [&str; 5] = ["summer_sale", "winter_promo", "none", "black_friday", "new_year"];
const UTM_MEDIUMS: [&str; 5] = ["cpc", "organic", "email", "social", "referral"];
const REG_SOURCES: [&str; 5] = ["web_desktop", "web_mobile", "ios_app", "android_app", "api"];
const USER_CHANNELS: [&str; 3] = ["desktop", "mobile", "tablet"];

const MIN_AGE_DAYS: i64 = 18 * 365;
const MAX_AGE_DAYS: i64 = 80 * 365;

time::serde::format_description!(
    seen_at,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].000Z"
);
time::serde::format_description!(birth_date, Date, "[year]-[month]-[day]");

/// The user action an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The user signed in
    Login,
    /// The user created an account
    Register,
    /// The user edited their profile
    UpdateProfile,
    /// The user bought something
    Purchase,
    /// The user looked at a product page
    ViewProduct,
}

impl EventType {
    /// The wire name of this event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Login => "login",
            EventType::Register => "register",
            EventType::UpdateProfile => "update_profile",
            EventType::Purchase => "purchase",
            EventType::ViewProduct => "view_product",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<EventType> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> EventType
    where
        R: Rng + ?Sized,
    {
        match rng.random_range(0..5) {
            0 => EventType::Login,
            1 => EventType::Register,
            2 => EventType::UpdateProfile,
            3 => EventType::Purchase,
            4 => EventType::ViewProduct,
            _ => unreachable!(),
        }
    }
}

/// Personal fields of the user behind an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    /// Last name then first name
    pub full_name: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Primary identity key, shared by events of the same person
    pub idcard: String,
    /// Secondary identity key, paired with `idcard`
    pub old_idcard: String,
    /// Mobile number
    pub phone: String,
    /// Email address
    pub email: String,
    /// One of `male`, `female`, `other`
    pub gender: String,
    /// Date of birth
    #[serde(with = "birth_date")]
    pub dob: Date,
    /// Postal address
    pub address: String,
    /// Declared religion
    pub religion: String,
}

/// Device the event originated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platforms {
    /// Operating system
    pub os: String,
    /// Device model
    pub device: String,
    /// Browser name
    pub browser: String,
    /// Client application version, `major.minor.patch`
    pub app_version: String,
}

impl Distribution<Platforms> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> Platforms
    where
        R: Rng + ?Sized,
    {
        let major: u8 = rng.random_range(1..=3);
        let minor: u8 = rng.random_range(0..=9);
        let patch: u8 = rng.random_range(0..=9);
        Platforms {
            os: (*pick(rng, &OS_LIST)).to_string(),
            device: (*pick(rng, &DEVICES)).to_string(),
            browser: (*pick(rng, &BROWSERS)).to_string(),
            app_version: format!("{major}.{minor}.{patch}"),
        }
    }
}

/// Marketing attribution of the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Traffic source
    pub utm_source: String,
    /// Campaign name
    pub utm_campaign: String,
    /// Marketing medium
    pub utm_medium: String,
}

impl Distribution<Campaign> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> Campaign
    where
        R: Rng + ?Sized,
    {
        Campaign {
            utm_source: (*pick(rng, &UTM_SOURCES)).to_string(),
            utm_campaign: (*pick(rng, &UTM_CAMPAIGNS)).to_string(),
            utm_medium: (*pick(rng, &UTM_MEDIUMS)).to_string(),
        }
    }
}

/// Activity bookkeeping attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// When the user was first observed, never after `last_seen_at`
    #[serde(with = "seen_at")]
    pub first_seen_at: PrimitiveDateTime,
    /// When the user was last observed
    #[serde(with = "seen_at")]
    pub last_seen_at: PrimitiveDateTime,
    /// Channel the user registered through
    pub registration_source: String,
    /// Browser user agent
    pub user_agent: String,
    /// Number of logins so far, 1 through 100
    pub login_count: u8,
}

/// A single synthetic profile event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEvent {
    /// What the user did
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Per-event user identifier
    pub user_id: String,
    /// Personal fields, including the identity keys
    pub traits: Traits,
    /// Device information
    pub platforms: Platforms,
    /// Campaign attribution
    pub campaign: Campaign,
    /// Activity bookkeeping
    pub metadata: Metadata,
}

impl ProfileEvent {
    /// The identity key of this event.
    #[must_use]
    pub fn idcard(&self) -> &str {
        &self.traits.idcard
    }

    /// Write this event as a JSON document into `writer`.
    ///
    /// # Errors
    ///
    /// Fails if the writer fails or the event cannot be encoded.
    pub fn to_bytes<W>(&self, writer: &mut W) -> Result<(), Error>
    where
        W: Write,
    {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

/// Generator of [`ProfileEvent`] instances over a fixed identity pool.
#[derive(Debug, Clone)]
pub struct Profile {
    identities: IdentityPool,
}

impl Profile {
    /// Create a new instance of `Profile`
    #[must_use]
    pub fn new(identities: IdentityPool) -> Self {
        Self { identities }
    }

    /// The pool identities are drawn from.
    #[must_use]
    pub fn identities(&self) -> &IdentityPool {
        &self.identities
    }

    /// Generate the event at 1-based position `index`, timestamped relative to
    /// the current wall clock.
    pub fn generate<R>(&self, index: usize, rng: &mut R) -> ProfileEvent
    where
        R: Rng + ?Sized,
    {
        let now = OffsetDateTime::now_utc();
        self.generate_at(index, PrimitiveDateTime::new(now.date(), now.time()), rng)
    }

    /// Generate the event at 1-based position `index`, timestamped relative to
    /// `now`.
    pub fn generate_at<R>(&self, index: usize, now: PrimitiveDateTime, rng: &mut R) -> ProfileEvent
    where
        R: Rng + ?Sized,
    {
        // Serialized timestamps carry whole seconds only.
        let now = now.replace_nanosecond(0).unwrap_or(now);
        let identity = self.identities.choose(rng);

        let last_seen_at = now
            - Duration::days(rng.random_range(0..=30))
            - Duration::hours(rng.random_range(0..=23))
            - Duration::minutes(rng.random_range(0..=59));
        let first_seen_at = last_seen_at - Duration::days(rng.random_range(0..=365));

        let (first_name, first_ascii) = *pick(rng, &locale::FIRST_NAMES);
        let (last_name, last_ascii) = *pick(rng, &locale::LAST_NAMES);

        let traits = Traits {
            full_name: format!("{last_name} {first_name}"),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            idcard: identity.idcard.clone(),
            old_idcard: identity.old_idcard.clone(),
            phone: locale::phone(rng),
            email: locale::email(rng, first_ascii, last_ascii),
            gender: (*pick(rng, &GENDERS)).to_string(),
            dob: now.date() - Duration::days(rng.random_range(MIN_AGE_DAYS..=MAX_AGE_DAYS)),
            address: locale::address(rng),
            religion: (*pick(rng, &RELIGIONS)).to_string(),
        };

        ProfileEvent {
            kind: rng.random(),
            user_id: format!("user_{}_{index:05}", pick(rng, &USER_CHANNELS)),
            traits,
            platforms: rng.random(),
            campaign: rng.random(),
            metadata: Metadata {
                first_seen_at,
                last_seen_at,
                registration_source: (*pick(rng, &REG_SOURCES)).to_string(),
                user_agent: (*pick(rng, &locale::USER_AGENTS)).to_string(),
                login_count: rng.random_range(1..=100),
            },
        }
    }
}
