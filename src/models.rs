use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enumerations ---

/// Role
///
/// The RBAC hierarchy, ordered so that a single comparison (`caller >= minimum`)
/// expresses the whole authorization policy: `Admin < Superadmin`.
/// Admins manage content (menu, categories, hours, social links); superadmins
/// additionally manage user accounts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    sqlx::Type,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    Admin,
    Superadmin,
}

impl FromStr for Role {
    type Err = ();

    /// Accepts exactly the two wire values. Anything else is a validation error
    /// at the handler layer, not a deserialization failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Superadmin => write!(f, "superadmin"),
        }
    }
}

/// Platform
///
/// The closed set of social media platforms the restaurant may publish.
/// Stored as a Postgres enum behind a primary key, so at most one link
/// exists per platform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "social_platform", rename_all = "lowercase")]
#[ts(export)]
pub enum Platform {
    Facebook,
    Instagram,
    Linkedin,
    Tiktok,
    Twitter,
    Whatsapp,
    Youtube,
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            "tiktok" => Ok(Platform::Tiktok),
            "twitter" => Ok(Platform::Twitter),
            "whatsapp" => Ok(Platform::Whatsapp),
            "youtube" => Ok(Platform::Youtube),
            _ => Err(()),
        }
    }
}

/// Lang
///
/// The display language requested by the public menu surface. Every bilingual
/// pair collapses to the column this selects. Arabic is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Lang {
    #[default]
    Ar,
    Fr,
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The public projection of a user account. The password hash never leaves
/// the repository boundary through this type.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// UserRecord
///
/// The full `users` row, including the argon2 password hash. Internal to the
/// repository and the auth handlers; never serialized to a client.
#[derive(Debug, Clone, FromRow, Default)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            role: record.role,
        }
    }
}

/// MenuItem
///
/// A menu entry with every display field duplicated per language. Categories
/// are referenced by name, not by id: renaming a category does not cascade
/// here, so stale references are possible and accepted at this scale.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct MenuItem {
    pub id: Uuid,
    pub name_ar: String,
    pub name_fr: String,
    pub description_ar: String,
    pub description_fr: String,
    pub price: f64,
    /// URI returned by the external media host.
    pub image: String,
    pub category_ar: String,
    pub category_fr: String,
    /// Visibility flag: whether the item appears on the public menu.
    pub show_on_main_page: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Collapses the bilingual pairs to a single display language for the
    /// public surface.
    pub fn localized(self, lang: Lang) -> PublicMenuItem {
        let (name, description, category) = match lang {
            Lang::Ar => (self.name_ar, self.description_ar, self.category_ar),
            Lang::Fr => (self.name_fr, self.description_fr, self.category_fr),
        };
        PublicMenuItem {
            id: self.id,
            name,
            description,
            price: self.price,
            image: self.image,
            category,
        }
    }
}

/// PublicMenuItem
///
/// The language-collapsed view served by GET /menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublicMenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

/// Category
///
/// A bilingual category name pair, unique per language.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name_ar: String,
    pub name_fr: String,
}

/// WorkingHours
///
/// The singleton opening-hours record, both values as 24-hour `HH:MM` strings.
/// The SQL columns are `open_time`/`close_time` because `open`/`close` collide
/// with SQL keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct WorkingHours {
    #[sqlx(rename = "open_time")]
    pub open: String,
    #[sqlx(rename = "close_time")]
    pub close: String,
}

impl Default for WorkingHours {
    /// The fallback returned by GET /working-times before any upsert happened.
    fn default() -> Self {
        WorkingHours {
            open: "09:00".to_string(),
            close: "23:00".to_string(),
        }
    }
}

/// SocialLink
///
/// One row per platform. Inactive rows stay in the store (and in the admin
/// listing) but are excluded from the public listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct SocialLink {
    pub platform: Platform,
    pub url: String,
    pub active: bool,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// RegisterRequest
///
/// Input payload for POST /auth/register and POST /users. The role arrives as
/// a plain string and is validated against the `Role` set inside the handler,
/// so an unknown value surfaces as a 400 with a message rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// RegisterSuperadminRequest
///
/// Input payload for the superadmin bootstrap path: no role field, the role
/// is forced to superadmin by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterSuperadminRequest {
    pub email: String,
    pub password: String,
}

/// AuthResponse
///
/// Output of the login/register endpoints: the created/authenticated identity
/// plus a signed bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// UpdateUserRequest
///
/// Partial update for PUT /users/{id}. A provided password is re-hashed; a
/// provided role string is re-validated.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// UserChanges
///
/// The repository-level form of a user update: password already hashed, role
/// already parsed. `None` fields are left untouched (COALESCE semantics).
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// NewMenuItem
///
/// A fully validated menu item ready for insertion: fields trimmed, price
/// parsed, image already uploaded to the media host.
#[derive(Debug, Clone, Default)]
pub struct NewMenuItem {
    pub name_ar: String,
    pub name_fr: String,
    pub description_ar: String,
    pub description_fr: String,
    pub price: f64,
    pub image: String,
    pub category_ar: String,
    pub category_fr: String,
    pub show_on_main_page: bool,
}

/// MenuItemChanges
///
/// Partial update for PUT /menu/{id}; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MenuItemChanges {
    pub name_ar: Option<String>,
    pub name_fr: Option<String>,
    pub description_ar: Option<String>,
    pub description_fr: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category_ar: Option<String>,
    pub category_fr: Option<String>,
    pub show_on_main_page: Option<bool>,
}

/// CreateCategoryRequest
///
/// Input payload for POST /categories. Both names are required together.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCategoryRequest {
    pub name_ar: String,
    pub name_fr: String,
}

/// UpdateWorkingHoursRequest
///
/// Input payload for PATCH /working-times.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateWorkingHoursRequest {
    pub open: String,
    pub close: String,
}

/// UpdateSocialLinkRequest
///
/// Input payload for PUT /social-media/{platform}. `active` defaults to true
/// when omitted. An empty URL combined with `active=false` is the documented
/// way to unset a platform.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSocialLinkRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// MessageResponse
///
/// Flat `{message}` body used by the delete endpoints, mirroring the shape of
/// error responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
