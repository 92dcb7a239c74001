use crate::error::ApiError;
use crate::models::{
    Category, Lang, MenuItem, MenuItemChanges, NewMenuItem, Platform, Role, SocialLink, User,
    UserChanges, UserRecord, WorkingHours,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository
///
/// Defines the abstract contract for all persistence operations, so handlers
/// interact with the data layer without knowing the concrete implementation
/// (Postgres in production, in-memory in tests).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Auth ---
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, ApiError>;
    // Partial update via COALESCE; None fields are untouched.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError>;
    // Read side of the last-superadmin invariant. Read-then-write: the count
    // is taken immediately before the mutation, accepting the race window.
    async fn count_superadmins(&self) -> Result<i64, ApiError>;

    // --- Menu ---
    // Public listing: visible rows only, filtered and sorted in the requested
    // language's columns.
    async fn list_menu_public(
        &self,
        lang: Lang,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError>;
    // Admin listing: every row regardless of visibility, both languages.
    async fn list_menu_admin(&self, category: Option<&str>) -> Result<Vec<MenuItem>, ApiError>;
    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError>;
    async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError>;
    async fn update_menu_item(
        &self,
        id: Uuid,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, ApiError>;
    async fn delete_menu_item(&self, id: Uuid) -> Result<bool, ApiError>;
    // Inverts the visibility flag; two calls restore the original state.
    async fn toggle_menu_visibility(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError>;

    // --- Categories ---
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    // True when either name is already used, in either language column.
    async fn category_name_taken(&self, name_ar: &str, name_fr: &str) -> Result<bool, ApiError>;
    async fn create_category(&self, name_ar: &str, name_fr: &str) -> Result<Category, ApiError>;
    async fn delete_category(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Working hours (singleton) ---
    async fn get_working_hours(&self) -> Result<Option<WorkingHours>, ApiError>;
    async fn upsert_working_hours(&self, open: &str, close: &str)
    -> Result<WorkingHours, ApiError>;

    // --- Social links ---
    async fn list_social_links(&self, active_only: bool) -> Result<Vec<SocialLink>, ApiError>;
    async fn upsert_social_link(
        &self,
        platform: Platform,
        url: &str,
        active: bool,
    ) -> Result<SocialLink, ApiError>;
    async fn delete_social_link(&self, platform: Platform) -> Result<bool, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by Postgres.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MENU_COLUMNS: &str = "id, name_ar, name_fr, description_ar, description_fr, price, image, \
                            category_ar, category_fr, show_on_main_page, created_at, updated_at";

/// Maps a display language to the pair of (category, name) columns used for
/// filtering and ordering. Fixed strings, never caller input, so interpolating
/// them into SQL is safe.
fn lang_columns(lang: Lang) -> (&'static str, &'static str) {
    match lang {
        Lang::Ar => ("category_ar", "name_ar"),
        Lang::Fr => ("category_fr", "name_fr"),
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Users / Auth ---

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, ApiError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Projection without the password hash, for the admin user listing.
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users =
            sqlx::query_as::<_, User>("SELECT id, email, role FROM users ORDER BY email ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, role",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Uses COALESCE so only provided fields change.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users \
             SET email = COALESCE($2, email), \
                 password_hash = COALESCE($3, password_hash), \
                 role = COALESCE($4, role) \
             WHERE id = $1 \
             RETURNING id, email, role",
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_superadmins(&self) -> Result<i64, ApiError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'superadmin'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // --- Menu ---

    /// Implements the public listing with QueryBuilder for safe
    /// parameterization of the optional category filter.
    /// **Security**: strictly enforces `WHERE show_on_main_page = true`.
    async fn list_menu_public(
        &self,
        lang: Lang,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError> {
        let (cat_col, name_col) = lang_columns(lang);

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE show_on_main_page = true"
        ));

        if let Some(cat) = category {
            builder.push(format!(" AND {cat_col} = "));
            builder.push_bind(cat);
        }

        builder.push(format!(" ORDER BY {cat_col} ASC, {name_col} ASC"));

        let items = builder
            .build_query_as::<MenuItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Administrative listing. Does *not* include the visibility restriction.
    async fn list_menu_admin(&self, category: Option<&str>) -> Result<Vec<MenuItem>, ApiError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE true"));

        if let Some(cat) = category {
            builder.push(" AND (category_ar = ");
            builder.push_bind(cat);
            builder.push(" OR category_fr = ");
            builder.push_bind(cat);
            builder.push(")");
        }

        builder.push(" ORDER BY category_ar ASC, name_ar ASC");

        let items = builder
            .build_query_as::<MenuItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError> {
        let created = sqlx::query_as::<_, MenuItem>(&format!(
            "INSERT INTO menu_items \
             (id, name_ar, name_fr, description_ar, description_fr, price, image, \
              category_ar, category_fr, show_on_main_page, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) \
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(item.name_ar)
        .bind(item.name_fr)
        .bind(item.description_ar)
        .bind(item.description_fr)
        .bind(item.price)
        .bind(item.image)
        .bind(item.category_ar)
        .bind(item.category_fr)
        .bind(item.show_on_main_page)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Uses COALESCE so only provided fields change; the previous image
    /// reference survives unless a replacement was uploaded.
    async fn update_menu_item(
        &self,
        id: Uuid,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, ApiError> {
        let updated = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items \
             SET name_ar = COALESCE($2, name_ar), \
                 name_fr = COALESCE($3, name_fr), \
                 description_ar = COALESCE($4, description_ar), \
                 description_fr = COALESCE($5, description_fr), \
                 price = COALESCE($6, price), \
                 image = COALESCE($7, image), \
                 category_ar = COALESCE($8, category_ar), \
                 category_fr = COALESCE($9, category_fr), \
                 show_on_main_page = COALESCE($10, show_on_main_page), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name_ar)
        .bind(changes.name_fr)
        .bind(changes.description_ar)
        .bind(changes.description_fr)
        .bind(changes.price)
        .bind(changes.image)
        .bind(changes.category_ar)
        .bind(changes.category_fr)
        .bind(changes.show_on_main_page)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_menu_item(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_menu_visibility(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError> {
        let updated = sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items \
             SET show_on_main_page = NOT show_on_main_page, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {MENU_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    // --- Categories ---

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name_ar, name_fr FROM categories ORDER BY name_ar ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn category_name_taken(&self, name_ar: &str, name_fr: &str) -> Result<bool, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories \
             WHERE name_ar = $1 OR name_fr = $1 OR name_ar = $2 OR name_fr = $2",
        )
        .bind(name_ar)
        .bind(name_fr)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn create_category(&self, name_ar: &str, name_fr: &str) -> Result<Category, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name_ar, name_fr) VALUES ($1, $2, $3) \
             RETURNING id, name_ar, name_fr",
        )
        .bind(Uuid::new_v4())
        .bind(name_ar)
        .bind(name_fr)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Working hours ---

    async fn get_working_hours(&self) -> Result<Option<WorkingHours>, ApiError> {
        let hours = sqlx::query_as::<_, WorkingHours>(
            "SELECT open_time, close_time FROM working_hours WHERE singleton = true",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(hours)
    }

    /// Always targets the single row; the `singleton` column is constrained
    /// to `true`, so this can never multiply records.
    async fn upsert_working_hours(
        &self,
        open: &str,
        close: &str,
    ) -> Result<WorkingHours, ApiError> {
        let hours = sqlx::query_as::<_, WorkingHours>(
            "INSERT INTO working_hours (singleton, open_time, close_time) \
             VALUES (true, $1, $2) \
             ON CONFLICT (singleton) \
             DO UPDATE SET open_time = EXCLUDED.open_time, close_time = EXCLUDED.close_time \
             RETURNING open_time, close_time",
        )
        .bind(open)
        .bind(close)
        .fetch_one(&self.pool)
        .await?;
        Ok(hours)
    }

    // --- Social links ---

    async fn list_social_links(&self, active_only: bool) -> Result<Vec<SocialLink>, ApiError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT platform, url, active FROM social_links");

        if active_only {
            builder.push(" WHERE active = true");
        }

        builder.push(" ORDER BY platform ASC");

        let links = builder
            .build_query_as::<SocialLink>()
            .fetch_all(&self.pool)
            .await?;
        Ok(links)
    }

    /// Creates the platform's row if absent, replaces it otherwise. The
    /// platform primary key guarantees at most one row per platform.
    async fn upsert_social_link(
        &self,
        platform: Platform,
        url: &str,
        active: bool,
    ) -> Result<SocialLink, ApiError> {
        let link = sqlx::query_as::<_, SocialLink>(
            "INSERT INTO social_links (platform, url, active) VALUES ($1, $2, $3) \
             ON CONFLICT (platform) \
             DO UPDATE SET url = EXCLUDED.url, active = EXCLUDED.active \
             RETURNING platform, url, active",
        )
        .bind(platform)
        .bind(url)
        .bind(active)
        .fetch_one(&self.pool)
        .await?;
        Ok(link)
    }

    async fn delete_social_link(&self, platform: Platform) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM social_links WHERE platform = $1")
            .bind(platform)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
