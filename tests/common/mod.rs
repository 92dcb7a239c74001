//! Shared test fixtures: an in-memory `Repository` implementation and
//! helpers for assembling an `AppState` with a mock media uploader, so
//! handlers can be exercised without Postgres or a network.

// Each test binary pulls in its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use menu_portal::{
    AppConfig, AppState, MockUploader,
    auth::AuthUser,
    error::ApiError,
    models::{
        Category, Lang, MenuItem, MenuItemChanges, NewMenuItem, Platform, Role, SocialLink, User,
        UserChanges, UserRecord, WorkingHours,
    },
    repository::Repository,
};

/// The mutable store behind the in-memory repository.
#[derive(Default)]
struct Store {
    users: Vec<UserRecord>,
    menu: Vec<MenuItem>,
    categories: Vec<Category>,
    working_hours: Option<WorkingHours>,
    social_links: Vec<SocialLink>,
}

/// InMemoryRepository
///
/// A stateful stand-in for `PostgresRepository`. Unlike a per-call stub it
/// keeps real state across calls, so properties like "toggling twice restores
/// the flag" and "the superadmin count is unchanged after a rejected delete"
/// can be asserted.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user directly, bypassing the handler path.
    pub fn seed_user(&self, email: &str, password_hash: &str, role: Role) -> UserRecord {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };
        self.store.lock().unwrap().users.push(record.clone());
        record
    }

    /// Inserts a menu item directly.
    pub fn seed_menu_item(&self, item: NewMenuItem) -> MenuItem {
        let now = Utc::now();
        let stored = MenuItem {
            id: Uuid::new_v4(),
            name_ar: item.name_ar,
            name_fr: item.name_fr,
            description_ar: item.description_ar,
            description_fr: item.description_fr,
            price: item.price,
            image: item.image,
            category_ar: item.category_ar,
            category_fr: item.category_fr,
            show_on_main_page: item.show_on_main_page,
            created_at: now,
            updated_at: now,
        };
        self.store.lock().unwrap().menu.push(stored.clone());
        stored
    }

    pub fn seed_category(&self, name_ar: &str, name_fr: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name_ar: name_ar.to_string(),
            name_fr: name_fr.to_string(),
        };
        self.store.lock().unwrap().categories.push(category.clone());
        category
    }

    pub fn seed_social_link(&self, platform: Platform, url: &str, active: bool) {
        self.store.lock().unwrap().social_links.push(SocialLink {
            platform,
            url: url.to_string(),
            active,
        });
    }

    /// Direct read of the current superadmin count for invariant assertions.
    pub fn superadmin_count(&self) -> usize {
        self.store
            .lock()
            .unwrap()
            .users
            .iter()
            .filter(|u| u.role == Role::Superadmin)
            .count()
    }

    pub fn menu_len(&self) -> usize {
        self.store.lock().unwrap().menu.len()
    }

    pub fn working_hours_raw(&self) -> Option<WorkingHours> {
        self.store.lock().unwrap().working_hours.clone()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, ApiError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut users: Vec<User> = self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .cloned()
            .map(User::from)
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        let mut store = self.store.lock().unwrap();
        if store.users.iter().any(|u| u.email == email) {
            return Err(ApiError::Conflict("Resource already exists".to_string()));
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };
        store.users.push(record.clone());
        Ok(record.into())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError> {
        let mut store = self.store.lock().unwrap();
        let Some(user) = store.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        Ok(Some(user.clone().into()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut store = self.store.lock().unwrap();
        let before = store.users.len();
        store.users.retain(|u| u.id != id);
        Ok(store.users.len() < before)
    }

    async fn count_superadmins(&self) -> Result<i64, ApiError> {
        Ok(self.superadmin_count() as i64)
    }

    async fn list_menu_public(
        &self,
        lang: Lang,
        category: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError> {
        let store = self.store.lock().unwrap();
        let mut items: Vec<MenuItem> = store
            .menu
            .iter()
            .filter(|item| item.show_on_main_page)
            .filter(|item| match category {
                Some(cat) => match lang {
                    Lang::Ar => item.category_ar == cat,
                    Lang::Fr => item.category_fr == cat,
                },
                None => true,
            })
            .cloned()
            .collect();
        match lang {
            Lang::Ar => items.sort_by(|a, b| {
                (a.category_ar.as_str(), a.name_ar.as_str())
                    .cmp(&(b.category_ar.as_str(), b.name_ar.as_str()))
            }),
            Lang::Fr => items.sort_by(|a, b| {
                (a.category_fr.as_str(), a.name_fr.as_str())
                    .cmp(&(b.category_fr.as_str(), b.name_fr.as_str()))
            }),
        }
        Ok(items)
    }

    async fn list_menu_admin(&self, category: Option<&str>) -> Result<Vec<MenuItem>, ApiError> {
        let store = self.store.lock().unwrap();
        let mut items: Vec<MenuItem> = store
            .menu
            .iter()
            .filter(|item| match category {
                Some(cat) => item.category_ar == cat || item.category_fr == cat,
                None => true,
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (a.category_ar.as_str(), a.name_ar.as_str())
                .cmp(&(b.category_ar.as_str(), b.name_ar.as_str()))
        });
        Ok(items)
    }

    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .menu
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError> {
        Ok(self.seed_menu_item(item))
    }

    async fn update_menu_item(
        &self,
        id: Uuid,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, ApiError> {
        let mut store = self.store.lock().unwrap();
        let Some(item) = store.menu.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name_ar {
            item.name_ar = v;
        }
        if let Some(v) = changes.name_fr {
            item.name_fr = v;
        }
        if let Some(v) = changes.description_ar {
            item.description_ar = v;
        }
        if let Some(v) = changes.description_fr {
            item.description_fr = v;
        }
        if let Some(v) = changes.price {
            item.price = v;
        }
        if let Some(v) = changes.image {
            item.image = v;
        }
        if let Some(v) = changes.category_ar {
            item.category_ar = v;
        }
        if let Some(v) = changes.category_fr {
            item.category_fr = v;
        }
        if let Some(v) = changes.show_on_main_page {
            item.show_on_main_page = v;
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_menu_item(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut store = self.store.lock().unwrap();
        let before = store.menu.len();
        store.menu.retain(|item| item.id != id);
        Ok(store.menu.len() < before)
    }

    async fn toggle_menu_visibility(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError> {
        let mut store = self.store.lock().unwrap();
        let Some(item) = store.menu.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.show_on_main_page = !item.show_on_main_page;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let mut categories = self.store.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name_ar.cmp(&b.name_ar));
        Ok(categories)
    }

    async fn category_name_taken(&self, name_ar: &str, name_fr: &str) -> Result<bool, ApiError> {
        Ok(self.store.lock().unwrap().categories.iter().any(|c| {
            c.name_ar == name_ar || c.name_fr == name_ar || c.name_ar == name_fr || c.name_fr == name_fr
        }))
    }

    async fn create_category(&self, name_ar: &str, name_fr: &str) -> Result<Category, ApiError> {
        Ok(self.seed_category(name_ar, name_fr))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut store = self.store.lock().unwrap();
        let before = store.categories.len();
        store.categories.retain(|c| c.id != id);
        Ok(store.categories.len() < before)
    }

    async fn get_working_hours(&self) -> Result<Option<WorkingHours>, ApiError> {
        Ok(self.store.lock().unwrap().working_hours.clone())
    }

    async fn upsert_working_hours(
        &self,
        open: &str,
        close: &str,
    ) -> Result<WorkingHours, ApiError> {
        let hours = WorkingHours {
            open: open.to_string(),
            close: close.to_string(),
        };
        self.store.lock().unwrap().working_hours = Some(hours.clone());
        Ok(hours)
    }

    async fn list_social_links(&self, active_only: bool) -> Result<Vec<SocialLink>, ApiError> {
        let mut links: Vec<SocialLink> = self
            .store
            .lock()
            .unwrap()
            .social_links
            .iter()
            .filter(|link| !active_only || link.active)
            .cloned()
            .collect();
        links.sort_by_key(|link| link.platform);
        Ok(links)
    }

    async fn upsert_social_link(
        &self,
        platform: Platform,
        url: &str,
        active: bool,
    ) -> Result<SocialLink, ApiError> {
        let mut store = self.store.lock().unwrap();
        let link = SocialLink {
            platform,
            url: url.to_string(),
            active,
        };
        if let Some(existing) = store
            .social_links
            .iter_mut()
            .find(|l| l.platform == platform)
        {
            *existing = link.clone();
        } else {
            store.social_links.push(link.clone());
        }
        Ok(link)
    }

    async fn delete_social_link(&self, platform: Platform) -> Result<bool, ApiError> {
        let mut store = self.store.lock().unwrap();
        let before = store.social_links.len();
        store.social_links.retain(|l| l.platform != platform);
        Ok(store.social_links.len() < before)
    }
}

/// Assembles an AppState around the given repository with a succeeding
/// mock uploader and test configuration.
pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    AppState {
        repo,
        uploader: Arc::new(MockUploader::new()),
        config: AppConfig::default(),
    }
}

/// Same, but every upload attempt fails.
pub fn test_state_failing_upload(repo: Arc<InMemoryRepository>) -> AppState {
    AppState {
        repo,
        uploader: Arc::new(MockUploader::new_failing()),
        config: AppConfig::default(),
    }
}

/// An authenticated admin identity, as the extractor would produce it.
pub fn admin_auth() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

/// An authenticated superadmin identity.
pub fn superadmin_auth() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        role: Role::Superadmin,
    }
}

/// A visible menu item fixture with bilingual fields filled in.
pub fn sample_item(name: &str, visible: bool) -> NewMenuItem {
    NewMenuItem {
        name_ar: format!("{name}-ar"),
        name_fr: format!("{name}-fr"),
        description_ar: "وصف".to_string(),
        description_fr: "description".to_string(),
        price: 12.5,
        image: "https://media.test/menu/seed.png".to_string(),
        category_ar: "مقبلات".to_string(),
        category_fr: "Entrées".to_string(),
        show_on_main_page: visible,
    }
}
