//! Store settings: bank details, contact numbers, and message templates the
//! admin edits at runtime.

use crate::entities::setting;
use crate::errors::ServiceError;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// The recognized settings keys. Updates to anything else are rejected.
pub const SETTING_KEYS: &[&str] = &[
    "bank_account_name",
    "bank_account_number",
    "bank_name",
    "tng_phone_number",
    "whatsapp_message",
    "admin_whatsapp_number",
    "shipping_message",
    "payment_instructions",
];

/// Typed view over the settings table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    pub bank_account_name: String,
    pub bank_account_number: String,
    pub bank_name: String,
    pub tng_phone_number: String,
    pub whatsapp_message: String,
    pub admin_whatsapp_number: String,
    pub shipping_message: String,
    pub payment_instructions: String,
}

impl StoreSettings {
    fn from_rows(rows: Vec<setting::Model>) -> Self {
        let mut map: HashMap<String, String> =
            rows.into_iter().map(|r| (r.key, r.value)).collect();
        let mut take = |key: &str| map.remove(key).unwrap_or_default();
        Self {
            bank_account_name: take("bank_account_name"),
            bank_account_number: take("bank_account_number"),
            bank_name: take("bank_name"),
            tng_phone_number: take("tng_phone_number"),
            whatsapp_message: take("whatsapp_message"),
            admin_whatsapp_number: take("admin_whatsapp_number"),
            shipping_message: take("shipping_message"),
            payment_instructions: take("payment_instructions"),
        }
    }
}

/// Expands `{placeholder}` markers in a message template. Unknown markers are
/// left in place so template typos stay visible to the admin.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DatabaseConnection>,
}

impl SettingsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<StoreSettings, ServiceError> {
        let rows = setting::Entity::find().all(&*self.db).await?;
        Ok(StoreSettings::from_rows(rows))
    }

    pub async fn list(&self) -> Result<Vec<setting::Model>, ServiceError> {
        Ok(setting::Entity::find().all(&*self.db).await?)
    }

    /// Updates recognized keys in place; unknown keys fail the whole batch.
    #[instrument(skip(self, updates))]
    pub async fn update(&self, updates: HashMap<String, String>) -> Result<(), ServiceError> {
        for key in updates.keys() {
            if !SETTING_KEYS.contains(&key.as_str()) {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown setting key: {}",
                    key
                )));
            }
        }

        for (key, value) in updates {
            let row = setting::Entity::find()
                .filter(setting::Column::Key.eq(&key))
                .one(&*self.db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Setting {} not found", key)))?;

            let mut active: setting::ActiveModel = row.into();
            active.value = Set(value);
            active.updated_at = Set(Utc::now());
            active.update(&*self.db).await?;
            info!(key, "Setting updated");
        }
        Ok(())
    }
}
