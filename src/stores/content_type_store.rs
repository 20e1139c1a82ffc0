use std::collections::HashMap;
use std::sync::RwLock;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set,
};

use crate::errors::internal::{RecorderError, RegistryError};
use crate::types::db::content_type::{self, Entity as ContentType};
use crate::types::internal::key::{KeyVariant, PrimaryKeyKind};

/// Registered content type: registry row id plus its storage variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredType {
    pub id: i32,
    pub variant: KeyVariant,
}

/// Registry of tracked entity types and their storage variants
///
/// Resolution from the declared key kind happens once, at registration; the
/// chosen variant is persisted so it stays consistent for the lifetime of a
/// type across processes and restarts. Lookups are cached in memory.
pub struct ContentTypeStore {
    db: DatabaseConnection,
    cache: RwLock<HashMap<String, RegisteredType>>,
}

impl ContentTypeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Register an entity type under the variant resolved from its key kind
    ///
    /// Idempotent when the kind matches the earlier registration;
    /// re-registration under a different kind fails with VariantConflict.
    /// Unsupported kinds fail here, never at record time.
    pub async fn register(
        &self,
        entity_type: &str,
        kind: PrimaryKeyKind,
    ) -> Result<RegisteredType, RecorderError> {
        let variant = KeyVariant::resolve(entity_type, kind)?;

        if let Some(known) = self.cached(entity_type) {
            return Self::check_variant(entity_type, known, variant);
        }

        if let Some(row) = self.find_row(entity_type).await? {
            let known = Self::decode_row(&row)?;
            self.remember(entity_type, known);
            return Self::check_variant(entity_type, known, variant);
        }

        let new_row = content_type::ActiveModel {
            id: NotSet,
            name: Set(entity_type.to_string()),
            key_variant: Set(variant.code()),
        };

        match new_row.insert(&self.db).await {
            Ok(row) => {
                let registered = RegisteredType { id: row.id, variant };
                self.remember(entity_type, registered);
                Ok(registered)
            }
            // Concurrent registration of the same name; reload and compare
            Err(e) if e.to_string().contains("UNIQUE") => {
                let row = self
                    .find_row(entity_type)
                    .await?
                    .ok_or_else(|| RecorderError::database("register_content_type", e))?;
                let known = Self::decode_row(&row)?;
                self.remember(entity_type, known);
                Self::check_variant(entity_type, known, variant)
            }
            Err(e) => Err(RecorderError::database("register_content_type", e)),
        }
    }

    /// Look up a registered type by name
    ///
    /// Fails with UnknownEntityType when the tag was never registered.
    pub async fn lookup(&self, entity_type: &str) -> Result<RegisteredType, RecorderError> {
        if let Some(known) = self.cached(entity_type) {
            return Ok(known);
        }

        let row = self
            .find_row(entity_type)
            .await?
            .ok_or_else(|| RegistryError::UnknownEntityType(entity_type.to_string()))?;

        let known = Self::decode_row(&row)?;
        self.remember(entity_type, known);
        Ok(known)
    }

    /// Drop a cache entry; used by the purge cascade
    pub(crate) fn evict(&self, entity_type: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(entity_type);
        }
    }

    fn cached(&self, entity_type: &str) -> Option<RegisteredType> {
        // A poisoned lock falls through to the database
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(entity_type).copied())
    }

    fn remember(&self, entity_type: &str, registered: RegisteredType) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(entity_type.to_string(), registered);
        }
    }

    async fn find_row(
        &self,
        entity_type: &str,
    ) -> Result<Option<content_type::Model>, RecorderError> {
        ContentType::find()
            .filter(content_type::Column::Name.eq(entity_type))
            .one(&self.db)
            .await
            .map_err(|e| RecorderError::database("find_content_type", e))
    }

    fn decode_row(row: &content_type::Model) -> Result<RegisteredType, RecorderError> {
        let variant = KeyVariant::from_code(row.key_variant).ok_or_else(|| {
            RecorderError::database(
                "load_content_type",
                DbErr::Custom(format!(
                    "content type {} has unknown key_variant code {}",
                    row.name, row.key_variant
                )),
            )
        })?;
        Ok(RegisteredType {
            id: row.id,
            variant,
        })
    }

    fn check_variant(
        entity_type: &str,
        known: RegisteredType,
        requested: KeyVariant,
    ) -> Result<RegisteredType, RecorderError> {
        if known.variant == requested {
            Ok(known)
        } else {
            Err(RegistryError::VariantConflict {
                entity_type: entity_type.to_string(),
                registered: known.variant,
                requested,
            }
            .into())
        }
    }
}

impl std::fmt::Debug for ContentTypeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeStore")
            .field("db", &"<connection>")
            .finish()
    }
}
