//! User orchestrators.

use tracing::debug;

use commandpost_core::{EntityKind, NewUser, Role, User, UserId, UserPatch};
use commandpost_storage::{IdFilter, Visibility};

use crate::error::ServiceError;
use crate::validate::require_nonempty;
use crate::{CommandService, acl};

impl CommandService {
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store().users().find_all(Visibility::Live).await?)
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.store().users().find_by_id(id, Visibility::Live).await?)
    }

    pub async fn add_user(&self, caller: Option<Role>, new: NewUser) -> Result<User, ServiceError> {
        self.gate().check(caller, acl::USER_MANAGE)?;
        require_nonempty("email", &new.email)?;
        require_nonempty("password", &new.password)?;

        let scope = self.store().begin().await?;
        let user = self.store().users().insert(new).await?;
        scope.commit().await?;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        caller: Option<Role>,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, ServiceError> {
        self.gate().check(caller, acl::USER_MANAGE)?;
        if let Some(email) = patch.email.as_set() {
            require_nonempty("email", email)?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().users().update(id, patch).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::User, id));
        }
        scope.commit().await?;

        self.require_user(id).await
    }

    /// Tombstones the user row. Events and collection points created by
    /// the user keep their reference; creator lookups resolve tombstoned
    /// rows.
    pub async fn delete_user(&self, caller: Option<Role>, id: UserId) -> Result<u64, ServiceError> {
        self.gate().check(caller, acl::USER_MANAGE)?;

        let scope = self.store().begin().await?;
        let affected = self
            .store()
            .users()
            .soft_delete(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        debug!(user_id = %id, affected, "user deleted");
        Ok(affected)
    }

    /// Un-tombstones the user row.
    pub async fn restore_user(
        &self,
        caller: Option<Role>,
        id: UserId,
    ) -> Result<User, ServiceError> {
        self.gate().check(caller, acl::USER_MANAGE)?;

        let scope = self.store().begin().await?;
        self.store().users().restore(&IdFilter::by_id(id)).await?;
        scope.commit().await?;

        self.require_user(id).await
    }

    /// Resolves a creator reference, also seeing tombstoned users so
    /// historical rows never dangle.
    pub async fn creator_of(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self
            .store()
            .users()
            .find_by_id(id, Visibility::IncludeDeleted)
            .await?)
    }

    async fn require_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.store()
            .users()
            .find_by_id(id, Visibility::Live)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
    }
}
