//! Log entry workflows.
//!
//! Every operation fetches first, answers 404 for a missing entry, then
//! applies the ownership-or-manager rule before touching storage.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, instrument};

use crate::auth::authorization::{can_access, is_manager, resolve_log_owner};
use crate::auth::models::Identity;
use crate::auth::user_service::USER_NOT_FOUND;
use crate::domain::{ArchiveFilter, LogChanges, LogId, LogResponse, NewLogEntry, Response, UserId};
use crate::errors::Result;
use crate::services::validation::{CreateLogRequest, UpdateLogRequest};
use crate::storage::repositories::{
    LogRepository, SqlxLogRepository, SqlxUserRepository, UserRepository,
};
use crate::storage::DbPool;

pub const LOG_NOT_FOUND: &str = "log not found";

/// Service for reading and mutating log entries.
#[derive(Clone)]
pub struct LogService {
    log_repository: Arc<dyn LogRepository>,
    user_repository: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl LogService {
    pub fn new(
        log_repository: Arc<dyn LogRepository>,
        user_repository: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { log_repository, user_repository, clock }
    }

    pub fn with_sqlx(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(SqlxLogRepository::new(pool.clone())),
            Arc::new(SqlxUserRepository::new(pool)),
            clock,
        )
    }

    /// Unarchived entries visible to the caller: everything for a manager,
    /// the caller's own entries otherwise.
    #[instrument(skip(self, identity), fields(caller = %identity.subject_id))]
    pub async fn list_all(&self, identity: &Identity) -> Response<Vec<LogResponse>> {
        self.try_list_all(identity).await.unwrap_or_else(Response::from)
    }

    async fn try_list_all(&self, identity: &Identity) -> Result<Response<Vec<LogResponse>>> {
        let logs = if is_manager(identity) {
            self.log_repository.list_unarchived().await?
        } else {
            self.log_repository
                .list_by_owner(identity.subject_id, ArchiveFilter::Unarchived)
                .await?
        };
        Ok(Response::ok(
            logs.into_iter()
                .filter(|log| can_access(identity, log.owner_id))
                .map(LogResponse::from)
                .collect(),
        ))
    }

    /// Entries of one owner, narrowed by archive state.
    #[instrument(skip(self, identity, owner_id), fields(caller = %identity.subject_id, owner_id = %owner_id))]
    pub async fn list_by_owner(
        &self,
        identity: &Identity,
        owner_id: UserId,
        filter: ArchiveFilter,
    ) -> Response<Vec<LogResponse>> {
        self.try_list_by_owner(identity, owner_id, filter).await.unwrap_or_else(Response::from)
    }

    async fn try_list_by_owner(
        &self,
        identity: &Identity,
        owner_id: UserId,
        filter: ArchiveFilter,
    ) -> Result<Response<Vec<LogResponse>>> {
        if !can_access(identity, owner_id) {
            return Ok(Response::forbidden("cannot read another user's logs"));
        }

        let logs = self.log_repository.list_by_owner(owner_id, filter).await?;
        Ok(Response::ok(logs.into_iter().map(LogResponse::from).collect()))
    }

    #[instrument(skip(self, identity, id), fields(caller = %identity.subject_id, log_id = %id))]
    pub async fn get(&self, identity: &Identity, id: LogId) -> Response<LogResponse> {
        self.try_get(identity, id).await.unwrap_or_else(Response::from)
    }

    async fn try_get(&self, identity: &Identity, id: LogId) -> Result<Response<LogResponse>> {
        let Some(log) = self.log_repository.get_log(id).await? else {
            return Ok(Response::not_found(LOG_NOT_FOUND));
        };

        if !can_access(identity, log.owner_id) {
            return Ok(Response::forbidden("cannot read another user's logs"));
        }

        Ok(Response::ok(log.into()))
    }

    /// Create an entry owned by the caller, or by the requested owner when the
    /// caller is a manager.
    #[instrument(skip(self, identity, request), fields(caller = %identity.subject_id))]
    pub async fn create(
        &self,
        identity: &Identity,
        request: CreateLogRequest,
    ) -> Response<LogResponse> {
        self.try_create(identity, request).await.unwrap_or_else(Response::from)
    }

    async fn try_create(
        &self,
        identity: &Identity,
        request: CreateLogRequest,
    ) -> Result<Response<LogResponse>> {
        let owner_id = resolve_log_owner(identity, request.user_id);
        if owner_id != identity.subject_id
            && self.user_repository.get_user(owner_id).await?.is_none()
        {
            return Ok(Response::not_found(USER_NOT_FOUND));
        }

        let log = self
            .log_repository
            .create_log(NewLogEntry {
                owner_id,
                fields: request.changes(),
                created_at: self.clock.utc(),
            })
            .await?;

        info!(log_id = %log.id, owner_id = %log.owner_id, "log created");
        Ok(Response::ok(log.into()))
    }

    #[instrument(skip(self, identity, id, request), fields(caller = %identity.subject_id, log_id = %id))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: LogId,
        request: UpdateLogRequest,
    ) -> Response<LogResponse> {
        self.try_update(identity, id, request).await.unwrap_or_else(Response::from)
    }

    async fn try_update(
        &self,
        identity: &Identity,
        id: LogId,
        request: UpdateLogRequest,
    ) -> Result<Response<LogResponse>> {
        let Some(mut log) = self.log_repository.get_log(id).await? else {
            return Ok(Response::not_found(LOG_NOT_FOUND));
        };

        if !can_access(identity, log.owner_id) {
            return Ok(Response::forbidden("cannot update another user's log"));
        }

        let changes = LogChanges::from(request);
        if !self.log_repository.update_log(log.id, &changes).await? {
            return Ok(Response::unknown_error());
        }

        log.apply(changes);
        Ok(Response::ok(log.into()))
    }

    #[instrument(skip(self, identity, id), fields(caller = %identity.subject_id, log_id = %id))]
    pub async fn delete(&self, identity: &Identity, id: LogId) -> Response<()> {
        self.try_delete(identity, id).await.unwrap_or_else(Response::from)
    }

    async fn try_delete(&self, identity: &Identity, id: LogId) -> Result<Response<()>> {
        let Some(log) = self.log_repository.get_log(id).await? else {
            return Ok(Response::not_found(LOG_NOT_FOUND));
        };

        if !can_access(identity, log.owner_id) {
            return Ok(Response::forbidden("cannot delete another user's log"));
        }

        if !self.log_repository.delete_log(log.id).await? {
            return Ok(Response::unknown_error());
        }

        info!(log_id = %log.id, "log deleted");
        Ok(Response::ok_message("log deleted"))
    }

    /// Flip the archived flag. Two calls restore the original state.
    #[instrument(skip(self, identity, id), fields(caller = %identity.subject_id, log_id = %id))]
    pub async fn toggle_archive(&self, identity: &Identity, id: LogId) -> Response<LogResponse> {
        self.try_toggle_archive(identity, id).await.unwrap_or_else(Response::from)
    }

    async fn try_toggle_archive(
        &self,
        identity: &Identity,
        id: LogId,
    ) -> Result<Response<LogResponse>> {
        let Some(mut log) = self.log_repository.get_log(id).await? else {
            return Ok(Response::not_found(LOG_NOT_FOUND));
        };

        if !can_access(identity, log.owner_id) {
            return Ok(Response::forbidden("cannot archive or unarchive another user's log"));
        }

        log.toggle_archived();
        if !self.log_repository.set_archived(log.id, log.archived).await? {
            return Ok(Response::unknown_error());
        }

        Ok(Response::ok(log.into()))
    }
}
