use serde::Serialize;
use tracing::instrument;

use stockroom_core::NotificationId;
use stockroom_inventory::{ActivityEntry, Notification};

use super::{
    ACTIVITY_DEFAULT_LIMIT, ACTIVITY_MAX_LIMIT, InventoryService, NOTIFICATIONS_DEFAULT_LIMIT,
    NOTIFICATIONS_MAX_LIMIT, Resource, ServiceError, ServiceResult, page_size,
};
use crate::store::NotificationFilter;

/// One notification, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTarget {
    One(NotificationId),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
}

impl InventoryService {
    /// Newest first, with the total unread count.
    #[instrument(skip(self), err)]
    pub async fn list_notifications(
        &self,
        unread_only: bool,
        limit: Option<usize>,
    ) -> ServiceResult<NotificationPage> {
        let filter = NotificationFilter {
            unread_only,
            limit: page_size(limit, NOTIFICATIONS_DEFAULT_LIMIT, NOTIFICATIONS_MAX_LIMIT),
        };
        let notifications = self
            .store
            .list_notifications(&filter)
            .await
            .map_err(Self::store_failed("list_notifications"))?;
        let unread_count = self
            .store
            .count_unread_notifications()
            .await
            .map_err(Self::store_failed("count_unread_notifications"))?;
        Ok(NotificationPage {
            notifications,
            unread_count,
        })
    }

    /// Set the read flag. Returns how many notifications changed.
    ///
    /// `All` only marks as read; unread-all is not an operation.
    #[instrument(skip(self), err)]
    pub async fn mark_notifications(&self, target: NotificationTarget, read: bool) -> ServiceResult<u64> {
        match target {
            NotificationTarget::One(id) => {
                let found = self
                    .store
                    .set_notification_read(id, read)
                    .await
                    .map_err(Self::store_failed("set_notification_read"))?;
                if found {
                    Ok(1)
                } else {
                    Err(ServiceError::NotFound(Resource::Notification))
                }
            }
            NotificationTarget::All => self
                .store
                .mark_all_notifications_read()
                .await
                .map_err(Self::store_failed("mark_all_notifications_read")),
        }
    }

    /// Delete one notification, or every read one. Returns how many went.
    #[instrument(skip(self), err)]
    pub async fn delete_notifications(&self, target: NotificationTarget) -> ServiceResult<u64> {
        match target {
            NotificationTarget::One(id) => {
                let found = self
                    .store
                    .delete_notification(id)
                    .await
                    .map_err(Self::store_failed("delete_notification"))?;
                if found {
                    Ok(1)
                } else {
                    Err(ServiceError::NotFound(Resource::Notification))
                }
            }
            NotificationTarget::All => self
                .store
                .delete_read_notifications()
                .await
                .map_err(Self::store_failed("delete_read_notifications")),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn recent_activity(&self, limit: Option<usize>) -> ServiceResult<Vec<ActivityEntry>> {
        self.store
            .recent_activity(page_size(limit, ACTIVITY_DEFAULT_LIMIT, ACTIVITY_MAX_LIMIT))
            .await
            .map_err(Self::store_failed("recent_activity"))
    }
}
