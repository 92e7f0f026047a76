use chrono::{Duration, Utc};
use tracing::instrument;

use stockroom_core::UserId;
use stockroom_inventory::report::PERIOD_DAYS;
use stockroom_inventory::{
    DashboardStats, InventoryLevelPoint, MonthWindow, PeriodSummary, WINDOW_MONTHS, WastePoint,
    dashboard_stats, inventory_level_series, period_summary, waste_series,
};

use super::{InventoryService, ServiceResult};

impl InventoryService {
    /// Dashboard counters over the current catalog and the last 30 days of waste.
    #[instrument(skip(self), err)]
    pub async fn dashboard_stats(&self) -> ServiceResult<DashboardStats> {
        let now = Utc::now();
        let snapshot = self
            .store
            .snapshot(now - Duration::days(PERIOD_DAYS))
            .await
            .map_err(Self::store_failed("snapshot"))?;
        Ok(dashboard_stats(&snapshot.items, &snapshot.waste, now))
    }

    /// End-of-month stock totals for the trailing six months.
    #[instrument(skip(self), err)]
    pub async fn inventory_chart(&self) -> ServiceResult<Vec<InventoryLevelPoint>> {
        let window = MonthWindow::trailing(Utc::now(), WINDOW_MONTHS);
        let snapshot = self
            .store
            .snapshot(window.start())
            .await
            .map_err(Self::store_failed("snapshot"))?;
        Ok(inventory_level_series(
            &window,
            snapshot.current_total(),
            &snapshot.movements,
            &self.texts,
        ))
    }

    /// Monthly waste cost for the trailing six months, classified with
    /// `user`'s thresholds.
    #[instrument(skip(self), fields(%user), err)]
    pub async fn waste_chart(&self, user: UserId) -> ServiceResult<Vec<WastePoint>> {
        let thresholds = self.settings(user).await?;
        let window = MonthWindow::trailing(Utc::now(), WINDOW_MONTHS);
        let snapshot = self
            .store
            .snapshot(window.start())
            .await
            .map_err(Self::store_failed("snapshot"))?;
        Ok(waste_series(&window, &snapshot.waste, &thresholds, &self.texts))
    }

    /// Trailing 30-day report.
    #[instrument(skip(self), fields(%user), err)]
    pub async fn period_summary(&self, user: UserId) -> ServiceResult<PeriodSummary> {
        let thresholds = self.settings(user).await?;
        let now = Utc::now();
        let snapshot = self
            .store
            .snapshot(now - Duration::days(PERIOD_DAYS))
            .await
            .map_err(Self::store_failed("snapshot"))?;
        Ok(period_summary(
            &snapshot.items,
            &snapshot.movements,
            &snapshot.waste,
            thresholds,
            now,
            &self.texts,
        ))
    }
}
