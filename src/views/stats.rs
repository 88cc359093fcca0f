use super::context::ViewContext;
use super::list::ListView;
use crate::api::StatsQuery;
use crate::navigation::{Route, StatsFilter};
use crate::table::TableParams;

/// Request-log table
pub struct StatsList {
    ctx: ViewContext,
    filter: StatsFilter,
    list: ListView,
}

impl StatsList {
    pub const NAME: &'static str = "StatsList";

    pub fn new(ctx: ViewContext, filter: StatsFilter) -> Self {
        let table = &ctx.config.table;
        let params = TableParams::new(table.page_size, &table.sort_key);
        Self {
            filter,
            list: ListView::new("stats", params),
            ctx,
        }
    }

    /// Backend query for the current filter (whole result set in one call)
    pub fn query(&self) -> StatsQuery {
        StatsQuery {
            groups: self.filter.groups.clone(),
            environment: self.filter.environment.clone(),
            min_date: self.filter.min_date.clone(),
            max_date: self.filter.max_date.clone(),
            code: self.filter.code.clone(),
            search: String::new(),
            display_start: 0,
            display_length: self.ctx.config.table.stats_display_length,
        }
    }

    pub async fn init(&mut self) {
        self.ctx.bus.show_filter(Some(&self.filter.groups), Self::NAME);

        let query = self.query();
        self.list.load(self.ctx.backend.stats(&query)).await;
    }

    pub fn route(&self) -> Route {
        Route::Stats(self.filter.clone())
    }

    pub fn filter(&self) -> &StatsFilter {
        &self.filter
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }
}
