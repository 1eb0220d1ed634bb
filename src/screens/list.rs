use tracing::info;

use crate::auth::{self, Controls};
use crate::error::ClientError;
use crate::list_view::{ListView, Pagination};
use crate::models::{Resource, Searchable};
use crate::screens::ScreenContext;

/// List screen for collections fetched whole and paginated locally.
#[derive(Debug)]
pub struct ResourceListScreen<R> {
    ctx: ScreenContext,
    view: ListView<R>,
}

impl<R: Resource + Searchable> ResourceListScreen<R> {
    pub fn new(ctx: ScreenContext) -> Self {
        let view = ListView::new(Pagination::Client, ctx.rows_per_page);
        Self { ctx, view }
    }

    pub fn view(&self) -> &ListView<R> {
        &self.view
    }

    pub fn controls(&self) -> Controls {
        Controls {
            checkout: false,
            ..Controls::for_role(self.ctx.role, R::GATE)
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        if let Some(gate) = R::LIST_GATE {
            auth::require(gate, self.ctx.role, &format!("view {}", R::PATH))
                .map_err(|err| self.ctx.fail(err))?;
        }
        let page = self
            .ctx
            .api
            .list::<R>()
            .await
            .map_err(|err| self.ctx.fail(err))?;
        self.view.set_items(page.items, page.total);
        Ok(())
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.view.set_search(term);
    }

    pub fn set_page(&mut self, page: usize) {
        self.view.set_page(page);
    }

    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.view.set_rows_per_page(rows);
    }

    /// Opens the confirmation step. Nothing is sent yet.
    pub fn request_delete(&mut self, id: &str) -> Result<(), ClientError> {
        auth::require(R::GATE, self.ctx.role, &format!("delete {}", R::PATH))
            .map_err(|err| self.ctx.fail(err))?;
        self.view.request_delete(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.view.cancel_delete();
    }

    /// Deletes the pending record and reloads the list. Returns `false` when nothing
    /// was awaiting confirmation.
    pub async fn confirm_delete(&mut self) -> Result<bool, ClientError> {
        let Some(id) = self.view.confirm_delete() else {
            return Ok(false);
        };
        self.ctx
            .api
            .delete::<R>(&id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        info!(resource = R::PATH, %id, "deleted");
        self.ctx.alerts.success(format!("{} deleted successfully", R::NAME));
        self.load().await?;
        Ok(true)
    }
}
