use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::alerts::AlertBus;
use crate::api::ApiClient;
use crate::debounce::Debouncer;
use crate::models::Member;
use crate::screens::ScreenContext;

const MIN_TERM_LEN: usize = 2;

/// Member picker fed by a debounced `GET /api/members?search=` lookup.
#[derive(Debug)]
pub struct MemberSearch {
    api: Arc<ApiClient>,
    alerts: AlertBus,
    debouncer: Debouncer,
    results: Arc<watch::Sender<Vec<Member>>>,
}

impl MemberSearch {
    pub fn new(ctx: &ScreenContext) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            api: ctx.api.clone(),
            alerts: ctx.alerts.clone(),
            debouncer: Debouncer::new(ctx.search_debounce),
            results: Arc::new(tx),
        }
    }

    /// Called on every keystroke. Short terms clear the results without a request.
    pub fn on_input(&self, term: &str) {
        let term = term.trim().to_string();
        if term.chars().count() < MIN_TERM_LEN {
            self.debouncer.cancel();
            self.results.send_replace(Vec::new());
            return;
        }

        let api = self.api.clone();
        let alerts = self.alerts.clone();
        let results = self.results.clone();
        self.debouncer.schedule(async move {
            debug!(%term, "member search");
            match api.list_with::<Member>(&[("search", term.clone())]).await {
                Ok(page) => {
                    results.send_replace(page.items);
                }
                Err(err) => {
                    warn!(%term, error = %err, "member search failed");
                    alerts.report(&err);
                }
            }
        });
    }

    pub fn results(&self) -> Vec<Member> {
        self.results.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Member>> {
        self.results.subscribe()
    }

    pub fn is_searching(&self) -> bool {
        self.debouncer.is_pending()
    }
}
