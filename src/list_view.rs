//! Client-side state of a resource list: filter, pagination and delete confirmation.

use crate::models::Searchable;

/// Where pagination happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// The whole collection is fetched once and sliced locally.
    Client,
    /// Each page is fetched from the backend; `items` is already one page.
    Server,
}

#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    total: usize,
    search: String,
    page: usize,
    rows_per_page: usize,
    pagination: Pagination,
    pending_delete: Option<String>,
}

impl<T: Searchable> ListView<T> {
    pub fn new(pagination: Pagination, rows_per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            search: String::new(),
            page: 0,
            rows_per_page: rows_per_page.max(1),
            pagination,
            pending_delete: None,
        }
    }

    /// Replaces the loaded records after a (re)fetch.
    pub fn set_items(&mut self, items: Vec<T>, total: usize) {
        self.items = items;
        self.total = total;
        if self.pagination == Pagination::Client {
            self.page = self.page.min(self.last_page());
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        if self.pagination == Pagination::Client {
            self.page = 0;
        }
    }

    /// Records matching the search term, case-insensitively. A blank term matches all.
    pub fn filtered(&self) -> Vec<&T> {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items.iter().filter(|item| item.matches(&needle)).collect()
    }

    /// Rows to display on the current page.
    pub fn visible(&self) -> Vec<&T> {
        let filtered = self.filtered();
        match self.pagination {
            Pagination::Server => filtered,
            Pagination::Client => filtered
                .into_iter()
                .skip(self.page * self.rows_per_page)
                .take(self.rows_per_page)
                .collect(),
        }
    }

    /// Count shown by the paginator.
    pub fn total(&self) -> usize {
        match self.pagination {
            Pagination::Server => self.total,
            Pagination::Client => self.filtered().len(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn last_page(&self) -> usize {
        self.total().saturating_sub(1) / self.rows_per_page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.last_page());
    }

    /// Changing the page size always starts again from the first page.
    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
        self.page = 0;
    }

    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.pending_delete = Some(id.into());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Hands the confirmed id to the caller, which performs the delete.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        email: String,
        phone: String,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
        }
    }

    fn row(name: &str, email: &str, phone: &str) -> Row {
        Row {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("Alice Smith", "alice@example.com", "555-0101"),
            row("Bob Jones", "bob@gym.io", "555-0202"),
            row("Carol White", "carol@example.com", "777-0303"),
        ]
    }

    #[test]
    fn test_filter_case_insensitive_any_field() {
        let mut view = ListView::new(Pagination::Client, 10);
        view.set_items(sample(), 3);

        view.set_search("ALICE");
        assert_eq!(view.filtered().len(), 1);
        view.set_search("Example.COM");
        assert_eq!(view.filtered().len(), 2);
        view.set_search("0202");
        assert_eq!(view.filtered()[0].name, "Bob Jones");
        view.set_search("nobody");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn test_empty_term_returns_all() {
        let mut view = ListView::new(Pagination::Client, 10);
        view.set_items(sample(), 3);
        view.set_search("");
        assert_eq!(view.filtered().len(), 3);
        view.set_search("   ");
        assert_eq!(view.filtered().len(), 3);
    }

    #[test]
    fn test_client_pagination() {
        let mut view = ListView::new(Pagination::Client, 2);
        view.set_items(sample(), 3);
        assert_eq!(view.visible().len(), 2);
        view.set_page(1);
        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.visible()[0].name, "Carol White");
        view.set_page(9);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_rows_per_page_resets_page() {
        let mut view = ListView::new(Pagination::Client, 1);
        view.set_items(sample(), 3);
        view.set_page(2);
        assert_eq!(view.page(), 2);
        view.set_rows_per_page(25);
        assert_eq!(view.page(), 0);

        let mut server = ListView::<Row>::new(Pagination::Server, 10);
        server.set_items(sample(), 40);
        server.set_page(3);
        server.set_rows_per_page(5);
        assert_eq!(server.page(), 0);
    }

    #[test]
    fn test_server_pagination_uses_backend_total() {
        let mut view = ListView::new(Pagination::Server, 2);
        view.set_items(sample(), 50);
        assert_eq!(view.visible().len(), 3);
        assert_eq!(view.total(), 50);
        assert_eq!(view.last_page(), 24);
    }

    #[test]
    fn test_delete_confirmation() {
        let mut view = ListView::new(Pagination::Client, 10);
        view.set_items(sample(), 3);

        view.request_delete("42");
        assert_eq!(view.pending_delete(), Some("42"));
        view.cancel_delete();
        assert_eq!(view.pending_delete(), None);
        assert_eq!(view.confirm_delete(), None);
        assert_eq!(view.items().len(), 3);

        view.request_delete("42");
        assert_eq!(view.confirm_delete().as_deref(), Some("42"));
        assert_eq!(view.pending_delete(), None);
    }
}
