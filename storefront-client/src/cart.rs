//! Cart store
//!
//! Owned, single-writer collection of [`CartLine`]s. Consumers receive the
//! store by reference; there is no global cart. When backed by
//! [`SessionStorage`] every mutation is written through to the session's
//! `cart.json`.

use shared::models::{CartLine, Product};

use crate::storage::{JsonFile, SessionStorage};

#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    file: Option<JsonFile>,
}

impl CartStore {
    /// In-memory cart, nothing persisted
    pub fn new() -> Self {
        Self::default()
    }

    /// Cart persisted in the given session, restored from any saved state
    pub fn with_storage(storage: &SessionStorage) -> Self {
        let file = storage.cart_file();
        let lines = file
            .load::<Vec<CartLine>>()
            .map(sanitize)
            .unwrap_or_default();
        tracing::debug!(lines = lines.len(), path = %file.path().display(), "Restored cart");
        Self {
            lines,
            file: Some(file),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ quantities
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Increment the product's line, or append a new line with quantity 1.
    pub fn add_to_cart(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.id() == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product.clone(), 1)),
        }
        tracing::debug!(id = %product.id, "Added to cart");
        self.persist();
    }

    /// Set a line's quantity; `quantity <= 0` removes the line.
    ///
    /// Unknown ids are ignored. No stock limit is applied.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) {
            line.quantity = quantity;
            tracing::debug!(%id, quantity, "Updated cart quantity");
            self.persist();
        }
    }

    /// Delete the line; no-op when absent.
    pub fn remove_from_cart(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        if self.lines.len() != before {
            tracing::debug!(%id, "Removed from cart");
            self.persist();
        }
    }

    /// Σ price × quantity over the current lines
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        let Some(file) = &self.file else {
            return;
        };
        if let Err(e) = file.save(&self.lines) {
            tracing::warn!(path = %file.path().display(), error = %e, "Failed to persist cart");
        }
    }
}

/// Drop zero-quantity lines and merge duplicate ids from a persisted cart.
fn sanitize(raw: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(raw.len());
    for line in raw.into_iter().filter(|line| line.quantity > 0) {
        match lines.iter_mut().find(|existing| existing.id() == line.id()) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}
