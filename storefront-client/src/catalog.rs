//! Product catalog
//!
//! [`CatalogLoader`] fetches and normalizes the product list and exposes it
//! as an observable [`CatalogState`]. Each load takes a new generation
//! number; a response whose generation is no longer current (a newer load
//! started, or the consumer detached) is discarded instead of applied. The
//! underlying request is not aborted.
//!
//! [`CatalogFilter`] and [`featured`] are pure views over a loaded list.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::models::{Product, normalize_catalog};
use tokio::sync::RwLock;

use crate::api::StorefrontApi;

/// Browsable category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CATEGORIES: [Category; 6] = [
    Category { id: "Face Care", name: "Face Care" },
    Category { id: "Body Care", name: "Body Care" },
    Category { id: "Serums", name: "Serums" },
    Category { id: "Creams", name: "Creams" },
    Category { id: "Cleansers", name: "Cleansers" },
    Category { id: "Oils", name: "Oils" },
];

/// Maximum number of products in the featured selection
pub const FEATURED_LIMIT: usize = 6;

/// Preset price bands offered by the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceRange {
    From100To200,
    From200To300,
    Over300,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [Self::From100To200, Self::From200To300, Self::Over300];

    pub fn id(&self) -> &'static str {
        match self {
            Self::From100To200 => "100-200",
            Self::From200To300 => "200-300",
            Self::Over300 => "400+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::From100To200 => "Le100 to Le200",
            Self::From200To300 => "Le200 to Le300",
            Self::Over300 => "Over Le300",
        }
    }

    /// Inclusive bounds
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::From100To200 => (100.0, 200.0),
            Self::From200To300 => (200.0, 300.0),
            Self::Over300 => (300.0, 1_000_000.0),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        let (min, max) = self.bounds();
        price >= min && price <= max
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.id() == s.trim())
            .ok_or_else(|| format!("unknown price range '{s}' (expected 100-200, 200-300 or 400+)"))
    }
}

/// Category and price filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    categories: Vec<String>,
    price_range: Option<PriceRange>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    /// Select the category, or deselect it if already selected.
    pub fn toggle_category(&mut self, id: &str) {
        match self.categories.iter().position(|c| c == id) {
            Some(pos) => {
                self.categories.remove(pos);
            }
            None => self.categories.push(id.to_string()),
        }
    }

    pub fn set_price_range(&mut self, range: Option<PriceRange>) {
        self.price_range = range;
    }

    /// An empty category selection matches every category.
    pub fn matches(&self, product: &Product) -> bool {
        let category_match =
            self.categories.is_empty() || self.categories.iter().any(|c| *c == product.category);
        let price_match = self.price_range.is_none_or(|range| range.contains(product.price));
        category_match && price_match
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// First product of each distinct category, in catalog order, capped at
/// [`FEATURED_LIMIT`].
pub fn featured(products: &[Product]) -> Vec<&Product> {
    let mut seen: Vec<&str> = Vec::new();
    let mut picked = Vec::new();
    for product in products {
        if picked.len() == FEATURED_LIMIT {
            break;
        }
        if !seen.contains(&product.category.as_str()) {
            seen.push(product.category.as_str());
            picked.push(product);
        }
    }
    picked
}

/// Observable catalog state
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// True until the current request settles
    pub loading: bool,
    /// Failure message of the last settled request
    pub error: Option<String>,
    /// Publishable products; empty after a failure
    pub products: Vec<Product>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            products: Vec::new(),
        }
    }
}

/// What happened to a load's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Result written to the state
    Applied,
    /// A newer load started or the consumer detached; state untouched
    Discarded,
}

pub struct CatalogLoader<A> {
    api: A,
    generation: AtomicU64,
    state: RwLock<CatalogState>,
}

impl<A> std::fmt::Debug for CatalogLoader<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<A: StorefrontApi> CatalogLoader<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            generation: AtomicU64::new(0),
            state: RwLock::new(CatalogState::default()),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Fetch, normalize and publish the catalog.
    pub async fn load(&self) -> LoadOutcome {
        let generation = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            generation
        };
        tracing::debug!(generation, "Loading catalog");

        let result = self.api.fetch_products().await;

        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            tracing::debug!(generation, current = self.current_generation(), "Discarding stale catalog response");
            return LoadOutcome::Discarded;
        }
        match result {
            Ok(raw) => {
                let fetched = raw.len();
                state.products = normalize_catalog(raw);
                state.error = None;
                tracing::info!(fetched, published = state.products.len(), "Catalog loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog load failed");
                state.products.clear();
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
        LoadOutcome::Applied
    }

    /// Stop applying results of requests already in flight.
    pub fn detach(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "Catalog consumer detached");
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// Look up a loaded product by id
    pub async fn find(&self, id: &str) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}
