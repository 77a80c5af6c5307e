use anyhow::{Context as _, bail};
use clap::Args;
use shared::util::format_currency;
use storefront_client::catalog::{CATEGORIES, featured};
use storefront_client::{CatalogFilter, CatalogLoader, PriceRange, Product};

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only show these categories (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Price band: 100-200, 200-300 or 400+
    #[arg(long)]
    price: Option<PriceRange>,

    /// First product of each category only
    #[arg(long, conflicts_with_all = ["categories", "price"])]
    featured: bool,

    /// Print normalized products as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id
    id: String,
}

/// Load the catalog once, failing with the loader's error message.
pub(crate) async fn load_catalog(ctx: &Context) -> anyhow::Result<Vec<Product>> {
    let loader = CatalogLoader::new(ctx.client()?);
    loader.load().await;
    let state = loader.snapshot().await;
    if let Some(error) = state.error {
        bail!("failed to load products: {error}");
    }
    Ok(state.products)
}

pub(crate) async fn list(ctx: &Context, args: ProductsArgs) -> anyhow::Result<()> {
    let products = load_catalog(ctx).await?;

    let mut filter = CatalogFilter::new();
    for category in &args.categories {
        if filter.categories().contains(category) {
            continue;
        }
        if !CATEGORIES.iter().any(|c| c.id == category.as_str()) {
            tracing::warn!(%category, "Unknown category, no product will match it");
        }
        filter.toggle_category(category);
    }
    filter.set_price_range(args.price);

    let shown = if args.featured {
        featured(&products)
    } else {
        filter.apply(&products)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("no products match");
        return Ok(());
    }
    for product in &shown {
        println!(
            "{:<24} {:<32} {:>12}  {}",
            product.id,
            product.name,
            format_currency(product.price),
            product.category
        );
    }
    println!();
    println!("{} of {} products", shown.len(), products.len());
    Ok(())
}

pub(crate) async fn show(ctx: &Context, args: ProductArgs) -> anyhow::Result<()> {
    let products = load_catalog(ctx).await?;
    let product = products
        .iter()
        .find(|p| p.id == args.id)
        .with_context(|| format!("product '{}' not found", args.id))?;

    println!("{}", product.name);
    println!("  id:          {}", product.id);
    println!("  category:    {}", product.category);
    println!("  price:       {}", format_currency(product.price));
    println!("  description: {}", product.description);
    if let Some(image) = &product.image {
        println!("  image:       {image}");
    }
    if let Some(expiring) = &product.expiring_date {
        println!("  expires:     {expiring}");
    }
    Ok(())
}
