use anyhow::Context as _;
use clap::{Args, Subcommand};
use shared::util::format_currency;
use storefront_client::CartStore;

use super::Context;
use super::products::load_catalog;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart
    Show,
    /// Add one unit of a catalog product
    Add { id: String },
    /// Set a line's quantity; zero or less removes it
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
}

pub(crate) async fn run(ctx: &Context, command: CartCommand) -> anyhow::Result<()> {
    let mut cart = ctx.cart();
    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { id } => {
            let products = load_catalog(ctx).await?;
            let product = products
                .iter()
                .find(|p| p.id == id)
                .with_context(|| format!("product '{id}' not found"))?;
            cart.add_to_cart(product);
            tracing::info!(product = %product.id, "Added to cart");
        }
        CartSubcommand::Set { id, quantity } => {
            if cart.get(&id).is_none() {
                println!("'{id}' is not in the cart");
            }
            cart.update_quantity(&id, quantity);
        }
        CartSubcommand::Remove { id } => cart.remove_from_cart(&id),
        CartSubcommand::Clear => cart.clear_cart(),
    }
    print_cart(&cart);
    Ok(())
}

pub(crate) fn print_cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in cart.lines() {
        println!(
            "{:<24} {:<32} {:>3} x {:>12} = {:>12}",
            line.id(),
            line.product.name,
            line.quantity,
            format_currency(line.product.price),
            format_currency(line.line_total())
        );
    }
    println!();
    println!(
        "{} items, total {}",
        cart.item_count(),
        format_currency(cart.total_price())
    );
}
