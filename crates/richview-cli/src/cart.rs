//! Cart command handlers.
//!
//! The cart lives in a JSON file under `RICHVIEW_CART_DIR`; every mutation
//! is written through before the command returns.

use clap::Subcommand;
use richview_core::{AppConfig, CartItem, CartStorage, CartStore, FileCartStorage, NewCartItem};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Add an item, or increase its quantity if already in the cart
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Unit price in currency subunits (e.g. kobo)
        #[arg(long)]
        price: i64,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Fetch a product from the catalog and add it to the cart
    AddProduct {
        /// Catalog product ID
        id: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Decrease an item's quantity, removing it at zero
    Remove {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Remove an item regardless of quantity
    RemoveAll {
        #[arg(long)]
        id: String,
    },
    /// Set an item's exact quantity; zero or below removes it
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// List cart contents
    Show {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the cart total
    Total,
}

pub(crate) async fn run(
    config: &AppConfig,
    currency: &str,
    command: CartCommands,
) -> anyhow::Result<()> {
    let storage = FileCartStorage::new(&config.cart_dir);
    tracing::debug!(path = %storage.path().display(), "opening cart");
    let mut cart = CartStore::load(storage);

    match command {
        CartCommands::Add {
            id,
            name,
            price,
            image_url,
            quantity,
        } => {
            cart.add_item(
                NewCartItem {
                    id,
                    name,
                    price,
                    image_url,
                },
                quantity,
            );
            print_summary(&cart, currency);
        }
        CartCommands::AddProduct { id, quantity } => {
            let catalog = crate::catalog_client(config)?;
            let raw = catalog
                .fetch_product(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("product '{id}' not found"))?;
            let product = richview_catalog::normalize_product(&raw, 0);
            cart.add_item(
                NewCartItem {
                    id: product.id,
                    name: product.name,
                    price: product.price,
                    image_url: product.image,
                },
                quantity,
            );
            print_summary(&cart, currency);
        }
        CartCommands::Remove { id, quantity } => {
            cart.remove_item(&id, quantity);
            print_summary(&cart, currency);
        }
        CartCommands::RemoveAll { id } => {
            cart.remove_all(&id);
            print_summary(&cart, currency);
        }
        CartCommands::Update { id, quantity } => {
            cart.update_quantity(&id, quantity);
            print_summary(&cart, currency);
        }
        CartCommands::Clear => {
            cart.clear_cart();
            println!("cart cleared");
        }
        CartCommands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(cart.items())?);
            } else {
                print_items(&cart, currency);
            }
        }
        CartCommands::Total => {
            println!("{}", cart.get_total_formatted(Some(currency)));
        }
    }

    Ok(())
}

fn print_items<S: CartStorage>(cart: &CartStore<S>, currency: &str) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    println!("{:<24} {:<32} {:>5} {:>16}", "ID", "NAME", "QTY", "LINE TOTAL");
    for item in cart.items() {
        println!("{}", item_row(item, currency));
    }
    print_summary(cart, currency);
}

fn item_row(item: &CartItem, currency: &str) -> String {
    let line_total = item.price.saturating_mul(i64::from(item.quantity));
    format!(
        "{:<24} {:<32} {:>5} {:>16}",
        item.id,
        item.name,
        item.quantity,
        richview_core::format_subunits(line_total, currency),
    )
}

fn summary_line<S: CartStorage>(cart: &CartStore<S>, currency: &str) -> String {
    format!(
        "{} item(s), total {}",
        cart.item_count(),
        cart.get_total_formatted(Some(currency))
    )
}

fn print_summary<S: CartStorage>(cart: &CartStore<S>, currency: &str) {
    println!("{}", summary_line(cart, currency));
}

#[cfg(test)]
mod tests {
    use super::*;
    use richview_core::MemoryCartStorage;

    fn cart_with_jacket() -> CartStore<MemoryCartStorage> {
        let mut cart = CartStore::load(MemoryCartStorage::new());
        cart.add_item(
            NewCartItem {
                id: "rv-jacket".to_owned(),
                name: "Jacket".to_owned(),
                price: 150_000,
                image_url: None,
            },
            2,
        );
        cart
    }

    #[test]
    fn rows_and_summary_use_requested_currency() {
        let cart = cart_with_jacket();
        let row = item_row(&cart.items()[0], "USD");
        assert!(row.ends_with("$3,000.00"), "row: {row}");
        assert_eq!(summary_line(&cart, "USD"), "2 item(s), total $3,000.00");
    }

    #[test]
    fn naira_is_the_default_display() {
        let cart = cart_with_jacket();
        assert_eq!(summary_line(&cart, "NGN"), "2 item(s), total ₦3,000.00");
    }
}
