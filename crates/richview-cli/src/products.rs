//! Catalog browsing commands.

use clap::Subcommand;
use richview_catalog::{
    categories, checkout_route, checkout_url, collection::DEFAULT_FEATURED_COUNT, featured,
    filter_products, normalize_product, normalize_products, pagination::DEFAULT_OLDEST_COUNT,
    LISTING_PAGE_SIZE,
};
use richview_core::{AppConfig, Product};

/// Page size for views that reorder or filter a listing.
const COLLECTION_PAGE_SIZE: u32 = 50;

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List the first page of products (Ctrl-C abandons the request)
    List {
        #[arg(long, default_value_t = LISTING_PAGE_SIZE)]
        per_page: u32,
        /// Print normalized products as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the oldest products by creation time
    Oldest {
        #[arg(long, default_value_t = DEFAULT_OLDEST_COUNT)]
        count: usize,
    },
    /// Show featured products ordered by metadata position
    Featured {
        #[arg(long, default_value_t = DEFAULT_FEATURED_COUNT)]
        count: usize,
    },
    /// Search products by name or category
    Search {
        /// Case-insensitive text matched against name and category
        #[arg(long, default_value = "")]
        query: String,
        /// Restrict to one category ("all" disables the filter)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product
    Show {
        id: String,
    },
    /// Print the checkout link and in-app checkout route for a product
    Checkout {
        id: String,
    },
}

pub(crate) async fn run(config: &AppConfig, command: ProductCommands) -> anyhow::Result<()> {
    let catalog = crate::catalog_client(config)?;

    match command {
        ProductCommands::List { per_page, json } => {
            let cancelled = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            let Some(products) = catalog.load_products_until(per_page, cancelled).await? else {
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                print_products(products.iter());
            }
        }
        ProductCommands::Oldest { count } => {
            let oldest = catalog.fetch_oldest_products(count).await?;
            println!("{}", serde_json::to_string_pretty(&oldest)?);
        }
        ProductCommands::Featured { count } => {
            let page = catalog.list_products(COLLECTION_PAGE_SIZE, 1).await?;
            let products = normalize_products(&page.data);
            print_products(featured(&products, count).into_iter());
        }
        ProductCommands::Search { query, category } => {
            let page = catalog.list_products(COLLECTION_PAGE_SIZE, 1).await?;
            let products = normalize_products(&page.data);
            let matches = filter_products(&products, &query, category.as_deref());
            println!("categories: {}", categories(&products).join(", "));
            if matches.is_empty() {
                println!("no products match");
            } else {
                print_products(matches.into_iter());
            }
        }
        ProductCommands::Show { id } => {
            let product = fetch_normalized(&catalog, &id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductCommands::Checkout { id } => {
            let product = fetch_normalized(&catalog, &id).await?;
            let target = checkout_url(&product.id, &product.metadata);
            println!("checkout url:   {target}");
            println!("checkout route: {}", checkout_route(&target));
        }
    }

    Ok(())
}

async fn fetch_normalized(
    catalog: &richview_catalog::CatalogClient,
    id: &str,
) -> anyhow::Result<Product> {
    let raw = catalog
        .fetch_product(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product '{id}' not found"))?;
    Ok(normalize_product(&raw, 0))
}

fn print_products<'a>(products: impl Iterator<Item = &'a Product>) {
    for p in products {
        println!(
            "{:<20} {:<32} {:>14}  {:<16} {:<16} {:.1}",
            p.id,
            p.name,
            p.formatted_price(),
            p.category,
            p.badge,
            p.rating
        );
    }
}
