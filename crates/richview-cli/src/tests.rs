use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["richview-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_cart_add_with_default_quantity() {
    let cli = Cli::try_parse_from([
        "richview-cli",
        "cart",
        "add",
        "--id",
        "PROD_1",
        "--name",
        "Kaftan",
        "--price",
        "250000",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Cart {
            currency: _,
            command:
                CartCommands::Add {
                    id,
                    name,
                    price,
                    image_url,
                    quantity,
                },
        }) => {
            assert_eq!(id, "PROD_1");
            assert_eq!(name, "Kaftan");
            assert_eq!(price, 250_000);
            assert_eq!(image_url, None);
            assert_eq!(quantity, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_cart_update_with_negative_quantity() {
    let cli = Cli::try_parse_from([
        "richview-cli",
        "cart",
        "update",
        "--id",
        "PROD_1",
        "--quantity",
        "-2",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            currency: _,
            command: CartCommands::Update { quantity: -2, .. }
        })
    ));
}

#[test]
fn cart_remove_rejects_negative_quantity() {
    let result = Cli::try_parse_from([
        "richview-cli",
        "cart",
        "remove",
        "--id",
        "PROD_1",
        "--quantity",
        "-1",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_cart_total_default_currency() {
    let cli = Cli::try_parse_from(["richview-cli", "cart", "total"]).expect("valid args");
    match cli.command {
        Some(Commands::Cart {
            currency,
            command: CartCommands::Total,
        }) => assert_eq!(currency, "NGN"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cart_currency_applies_to_every_cart_subcommand() {
    for args in [
        ["richview-cli", "cart", "--currency", "USD", "show"],
        ["richview-cli", "cart", "show", "--currency", "USD"],
    ] {
        let cli = Cli::try_parse_from(args).expect("valid args");
        match cli.command {
            Some(Commands::Cart {
                currency,
                command: CartCommands::Show { json: false },
            }) => assert_eq!(currency, "USD"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

#[test]
fn parses_cart_clear_and_remove_all() {
    let cli = Cli::try_parse_from(["richview-cli", "cart", "clear"]).expect("valid args");
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            currency: _,
            command: CartCommands::Clear
        })
    ));

    let cli = Cli::try_parse_from(["richview-cli", "cart", "remove-all", "--id", "x"])
        .expect("valid args");
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            currency: _,
            command: CartCommands::RemoveAll { .. }
        })
    ));
}

#[test]
fn parses_products_oldest_default_count() {
    let cli = Cli::try_parse_from(["richview-cli", "products", "oldest"]).expect("valid args");
    assert!(matches!(
        cli.command,
        Some(Commands::Products {
            command: ProductCommands::Oldest { count: 3 }
        })
    ));
}

#[test]
fn parses_products_list_defaults() {
    let cli = Cli::try_parse_from(["richview-cli", "products", "list"]).expect("valid args");
    assert!(matches!(
        cli.command,
        Some(Commands::Products {
            command: ProductCommands::List {
                per_page: 10,
                json: false
            }
        })
    ));
}

#[test]
fn parses_products_search_with_category() {
    let cli = Cli::try_parse_from([
        "richview-cli",
        "products",
        "search",
        "--query",
        "jacket",
        "--category",
        "Outerwear",
    ])
    .expect("valid args");
    match cli.command {
        Some(Commands::Products {
            command: ProductCommands::Search { query, category },
        }) => {
            assert_eq!(query, "jacket");
            assert_eq!(category.as_deref(), Some("Outerwear"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_check_frame_url() {
    let cli = Cli::try_parse_from([
        "richview-cli",
        "check-frame",
        "https%3A%2F%2Fpaystack.com%2Fbuy%2Fx",
    ])
    .expect("valid args");
    match cli.command {
        Some(Commands::CheckFrame { url }) => {
            assert_eq!(url, "https%3A%2F%2Fpaystack.com%2Fbuy%2Fx");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_stores_nearest_with_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "richview-cli",
        "stores",
        "nearest",
        "--lat",
        "-33.9",
        "--lng",
        "18.4",
    ])
    .expect("valid args");
    match cli.command {
        Some(Commands::Stores {
            command: StoreCommands::Nearest { lat, lng },
        }) => {
            assert!((lat + 33.9).abs() < f64::EPSILON);
            assert!((lng - 18.4).abs() < f64::EPSILON);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn stores_nearest_requires_coordinates() {
    assert!(Cli::try_parse_from(["richview-cli", "stores", "nearest"]).is_err());
}
