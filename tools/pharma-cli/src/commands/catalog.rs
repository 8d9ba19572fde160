//! Catalog browsing commands, served by the demo backend.

use anyhow::{anyhow, Result};
use pharma_commerce::prelude::*;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::hot_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CatalogCommand::List {
            letter,
            category,
            hot,
            search,
        }) => {
            let mut filter = ProductFilter::new();
            if let Some(letter) = letter {
                filter = filter.with_letter(letter);
            }
            if let Some(category) = category {
                filter = filter.with_category(category);
            }
            if hot {
                filter = filter.hot_only();
            }
            if let Some(search) = search {
                filter = filter.with_text(search);
            }
            list_products(&filter, ctx).await
        }
        None => list_products(&ProductFilter::new(), ctx).await,
        Some(CatalogCommand::Categories) => list_categories(ctx).await,
        Some(CatalogCommand::Add {
            product_id,
            quantity,
        }) => add_to_cart(&ProductId::new(product_id), quantity, ctx).await,
    }
}

async fn list_products(filter: &ProductFilter, ctx: &Context) -> Result<()> {
    let (client, _backend) = ctx.client();
    let products = client
        .products()
        .await
        .map_err(|e| anyhow!(e.user_message()))?
        .into_data();
    let products = filter.apply(&products);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Products");

    if products.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    let currency = ctx.config.currency();
    let widths = [10, 24, 14, 12, 12, 4];
    ctx.output
        .table_header(&["ID", "NAME", "CATEGORY", "NET RATE", "MRP", ""], &widths);

    for product in &products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.category.name,
                &product.net_rate_money(currency).display(),
                &Money::new(product.mrp, currency).display(),
                &hot_badge(product.is_hot),
            ],
            &widths,
        );
        if let Some(offer) = &product.bonus_offer {
            ctx.output.kv("offer", offer);
        }
    }

    ctx.output.info(&format!("{} product(s)", products.len()));

    Ok(())
}

async fn list_categories(ctx: &Context) -> Result<()> {
    let (client, _backend) = ctx.client();
    let mut categories = client
        .categories()
        .await
        .map_err(|e| anyhow!(e.user_message()))?
        .into_data();
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in &categories {
        ctx.output
            .list_item(&format!("{} ({})", category.name, category.id));
    }

    Ok(())
}

async fn add_to_cart(id: &ProductId, quantity: i64, ctx: &Context) -> Result<()> {
    let (client, _backend) = ctx.client();
    let product = client
        .product(id)
        .await
        .map_err(|e| anyhow!(e.user_message()))?
        .into_data()
        .ok_or_else(|| anyhow!("Product not found: {}", id))?;

    let mut cart = ctx.cart()?;
    cart.add_item(product.to_cart_item(), quantity);

    ctx.output.success(&format!(
        "Added {} to cart at {}",
        product.name,
        product.net_rate_money(ctx.config.currency())
    ));

    Ok(())
}
