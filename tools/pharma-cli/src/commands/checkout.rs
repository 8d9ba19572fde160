//! Checkout command.

use anyhow::{anyhow, Result};

use super::cart::show_cart;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the checkout command.
///
/// Orders go to the demo backend, which lives only as long as the process.
/// The persisted cart is cleared once the order is accepted.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;

    if args.dry_run {
        return show_cart(&cart, ctx);
    }

    let total = cart.pricing(ctx.config.currency())?.total;
    let (client, _backend) = ctx.client();

    client
        .checkout(&mut cart)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    let orders = client
        .order_history()
        .await
        .map_err(|e| anyhow!(e.user_message()))?
        .into_data();

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.success(&format!("Order placed for {}", total));
    for order in &orders {
        ctx.output.kv("order", order.id.as_str());
        ctx.output.kv("status", &status_badge(&order.status));
        ctx.output.kv("items", &order.item_count().to_string());
    }

    Ok(())
}
