//! Cart commands.

use anyhow::Result;
use pharma_commerce::cart::CartItem;
use pharma_commerce::ids::ProductId;
use pharma_store::CartStore;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;

    match args.command {
        Some(CartCommand::Show) | None => show_cart(&cart, ctx),
        Some(CartCommand::Add {
            product_id,
            name,
            unit_price,
            quantity,
        }) => {
            let item = CartItem::new(product_id.as_str(), name, unit_price);
            cart.add_item_fractional(item, quantity);
            report_line(&cart, &ProductId::new(product_id), ctx);
            Ok(())
        }
        Some(CartCommand::Update {
            product_id,
            quantity,
        }) => {
            let id = ProductId::new(product_id);
            cart.update_quantity(&id, quantity);
            report_line(&cart, &id, ctx);
            Ok(())
        }
        Some(CartCommand::Remove { product_id }) => {
            let id = ProductId::new(product_id);
            cart.remove_item(&id);
            ctx.output.success(&format!("Removed {}", id));
            Ok(())
        }
        Some(CartCommand::Clear) => {
            cart.clear_cart();
            ctx.output.success("Cart cleared");
            Ok(())
        }
    }
}

fn report_line(cart: &CartStore, id: &ProductId, ctx: &Context) {
    match cart.cart().get_item(id) {
        Some(line) => ctx.output.success(&format!(
            "{} x {} in cart",
            line.quantity, line.product_name
        )),
        None => ctx.output.success(&format!("Removed {}", id)),
    }
    ctx.output.debug(&format!("{} item(s) in cart", cart.total_items()));
}

/// Print the cart lines and totals, or the pricing as JSON.
pub fn show_cart(cart: &CartStore, ctx: &Context) -> Result<()> {
    let pricing = cart.pricing(ctx.config.currency())?;

    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return Ok(());
    }

    ctx.output.header("Cart");

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let widths = [12, 28, 6, 14, 14];
    ctx.output
        .table_header(&["PRODUCT", "NAME", "QTY", "UNIT", "SUBTOTAL"], &widths);

    for (line, priced) in cart.items().iter().zip(&pricing.line_items) {
        ctx.output.table_row(
            &[
                line.product_id.as_str(),
                &line.product_name,
                &line.quantity.to_string(),
                &priced.unit_price.display(),
                &priced.subtotal.display(),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("items", &pricing.total_items.to_string());
    ctx.output.kv("total", &pricing.total.display());

    Ok(())
}
