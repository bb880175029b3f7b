//! # Sale Entry
//!
//! ```text
//! stockbook -u admin -p 123 sale --product "Gold Flake" \
//!     --customer John --quantity 30 [--unit-price 12.00]
//!       │
//!       ├── no --unit-price? use the product's current unit price
//!       ▼
//! StockLedger::record_sale ──► stock -= quantity (refused when short)
//! ```

use tracing::debug;

use stockbook_core::render::format_amount;
use stockbook_core::validation::validate_product_name;
use stockbook_core::{Money, NewSale, User};

use super::{CommandOutput, Context};
use crate::cli::SaleArgs;
use crate::error::{AppError, AppResult};

/// The price the sale form pre-fills: the product's current unit price.
pub async fn suggested_price(ctx: &Context, product_name: &str) -> AppResult<Money> {
    let name = validate_product_name(product_name)?;

    match ctx.db.products().find_by_name(&name).await? {
        Some(product) => Ok(product.unit_price),
        None => Err(AppError::not_found("Product", &name)),
    }
}

/// `stockbook sale`
pub async fn run(ctx: &Context, user: &User, args: SaleArgs) -> AppResult<CommandOutput> {
    debug!(operator = %user.username, product = %args.product, "Sale entry");

    let unit_price = match args.unit_price {
        Some(price) => price,
        None => suggested_price(ctx, &args.product).await?,
    };

    let entry = NewSale {
        product_name: args.product,
        customer_name: args.customer,
        quantity: args.quantity,
        unit_price,
        payment_type: args.payment,
        sale_date: args.date.unwrap_or(ctx.today),
    };

    let receipt = ctx.db.ledger().record_sale(entry).await?;

    let currency = &ctx.config.currency;
    let sale = &receipt.sale;
    let product = &receipt.product;

    let lines = vec![
        "✓ Sale recorded successfully!".to_string(),
        format!(
            "  {} x {} to {} on {} ({})",
            sale.quantity, product.name, sale.customer_name, sale.sale_date, sale.payment_type
        ),
        format!("  Total amount: {}", format_amount(currency, sale.total_amount)),
        format!("  Remaining stock: {} units", product.stock_quantity),
    ];

    CommandOutput::new(lines, &receipt)
}
