//! # Purchase Entry
//!
//! ```text
//! stockbook -u admin -p 123 purchase --product "Gold Flake" \
//!     --supplier "ABC Distributors" --quantity 100 --unit-cost 10.50
//!       │
//!       ▼
//! StockLedger::record_purchase ──► stock += quantity, unit price = unit cost
//! ```

use tracing::debug;

use stockbook_core::render::format_amount;
use stockbook_core::{NewPurchase, User};

use super::{CommandOutput, Context};
use crate::cli::PurchaseArgs;
use crate::error::AppResult;

/// `stockbook purchase`
pub async fn run(ctx: &Context, user: &User, args: PurchaseArgs) -> AppResult<CommandOutput> {
    debug!(operator = %user.username, product = %args.product, "Purchase entry");

    let entry = NewPurchase {
        product_name: args.product,
        supplier: args.supplier,
        quantity: args.quantity,
        unit_cost: args.unit_cost,
        payment_type: args.payment,
        purchase_date: args.date.unwrap_or(ctx.today),
    };

    let receipt = ctx.db.ledger().record_purchase(entry).await?;

    let currency = &ctx.config.currency;
    let purchase = &receipt.purchase;
    let product = &receipt.product;

    let mut lines = vec![
        "✓ Purchase recorded successfully!".to_string(),
        format!(
            "  {} x {} from {} on {} ({})",
            purchase.quantity,
            product.name,
            purchase.supplier,
            purchase.purchase_date,
            purchase.payment_type
        ),
        format!("  Total cost: {}", format_amount(currency, purchase.total_cost)),
        format!("  Stock on hand: {} units", product.stock_quantity),
    ];
    if receipt.created_product {
        lines.push(format!("  New product added: {}", product.name));
    }

    CommandOutput::new(lines, &receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{admin, context, day};
    use crate::error::ErrorCode;
    use stockbook_core::{Money, PaymentType};

    fn args(quantity: i64, cost: &str) -> PurchaseArgs {
        PurchaseArgs {
            product: "Gold Flake".to_string(),
            supplier: "ABC Distributors".to_string(),
            quantity,
            unit_cost: cost.parse().unwrap(),
            payment: PaymentType::Cash,
            date: Some(day(1)),
        }
    }

    #[tokio::test]
    async fn test_first_purchase_creates_product() {
        let ctx = context().await;
        let user = admin(&ctx).await;

        let output = run(&ctx, &user, args(100, "10.50")).await.unwrap();

        assert_eq!(output.lines[0], "✓ Purchase recorded successfully!");
        assert!(output.lines.contains(&"  Total cost: Rs.1050.00".to_string()));
        assert!(output.lines.contains(&"  Stock on hand: 100 units".to_string()));
        assert!(output.lines.contains(&"  New product added: Gold Flake".to_string()));
        assert_eq!(output.json["created_product"], true);
        assert_eq!(output.json["product"]["stock_quantity"], 100);
    }

    #[tokio::test]
    async fn test_second_purchase_updates_price() {
        let ctx = context().await;
        let user = admin(&ctx).await;

        run(&ctx, &user, args(100, "10.50")).await.unwrap();
        let output = run(&ctx, &user, args(20, "11.00")).await.unwrap();

        assert!(!output.lines.iter().any(|l| l.contains("New product")));
        let product = ctx.db.products().find_by_name("Gold Flake").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 120);
        assert_eq!(product.unit_price, Money::from_cents(1100));
    }

    #[tokio::test]
    async fn test_missing_date_uses_today() {
        let ctx = context().await;
        let user = admin(&ctx).await;

        let mut entry = args(5, "7.00");
        entry.date = None;
        run(&ctx, &user, entry).await.unwrap();

        let product = ctx.db.products().find_by_name("Gold Flake").await.unwrap().unwrap();
        let purchases = ctx.db.purchases().list_for_product(&product.id).await.unwrap();
        assert_eq!(purchases[0].purchase_date, day(31));
    }

    #[tokio::test]
    async fn test_invalid_entry_is_rejected() {
        let ctx = context().await;
        let user = admin(&ctx).await;

        let err = run(&ctx, &user, args(0, "10.50")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = run(&ctx, &user, args(10, "0")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(ctx.db.products().count().await.unwrap(), 0);
    }
}
