//! # Product Names
//!
//! The product picker of the sale form: every stocked name, sorted.

use super::{CommandOutput, Context};
use crate::error::AppResult;

/// `stockbook products`
pub async fn run(ctx: &Context) -> AppResult<CommandOutput> {
    let names = ctx.db.products().names().await?;

    let lines = if names.is_empty() {
        vec!["No products yet. Record a purchase first.".to_string()]
    } else {
        names.clone()
    };

    CommandOutput::new(lines, &names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, day};
    use stockbook_core::{Money, NewPurchase, PaymentType};

    #[tokio::test]
    async fn test_names_sorted() {
        let ctx = context().await;

        let output = run(&ctx).await.unwrap();
        assert_eq!(output.lines, vec!["No products yet. Record a purchase first.".to_string()]);
        assert_eq!(output.json, serde_json::json!([]));

        for name in ["Navy Cut", "Bristol", "Gold Flake"] {
            ctx.db
                .ledger()
                .record_purchase(NewPurchase {
                    product_name: name.to_string(),
                    supplier: "City Wholesale".to_string(),
                    quantity: 10,
                    unit_cost: Money::from_cents(500),
                    payment_type: PaymentType::Credit,
                    purchase_date: day(1),
                })
                .await
                .unwrap();
        }

        let output = run(&ctx).await.unwrap();
        assert_eq!(output.lines, vec!["Bristol", "Gold Flake", "Navy Cut"]);
        assert_eq!(output.json, serde_json::json!(["Bristol", "Gold Flake", "Navy Cut"]));
    }
}
