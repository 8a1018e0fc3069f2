//! Catalog Command
//!
//! List built-in banks, criteria, and products.

use console::style;

use crate::catalog::{self, PRODUCTS};
use crate::cli::ui::Output;
use crate::types::Result;

pub fn run(format: &str) -> Result<()> {
    let banks = catalog::banks();
    let criteria = catalog::default_criteria();

    if format == "json" {
        return Output::new().json(&serde_json::json!({
            "banks": banks,
            "criteria": criteria,
            "products": PRODUCTS,
        }));
    }

    let output = Output::new();

    output.section("Banks");
    for bank in &banks {
        println!("  {:<12} {}", style(&bank.id).cyan(), bank.name);
    }

    output.section("Criteria");
    for criterion in &criteria {
        println!("  {:<12} {}", style(&criterion.id).cyan(), criterion.name);
    }

    output.section("Products");
    for product in PRODUCTS {
        println!("  {:<12} {}", style(product.id).cyan(), product.name);
    }

    Ok(())
}
