//! Built-in Catalog
//!
//! Banks, default criteria, and products the analyst can pick from.

use serde::Serialize;

use crate::types::{BenchError, Criterion, Entity, Result};

const BANKS: &[(&str, &str)] = &[
    ("sber", "Sberbank"),
    ("vtb", "VTB"),
    ("alpha", "Alfa-Bank"),
    ("tinkoff", "Tinkoff"),
    ("gazprom", "Gazprombank"),
    ("raiffeisen", "Raiffeisenbank"),
    ("rosbank", "Rosbank"),
    ("mts", "MTS Bank"),
    ("otkritie", "Otkritie"),
    ("psb", "PSB"),
];

const CRITERIA: &[(&str, &str)] = &[
    ("cost", "Service cost"),
    ("sms", "SMS notifications"),
    ("withdrawal", "Cash withdrawal at other banks"),
    ("transfers", "Transfers to other banks by account details"),
    ("interest", "Interest on balance"),
    ("limit", "Credit limit"),
    ("rate", "Interest rates"),
    ("payment", "Down payment"),
    ("loyalty", "Loyalty program"),
    ("cashback", "Cashback"),
    ("grace", "Grace period"),
];

/// A product category under analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
}

pub const PRODUCTS: &[Product] = &[
    Product { id: "deposits", name: "Deposits" },
    Product { id: "credits", name: "Loans" },
    Product { id: "cards", name: "Cards" },
    Product { id: "tariffs", name: "Tariffs" },
    Product { id: "mortgage", name: "Mortgage" },
    Product { id: "investments", name: "Investments" },
];

pub fn banks() -> Vec<Entity> {
    BANKS.iter().map(|(id, name)| Entity::new(*id, *name)).collect()
}

pub fn default_criteria() -> Vec<Criterion> {
    CRITERIA
        .iter()
        .map(|(id, name)| Criterion::new(*id, *name))
        .collect()
}

pub fn bank(id: &str) -> Result<Entity> {
    BANKS
        .iter()
        .find(|(bank_id, _)| *bank_id == id)
        .map(|(bank_id, name)| Entity::new(*bank_id, *name))
        .ok_or_else(|| BenchError::UnknownCatalogEntry {
            kind: "bank",
            id: id.to_string(),
        })
}

pub fn criterion(id: &str) -> Result<Criterion> {
    CRITERIA
        .iter()
        .find(|(criterion_id, _)| *criterion_id == id)
        .map(|(criterion_id, name)| Criterion::new(*criterion_id, *name))
        .ok_or_else(|| BenchError::UnknownCatalogEntry {
            kind: "criterion",
            id: id.to_string(),
        })
}

pub fn product(id: &str) -> Result<&'static Product> {
    PRODUCTS
        .iter()
        .find(|product| product.id == id)
        .ok_or_else(|| BenchError::UnknownCatalogEntry {
            kind: "product",
            id: id.to_string(),
        })
}
