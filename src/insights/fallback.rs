//! Demo insight content shown when the analysis backend has no records.

use crate::types::{InsightBlock, InsightCategory};

const BEST_TITLE: &str = "Best offer on the market";
const BEST_TEXT: &str = "Alfa-Bank offers the strongest credit card terms, with cashback of up to \
10% and a 100-day interest-free period. Sberbank leads on branch availability and mobile app \
quality.";

const ADVANTAGE_TITLE: &str = "Sberbank advantages";
const ADVANTAGE_TEXT: &str = "Sberbank outperforms competitors on: the SberSpasibo loyalty \
program (up to 30% cashback), an extensive network of more than 14,000 branches, free SMS \
notifications for all client categories, and up to 3.5% annual interest on balances.";

const IMPROVEMENT_TITLE: &str = "Areas for improvement";
const IMPROVEMENT_TEXT: &str = "Consider lowering the cost of premium card service (currently \
15-20% above competitors), raising fee-free withdrawal limits at other banks' ATMs, and \
extending contactless payments through Apple Pay and Google Pay.";

/// The fixed three-block demo set, in `best`, `advantage`, `improvement` order.
pub fn fallback_insights() -> Vec<InsightBlock> {
    vec![
        InsightBlock::new(InsightCategory::Best, BEST_TITLE, BEST_TEXT),
        InsightBlock::new(InsightCategory::Advantage, ADVANTAGE_TITLE, ADVANTAGE_TEXT),
        InsightBlock::new(InsightCategory::Improvement, IMPROVEMENT_TITLE, IMPROVEMENT_TEXT),
    ]
}
