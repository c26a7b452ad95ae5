//! Price of a configured garment.
//!
//! `total = base + fabric modifier + every chosen option's modifier`. Amounts
//! are signed integers in the store currency's base unit; formatting and
//! rounding belong to the presentation layer. Sums saturate instead of
//! wrapping; stored prices are bounded by
//! [`MAX_PRICE`](crate::domain::catalog::MAX_PRICE) on the way in.

use serde::Serialize;

use super::configuration::Configuration;
use crate::domain::value_objects::StepId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    pub step: StepId,
    pub label: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub lines: Vec<PriceLine>,
    pub total: i64,
}

pub fn total_price(base_price: i64, config: &Configuration) -> i64 {
    let fabric = config.fabric().map(|f| f.price_modifier()).unwrap_or(0);
    config.selections().map(|(_, s)| s.price_modifier()).fold(base_price.saturating_add(fabric), i64::saturating_add)
}

/// Itemised version of [`total_price`]; zero-priced entries are still listed
pub fn price_breakdown(base_price: i64, config: &Configuration) -> PriceBreakdown {
    let mut lines = Vec::new();
    if let Some(fabric) = config.fabric() {
        lines.push(PriceLine { step: StepId::fabric(), label: fabric.name.clone(), amount: fabric.price_modifier() });
    }
    for (step, selection) in config.selections() {
        if let Some(option) = selection.option() {
            lines.push(PriceLine { step: step.clone(), label: option.name.clone(), amount: option.price_modifier() });
        }
    }
    let total = lines.iter().map(|l| l.amount).fold(base_price, i64::saturating_add);
    PriceBreakdown { base_price, lines, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{FabricOption, StyleOption};
    use crate::domain::value_objects::ProductCategory;

    #[test]
    fn test_worked_example() {
        let mut c = Configuration::new(ProductCategory::Shirt);
        let mut fabric = FabricOption::new("f1", "Oxford");
        fabric.price_modifier = Some(800);
        c.set_fabric(fabric, None).unwrap();
        c.select("collar".into(), StyleOption::new("c1", "Spread").with_price(300));
        c.select("cuff".into(), StyleOption::new("k1", "Barrel").with_price(-100));
        assert_eq!(total_price(5000, &c), 6000);
        assert_eq!(price_breakdown(5000, &c).total, 6000);
    }

    #[test]
    fn test_missing_and_declined_are_free() {
        let mut c = Configuration::new(ProductCategory::Shirt);
        c.select("back".into(), StyleOption::new("b1", "Box Pleat").with_price(250));
        assert_eq!(total_price(1000, &c), 1250);
        c.decline("back".into()).unwrap();
        assert_eq!(total_price(1000, &c), 1000);
        assert!(price_breakdown(1000, &c).lines.is_empty());
    }

    #[test]
    fn test_extreme_prices_saturate() {
        let mut c = Configuration::new(ProductCategory::Suit);
        let mut fabric = FabricOption::new("f1", "Vicuna");
        fabric.price_modifier = Some(1);
        c.set_fabric(fabric, None).unwrap();
        c.select("lining".into(), StyleOption::new("l1", "Silk").with_price(i64::MAX));
        assert_eq!(total_price(i64::MAX, &c), i64::MAX);
        assert_eq!(price_breakdown(i64::MAX, &c).total, i64::MAX);
        c.select("lining".into(), StyleOption::new("l2", "Rebate").with_price(i64::MIN));
        assert_eq!(total_price(0, &c), i64::MIN + 1);
    }
}
