use std::collections::BTreeMap;

use serde::Serialize;

use super::dimensions::round2;
use super::domain::SupplierRecord;

/// Bucket name for suppliers filed without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Supply risk tiers, declared from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }

    /// First matching rule wins.
    pub fn classify(supplier_count: usize, average_score: Option<f64>) -> Self {
        let single_source = supplier_count <= 1;
        match average_score {
            None if single_source => RiskLevel::Critical,
            Some(avg) if single_source && avg < 40.0 => RiskLevel::Critical,
            Some(avg) if avg < 60.0 => RiskLevel::High,
            _ if single_source => RiskLevel::High,
            Some(avg) if avg < 75.0 => RiskLevel::Medium,
            None if supplier_count <= 2 => RiskLevel::High,
            _ => RiskLevel::Low,
        }
    }
}

/// Supply risk summary for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRisk {
    pub category: String,
    pub supplier_count: usize,
    pub scored_supplier_count: usize,
    pub average_score: Option<f64>,
    pub single_supplier_risk: bool,
    pub expiring_documents: usize,
    pub risk_level: RiskLevel,
}

/// Groups suppliers by category and classifies each group.
///
/// `expiring_documents` is only consulted for real categories; the
/// uncategorized bucket always reports zero. A category literally named
/// [`UNCATEGORIZED`] is reserved and folded into that bucket.
///
/// Levels are classified on the exact mean; only the reported average is
/// rounded.
pub fn build_risk_map<F, E>(
    rows: &[(SupplierRecord, Option<f64>)],
    mut expiring_documents: F,
) -> Result<Vec<CategoryRisk>, E>
where
    F: FnMut(&str) -> Result<usize, E>,
{
    let mut groups: BTreeMap<Option<&str>, Vec<Option<f64>>> = BTreeMap::new();
    for (supplier, composite) in rows {
        let category = supplier
            .category()
            .filter(|name| !name.eq_ignore_ascii_case(UNCATEGORIZED));
        groups.entry(category).or_default().push(*composite);
    }

    let mut categories = Vec::with_capacity(groups.len());
    for (category, composites) in groups {
        let supplier_count = composites.len();
        let scored: Vec<f64> = composites.into_iter().flatten().collect();
        let mean = (!scored.is_empty()).then(|| scored.iter().sum::<f64>() / scored.len() as f64);
        let expiring = match category {
            Some(name) => expiring_documents(name)?,
            None => 0,
        };

        categories.push(CategoryRisk {
            category: category.unwrap_or(UNCATEGORIZED).to_string(),
            supplier_count,
            scored_supplier_count: scored.len(),
            average_score: mean.map(round2),
            single_supplier_risk: supplier_count <= 1,
            expiring_documents: expiring,
            risk_level: RiskLevel::classify(supplier_count, mean),
        });
    }

    categories.sort_by(|left, right| {
        left.risk_level
            .cmp(&right.risk_level)
            .then_with(|| left.category.cmp(&right.category))
    });
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{SupplierId, TenantId};
    use std::convert::Infallible;

    fn supplier(id: &str, category: Option<&str>) -> SupplierRecord {
        SupplierRecord {
            id: SupplierId::new(id),
            tenant_id: TenantId::new("acme"),
            business_name: format!("Supplier {id}"),
            category: category.map(str::to_string),
            active: true,
        }
    }

    fn no_documents(_: &str) -> Result<usize, Infallible> {
        Ok(0)
    }

    #[test]
    fn decision_table_matches_thresholds() {
        assert_eq!(RiskLevel::classify(1, None), RiskLevel::Critical);
        assert_eq!(RiskLevel::classify(0, None), RiskLevel::Critical);
        assert_eq!(RiskLevel::classify(1, Some(39.99)), RiskLevel::Critical);
        assert_eq!(RiskLevel::classify(1, Some(40.0)), RiskLevel::High);
        assert_eq!(RiskLevel::classify(1, Some(95.0)), RiskLevel::High);
        assert_eq!(RiskLevel::classify(5, Some(59.9)), RiskLevel::High);
        assert_eq!(RiskLevel::classify(5, Some(60.0)), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(5, Some(74.99)), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(2, None), RiskLevel::High);
        assert_eq!(RiskLevel::classify(3, None), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(3, Some(75.0)), RiskLevel::Low);
    }

    #[test]
    fn ittico_with_two_strong_scores_is_low_risk() {
        let rows = vec![
            (supplier("a", Some("Ittico")), Some(85.0)),
            (supplier("b", Some("Ittico")), Some(90.0)),
            (supplier("c", Some("Ittico")), None),
        ];

        let map = build_risk_map(&rows, no_documents).expect("risk map builds");
        assert_eq!(map.len(), 1);
        let ittico = &map[0];
        assert_eq!(ittico.category, "Ittico");
        assert_eq!(ittico.supplier_count, 3);
        assert_eq!(ittico.scored_supplier_count, 2);
        assert_eq!(ittico.average_score, Some(87.5));
        assert!(!ittico.single_supplier_risk);
        assert_eq!(ittico.risk_level, RiskLevel::Low);
    }

    #[test]
    fn categories_sort_by_severity_and_uncategorized_skips_document_lookup() {
        let rows = vec![
            (supplier("a", Some("Carni")), Some(70.0)),
            (supplier("b", Some("Carni")), Some(60.0)),
            (supplier("c", Some("Latticini")), None),
            (supplier("d", None), Some(90.0)),
            (supplier("e", None), Some(88.0)),
        ];

        let mut looked_up = Vec::new();
        let map = build_risk_map(&rows, |category: &str| {
            looked_up.push(category.to_string());
            Ok::<_, Infallible>(2)
        })
        .expect("risk map builds");

        let order: Vec<_> = map
            .iter()
            .map(|risk| (risk.category.as_str(), risk.risk_level))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Latticini", RiskLevel::Critical),
                ("Carni", RiskLevel::Medium),
                (UNCATEGORIZED, RiskLevel::Low),
            ]
        );
        assert_eq!(looked_up, vec!["Carni".to_string(), "Latticini".to_string()]);
        assert_eq!(map[2].expiring_documents, 0);
        assert_eq!(map[0].expiring_documents, 2);
    }

    #[test]
    fn level_uses_exact_mean_below_threshold() {
        let rows = vec![
            (supplier("a", Some("Carni")), Some(59.99)),
            (supplier("b", Some("Carni")), Some(60.0)),
            (supplier("c", Some("Carni")), Some(60.0)),
        ];

        let map = build_risk_map(&rows, no_documents).expect("risk map builds");
        assert_eq!(map[0].average_score, Some(60.0));
        assert_eq!(map[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn category_named_uncategorized_joins_the_bucket() {
        let rows = vec![
            (supplier("a", Some("Uncategorized")), Some(80.0)),
            (supplier("b", None), Some(90.0)),
        ];

        let mut looked_up = Vec::new();
        let map = build_risk_map(&rows, |category: &str| {
            looked_up.push(category.to_string());
            Ok::<_, Infallible>(1)
        })
        .expect("risk map builds");

        assert_eq!(map.len(), 1);
        assert_eq!(map[0].category, UNCATEGORIZED);
        assert_eq!(map[0].supplier_count, 2);
        assert_eq!(map[0].expiring_documents, 0);
        assert!(looked_up.is_empty());
    }
}
