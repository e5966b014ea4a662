use crate::cli::ScoringOverrides;
use crate::infra::{parse_date, parse_sort_key, score_cell, service_as_of, start_of_day, today};
use chrono::{Duration, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use supplier_scoring::config::AppConfig;
use supplier_scoring::error::AppError;
use supplier_scoring::scoring::{
    CatalogPrice, CategoryRisk, DeliveryReceipt, FactImporter, InMemoryScoringService,
    InMemorySupplierData, OrderId, OrderStatus, ProductId, PurchaseOrder, RankedEntry,
    ReceiptLine, ReceiptStatus, ScoringConfig, SortKey, SupplierDocument, SupplierId,
    SupplierRecord, TenantId,
};

pub(crate) const DEMO_TENANT: &str = "demo-restaurants";

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Directory holding suppliers.csv and the optional fact exports
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// Tenant whose suppliers are scored
    #[arg(long)]
    pub(crate) tenant: String,
    /// Restrict the ranking to one category
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// composite, punctuality, conformity, price-competitiveness or reliability
    #[arg(long, value_parser = parse_sort_key)]
    pub(crate) sort_by: Option<SortKey>,
    /// Evaluation date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Order the ranking by a single dimension
    #[arg(long, value_parser = parse_sort_key)]
    pub(crate) sort_by: Option<SortKey>,
}

pub(crate) fn run_ranking_report(args: ReportArgs) -> Result<(), AppError> {
    let service = report_service(&args)?;
    let tenant = TenantId::new(args.tenant.as_str());
    service.recalculate_all(&tenant)?;

    let ranking = service.get_ranking(&tenant, args.category.as_deref(), args.sort_by)?;
    if args.json {
        print_json(&ranking)
    } else {
        render_ranking(&ranking, args.sort_by.unwrap_or_default());
        Ok(())
    }
}

pub(crate) fn run_risk_report(args: ReportArgs) -> Result<(), AppError> {
    let service = report_service(&args)?;
    let tenant = TenantId::new(args.tenant.as_str());
    service.recalculate_all(&tenant)?;

    let risk_map = service.get_risk_map(&tenant)?;
    if args.json {
        print_json(&risk_map)
    } else {
        render_risk_map(&risk_map);
        Ok(())
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(today);
    let service = service_as_of(demo_dataset(as_of), ScoringConfig::default(), Some(as_of));
    let tenant = TenantId::new(DEMO_TENANT);

    println!("Supplier scoring demo ({DEMO_TENANT}, as of {as_of})");
    let report = service.recalculate_all(&tenant)?;
    println!(
        "Recalculated {} suppliers ({} failures)",
        report.suppliers_processed,
        report.failures.len()
    );

    let sort_key = args.sort_by.unwrap_or_default();
    let ranking = service.get_ranking(&tenant, None, Some(sort_key))?;
    println!();
    render_ranking(&ranking, sort_key);

    let risk_map = service.get_risk_map(&tenant)?;
    println!();
    render_risk_map(&risk_map);
    Ok(())
}

fn report_service(args: &ReportArgs) -> Result<InMemoryScoringService, AppError> {
    let mut config = AppConfig::load()?.scoring;
    args.scoring.apply(&mut config);
    let data = FactImporter::from_dir(&args.data_dir)?;
    Ok(service_as_of(data, config, args.as_of))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

fn render_ranking(ranking: &[RankedEntry], sort_key: SortKey) {
    println!("Supplier ranking by {sort_key}");
    println!(
        "{:<4} {:<28} {:<14} {:>8} {:>8} {:>8} {:>8} {:>10}",
        "#", "Supplier", "Category", "Punct.", "Conf.", "Price", "Reliab.", "Composite"
    );
    for entry in ranking {
        println!(
            "{:<4} {:<28} {:<14} {:>8} {:>8} {:>8} {:>8} {:>10}",
            entry.rank,
            entry.business_name,
            entry.category.as_deref().unwrap_or("-"),
            score_cell(entry.punctuality),
            score_cell(entry.conformity),
            score_cell(entry.price_competitiveness),
            score_cell(entry.reliability),
            score_cell(entry.composite_score),
        );
    }
}

fn render_risk_map(risk_map: &[CategoryRisk]) {
    println!("Category risk map");
    for category in risk_map {
        println!(
            "- {} [{}] {} suppliers ({} scored) | avg {} | {} expiring documents{}",
            category.category,
            category.risk_level.label(),
            category.supplier_count,
            category.scored_supplier_count,
            score_cell(category.average_score),
            category.expiring_documents,
            if category.single_supplier_risk {
                " | single source"
            } else {
                ""
            }
        );
    }
}

struct DemoSupplier {
    id: &'static str,
    name: &'static str,
    category: Option<&'static str>,
    deliveries: i64,
    late: i64,
    rejected: i64,
    open_orders: i64,
    prices: &'static [(&'static str, f64)],
    document_expires_in: Option<i64>,
}

const DEMO_SUPPLIERS: &[DemoSupplier] = &[
    DemoSupplier {
        id: "pescheria-adriatica",
        name: "Pescheria Adriatica",
        category: Some("Ittico"),
        deliveries: 12,
        late: 1,
        rejected: 0,
        open_orders: 1,
        prices: &[("orata", 14.5), ("branzino", 18.0)],
        document_expires_in: None,
    },
    DemoSupplier {
        id: "mare-nostrum",
        name: "Mare Nostrum",
        category: Some("Ittico"),
        deliveries: 8,
        late: 3,
        rejected: 1,
        open_orders: 2,
        prices: &[("orata", 16.0), ("branzino", 17.0)],
        document_expires_in: Some(60),
    },
    DemoSupplier {
        id: "caseificio-alpino",
        name: "Caseificio Alpino",
        category: Some("Latticini"),
        deliveries: 6,
        late: 0,
        rejected: 0,
        open_orders: 0,
        prices: &[("mozzarella", 9.0)],
        document_expires_in: Some(12),
    },
    DemoSupplier {
        id: "ortofrutta-verdi",
        name: "Ortofrutta Verdi",
        category: Some("Ortofrutta"),
        deliveries: 5,
        late: 2,
        rejected: 2,
        open_orders: 1,
        prices: &[("pomodori", 2.2), ("basilico", 1.1)],
        document_expires_in: None,
    },
    DemoSupplier {
        id: "ortofrutta-sole",
        name: "Ortofrutta del Sole",
        category: Some("Ortofrutta"),
        deliveries: 0,
        late: 0,
        rejected: 0,
        open_orders: 0,
        prices: &[("pomodori", 2.6)],
        document_expires_in: None,
    },
    DemoSupplier {
        id: "macelleria-rossi",
        name: "Macelleria Rossi",
        category: Some("Carni"),
        deliveries: 4,
        late: 2,
        rejected: 3,
        open_orders: 2,
        prices: &[("manzo", 22.0)],
        document_expires_in: Some(20),
    },
    DemoSupplier {
        id: "forniture-varie",
        name: "Forniture Varie",
        category: None,
        deliveries: 2,
        late: 0,
        rejected: 0,
        open_orders: 1,
        prices: &[],
        document_expires_in: None,
    },
];

/// Restaurant group with deliveries spread over the three months before `as_of`.
pub(crate) fn demo_dataset(as_of: NaiveDate) -> InMemorySupplierData {
    let now = start_of_day(as_of) + Duration::hours(12);
    let tenant = TenantId::new(DEMO_TENANT);
    let data = InMemorySupplierData::default();

    for profile in DEMO_SUPPLIERS {
        let supplier_id = SupplierId::new(profile.id);
        data.add_supplier(SupplierRecord {
            id: supplier_id.clone(),
            tenant_id: tenant.clone(),
            business_name: profile.name.to_string(),
            category: profile.category.map(str::to_string),
            active: true,
        });

        for idx in 0..profile.deliveries {
            let received_at = now - Duration::days(idx * 7 + 2);
            let delay = if idx < profile.late { 2 } else { 0 };
            let expected = received_at.date_naive() - Duration::days(delay);
            let order_id = OrderId::new(format!("{}-po-{idx}", profile.id));

            data.add_order(PurchaseOrder {
                id: order_id.clone(),
                tenant_id: tenant.clone(),
                supplier_id: supplier_id.clone(),
                status: OrderStatus::Received,
                placed_at: received_at - Duration::days(3),
                expected_delivery: Some(expected),
            });
            data.add_receipt(DeliveryReceipt {
                id: format!("{}-rcv-{idx}", profile.id),
                tenant_id: tenant.clone(),
                supplier_id: supplier_id.clone(),
                order_id,
                status: ReceiptStatus::Completed,
                received_at,
                expected_delivery: Some(expected),
                lines: demo_lines(profile, idx),
            });
        }

        for idx in 0..profile.open_orders {
            data.add_order(PurchaseOrder {
                id: OrderId::new(format!("{}-open-{idx}", profile.id)),
                tenant_id: tenant.clone(),
                supplier_id: supplier_id.clone(),
                status: OrderStatus::Sent,
                placed_at: now - Duration::days(idx + 1),
                expected_delivery: Some(now.date_naive() + Duration::days(2)),
            });
        }

        for (product, unit_price) in profile.prices {
            data.add_price(CatalogPrice {
                tenant_id: tenant.clone(),
                supplier_id: supplier_id.clone(),
                product_id: ProductId::new(*product),
                unit_price: *unit_price,
                active: true,
            });
        }

        if let Some(days) = profile.document_expires_in {
            data.add_document(SupplierDocument {
                tenant_id: tenant.clone(),
                supplier_id: supplier_id.clone(),
                name: "HACCP certificate".to_string(),
                expires_on: as_of + Duration::days(days),
            });
        }
    }

    data
}

fn demo_lines(profile: &DemoSupplier, delivery: i64) -> Vec<ReceiptLine> {
    let product = profile
        .prices
        .first()
        .map(|(product, _)| *product)
        .unwrap_or("misc");
    vec![
        ReceiptLine {
            product_id: ProductId::new(product),
            conforming: true,
        },
        ReceiptLine {
            product_id: ProductId::new(product),
            conforming: delivery >= profile.rejected,
        },
    ]
}
