//! Result Formatter
//!
//! Final ordering, truncation and labelling of section rows. Every sort here
//! is stable, so rows that tie keep the order the aggregation produced them
//! in (first appearance of the group in the filtered facts).

use crate::report::{
    CategoryDurationRow, CategoryTrend, InventoryRow, MonthlyCategoryRow, StorePerformanceRow,
    StoreSummary, TopCustomerRow,
};
use itertools::Itertools;
use std::cmp::Ordering;

pub struct ResultFormatter;

impl ResultFormatter {
    /// Highest revenue first, at most `limit` rows.
    pub fn top_customers(&self, mut rows: Vec<TopCustomerRow>, limit: usize) -> Vec<TopCustomerRow> {
        rows.sort_by(|a, b| descending(a.total_revenue, b.total_revenue));
        rows.truncate(limit);
        rows
    }

    /// Month ascending, then revenue descending within a month.
    pub fn monthly_category(&self, mut rows: Vec<MonthlyCategoryRow>) -> Vec<MonthlyCategoryRow> {
        rows.sort_by(|a, b| {
            a.rental_month
                .cmp(&b.rental_month)
                .then_with(|| descending(a.revenue, b.revenue))
        });
        rows
    }

    /// Month x category grid of the long table. Months ascending, categories
    /// alphabetical, 0.0 where a category had no revenue that month.
    pub fn category_trend(&self, rows: &[MonthlyCategoryRow]) -> CategoryTrend {
        let months: Vec<_> = rows.iter().map(|r| r.rental_month).sorted().dedup().collect();
        let categories: Vec<String> = rows
            .iter()
            .map(|r| r.film_category.clone())
            .sorted()
            .dedup()
            .collect();

        let mut revenue = vec![vec![0.0; categories.len()]; months.len()];
        for row in rows {
            let m = months.binary_search(&row.rental_month);
            let c = categories.binary_search(&row.film_category);
            if let (Ok(m), Ok(c)) = (m, c) {
                revenue[m][c] += row.revenue;
            }
        }

        CategoryTrend {
            months,
            categories,
            revenue,
        }
    }

    /// Highest revenue first.
    pub fn store_performance(&self, mut rows: Vec<StorePerformanceRow>) -> Vec<StorePerformanceRow> {
        rows.sort_by(|a, b| descending(a.revenue, b.revenue));
        rows
    }

    /// Headline metrics over the per-store rows.
    pub fn store_summary(&self, rows: &[StorePerformanceRow]) -> StoreSummary {
        let total_revenue = rows.iter().map(|r| r.revenue).sum();
        let total_rentals = rows.iter().map(|r| r.rentals).sum();
        let tickets: Vec<f64> = rows.iter().filter_map(|r| r.avg_ticket).collect();
        let avg_ticket_overall = if tickets.is_empty() {
            None
        } else {
            Some(tickets.iter().sum::<f64>() / tickets.len() as f64)
        };

        StoreSummary {
            total_revenue,
            total_rentals,
            avg_ticket_overall,
        }
    }

    /// Most rented items first, at most `limit` rows.
    pub fn top_inventory(&self, rows: &[InventoryRow], limit: usize) -> Vec<InventoryRow> {
        let mut top = rows.to_vec();
        top.sort_by(|a, b| b.rentals.cmp(&a.rentals));
        top.truncate(limit);
        top
    }

    /// Longest average duration first.
    pub fn duration_by_category(&self, mut rows: Vec<CategoryDurationRow>) -> Vec<CategoryDurationRow> {
        rows.sort_by(|a, b| descending(a.avg_rental_duration, b.avg_rental_duration));
        rows
    }
}

/// Display name of a customer: "FIRST LAST" when the dimension matched and
/// the name is not blank, otherwise the surrogate key.
pub fn customer_name(customer_key: i64, matched: bool, full_name: &str) -> String {
    if matched && !full_name.is_empty() {
        full_name.to_string()
    } else {
        customer_key.to_string()
    }
}

/// Display label of a store: "Store {id} ({manager})", trimmed. Falls back to
/// the surrogate key when the store has no dimension row or no id.
pub fn store_label(store_key: i64, store_id: Option<i64>, matched: bool, manager: &str) -> String {
    match store_id {
        Some(id) if matched => format!("Store {} ({})", id, manager).trim().to_string(),
        _ => store_key.to_string(),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer(key: i64, revenue: f64) -> TopCustomerRow {
        TopCustomerRow {
            customer_key: key,
            customer_id: Some(key),
            customer_name: key.to_string(),
            total_revenue: revenue,
        }
    }

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2005, m, 1).unwrap()
    }

    fn monthly(m: u32, category: &str, revenue: f64) -> MonthlyCategoryRow {
        MonthlyCategoryRow {
            rental_month: month(m),
            film_category: category.to_string(),
            revenue,
        }
    }

    #[test]
    fn test_top_customers_ties_keep_input_order() {
        let rows = vec![customer(1, 5.0), customer(2, 9.0), customer(3, 5.0), customer(4, 1.0)];
        let top = ResultFormatter.top_customers(rows, 3);

        let keys: Vec<i64> = top.iter().map(|r| r.customer_key).collect();
        assert_eq!(keys, vec![2, 1, 3]);
    }

    #[test]
    fn test_monthly_order_and_trend() {
        let rows = vec![
            monthly(6, "Action", 2.0),
            monthly(5, "Comedy", 1.0),
            monthly(6, "Comedy", 7.0),
            monthly(5, "Action", 3.0),
        ];
        let sorted = ResultFormatter.monthly_category(rows);
        let order: Vec<(u32, &str)> = sorted
            .iter()
            .map(|r| (chrono::Datelike::month(&r.rental_month), r.film_category.as_str()))
            .collect();
        assert_eq!(order, vec![(5, "Action"), (5, "Comedy"), (6, "Comedy"), (6, "Action")]);

        let trend = ResultFormatter.category_trend(&[monthly(5, "Drama", 4.0), monthly(6, "Action", 2.0)]);
        assert_eq!(trend.months, vec![month(5), month(6)]);
        assert_eq!(trend.categories, vec!["Action".to_string(), "Drama".to_string()]);
        assert_eq!(trend.value(month(5), "Action"), Some(0.0));
        assert_eq!(trend.value(month(5), "Drama"), Some(4.0));
        assert_eq!(trend.value(month(6), "Drama"), Some(0.0));
    }

    #[test]
    fn test_store_summary_skips_missing_tickets() {
        let row = |key: i64, revenue: f64, rentals: i64, avg_ticket: Option<f64>| StorePerformanceRow {
            store_key: key,
            store_id: Some(key),
            store_label: key.to_string(),
            revenue,
            rentals,
            txns: 1,
            avg_ticket,
        };
        let summary = ResultFormatter.store_summary(&[row(1, 10.0, 2, Some(5.0)), row(2, 0.0, 0, None), row(3, 6.0, 1, Some(3.0))]);
        assert_eq!(summary.total_revenue, 16.0);
        assert_eq!(summary.total_rentals, 3);
        assert_eq!(summary.avg_ticket_overall, Some(4.0));

        assert_eq!(ResultFormatter.store_summary(&[]).avg_ticket_overall, None);
    }

    #[test]
    fn test_labels_and_fallbacks() {
        assert_eq!(store_label(1, Some(1), true, "Mike Hillyer"), "Store 1 (Mike Hillyer)");
        assert_eq!(store_label(9, None, false, ""), "9");
        assert_eq!(customer_name(5, true, "MARY SMITH"), "MARY SMITH");
        assert_eq!(customer_name(5, true, ""), "5");
        assert_eq!(customer_name(7, false, ""), "7");
    }

    #[test]
    fn test_top_inventory_stable() {
        let rows = vec![
            InventoryRow { inventory_id: 1, rentals: 2 },
            InventoryRow { inventory_id: 2, rentals: 5 },
            InventoryRow { inventory_id: 3, rentals: 2 },
        ];
        let top = ResultFormatter.top_inventory(&rows, 2);
        assert_eq!(top.iter().map(|r| r.inventory_id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
