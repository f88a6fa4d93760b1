//! Section results
//!
//! Typed result tables handed to the presentation side. Each can also be
//! rendered back into a `DataFrame` with the upper-case column names the
//! dashboard displays.

use crate::error::Result;
use crate::filter::FilterParams;
use crate::section::Section;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub mod columns {
    pub const CUSTOMER_KEY: &str = "CUSTOMER_KEY";
    pub const CUSTOMER_ID: &str = "CUSTOMER_ID";
    pub const CUSTOMER_NAME: &str = "CUSTOMER_NAME";
    pub const TOTAL_REVENUE: &str = "TOTAL_REVENUE";
    pub const RENTAL_MONTH: &str = "RENTAL_MONTH";
    pub const FILM_CATEGORY: &str = "FILM_CATEGORY";
    pub const REVENUE: &str = "REVENUE";
    pub const STORE_KEY: &str = "STORE_KEY";
    pub const STORE_ID: &str = "STORE_ID";
    pub const STORE_LABEL: &str = "STORE_LABEL";
    pub const RENTALS: &str = "RENTALS";
    pub const TXNS: &str = "TXNS";
    pub const AVG_TICKET: &str = "AVG_TICKET";
    pub const INVENTORY_ID: &str = "INVENTORY_ID";
    pub const ITEMS: &str = "ITEMS";
    pub const AVG_RENTAL_DURATION: &str = "AVG_RENTAL_DURATION";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomerRow {
    pub customer_key: i64,
    pub customer_id: Option<i64>,
    pub customer_name: String,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomers {
    pub rows: Vec<TopCustomerRow>,
}

impl TopCustomers {
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::CUSTOMER_KEY, self.rows.iter().map(|r| r.customer_key).collect::<Vec<_>>()),
            Series::new(columns::CUSTOMER_NAME, self.rows.iter().map(|r| r.customer_name.as_str()).collect::<Vec<_>>()),
            Series::new(columns::TOTAL_REVENUE, self.rows.iter().map(|r| r.total_revenue).collect::<Vec<_>>()),
        ])?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryRow {
    /// First day of the rental month
    pub rental_month: NaiveDate,
    pub film_category: String,
    pub revenue: f64,
}

/// Month x category revenue grid for trend charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub months: Vec<NaiveDate>,
    pub categories: Vec<String>,
    /// `revenue[month][category]`, 0.0 where a month has no sales
    pub revenue: Vec<Vec<f64>>,
}

impl CategoryTrend {
    pub fn value(&self, month: NaiveDate, category: &str) -> Option<f64> {
        let m = self.months.iter().position(|d| *d == month)?;
        let c = self.categories.iter().position(|name| name == category)?;
        self.revenue.get(m).and_then(|row| row.get(c)).copied()
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut series = vec![Series::new(columns::RENTAL_MONTH, self.months.clone())];
        for (c, category) in self.categories.iter().enumerate() {
            let values: Vec<f64> = self.revenue.iter().map(|row| row[c]).collect();
            series.push(Series::new(category, values));
        }
        Ok(DataFrame::new(series)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryRevenue {
    pub rows: Vec<MonthlyCategoryRow>,
    pub trend: CategoryTrend,
}

impl MonthlyCategoryRevenue {
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::RENTAL_MONTH, self.rows.iter().map(|r| r.rental_month).collect::<Vec<_>>()),
            Series::new(columns::FILM_CATEGORY, self.rows.iter().map(|r| r.film_category.as_str()).collect::<Vec<_>>()),
            Series::new(columns::REVENUE, self.rows.iter().map(|r| r.revenue).collect::<Vec<_>>()),
        ])?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformanceRow {
    pub store_key: i64,
    pub store_id: Option<i64>,
    pub store_label: String,
    pub revenue: f64,
    pub rentals: i64,
    pub txns: i64,
    /// `revenue / txns`, absent when there are no transactions
    pub avg_ticket: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub total_revenue: f64,
    pub total_rentals: i64,
    /// Mean of the per-store average tickets that exist
    pub avg_ticket_overall: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformance {
    pub rows: Vec<StorePerformanceRow>,
    pub summary: StoreSummary,
}

impl StorePerformance {
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::STORE_LABEL, self.rows.iter().map(|r| r.store_label.as_str()).collect::<Vec<_>>()),
            Series::new(columns::REVENUE, self.rows.iter().map(|r| r.revenue).collect::<Vec<_>>()),
            Series::new(columns::RENTALS, self.rows.iter().map(|r| r.rentals).collect::<Vec<_>>()),
            Series::new(columns::TXNS, self.rows.iter().map(|r| r.txns).collect::<Vec<_>>()),
            Series::new(columns::AVG_TICKET, self.rows.iter().map(|r| r.avg_ticket).collect::<Vec<_>>()),
        ])?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub inventory_id: i64,
    pub rentals: i64,
}

/// Number of items that were rented exactly `rentals` times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalsBucket {
    pub rentals: i64,
    pub items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUtilization {
    pub item_count: usize,
    pub avg_rentals_per_item: f64,
    /// Ascending by `rentals`
    pub histogram: Vec<RentalsBucket>,
    /// Most rented items first
    pub top_items: Vec<InventoryRow>,
}

impl InventoryUtilization {
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::INVENTORY_ID, self.top_items.iter().map(|r| r.inventory_id).collect::<Vec<_>>()),
            Series::new(columns::RENTALS, self.top_items.iter().map(|r| r.rentals).collect::<Vec<_>>()),
        ])?)
    }

    pub fn histogram_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::RENTALS, self.histogram.iter().map(|b| b.rentals).collect::<Vec<_>>()),
            Series::new(columns::ITEMS, self.histogram.iter().map(|b| b.items as u64).collect::<Vec<_>>()),
        ])?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDurationRow {
    pub film_category: String,
    pub avg_rental_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationByCategory {
    pub rows: Vec<CategoryDurationRow>,
}

impl DurationByCategory {
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new(columns::FILM_CATEGORY, self.rows.iter().map(|r| r.film_category.as_str()).collect::<Vec<_>>()),
            Series::new(
                columns::AVG_RENTAL_DURATION,
                self.rows.iter().map(|r| r.avg_rental_duration).collect::<Vec<_>>(),
            ),
        ])?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionResult {
    TopCustomers(TopCustomers),
    MonthlyCategory(MonthlyCategoryRevenue),
    StorePerformance(StorePerformance),
    Inventory(InventoryUtilization),
    DurationByCategory(DurationByCategory),
}

impl SectionResult {
    pub fn to_frame(&self) -> Result<DataFrame> {
        match self {
            SectionResult::TopCustomers(r) => r.to_frame(),
            SectionResult::MonthlyCategory(r) => r.to_frame(),
            SectionResult::StorePerformance(r) => r.to_frame(),
            SectionResult::Inventory(r) => r.to_frame(),
            SectionResult::DurationByCategory(r) => r.to_frame(),
        }
    }
}

/// Either a result table or an explicit "no data" marker; never an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Data { result: SectionResult },
    NoData { reason: String },
}

impl SectionOutcome {
    pub fn data(result: SectionResult) -> Self {
        SectionOutcome::Data { result }
    }

    pub fn no_data(reason: impl Into<String>) -> Self {
        SectionOutcome::NoData { reason: reason.into() }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SectionOutcome::NoData { .. })
    }

    pub fn result(&self) -> Option<&SectionResult> {
        match self {
            SectionOutcome::Data { result } => Some(result),
            SectionOutcome::NoData { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: Section,
    pub title: String,
    pub outcome: SectionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub params: FilterParams,
    pub filtered_rows: usize,
    pub sections: Vec<SectionReport>,
}

impl DashboardReport {
    pub fn outcome(&self, section: Section) -> Option<&SectionOutcome> {
        self.sections
            .iter()
            .find(|s| s.section == section)
            .map(|s| &s.outcome)
    }
}
