use crate::error::RentalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The analytical views the dashboard can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    TopCustomers,
    MonthlyCategory,
    StorePerformance,
    Inventory,
    DurationByCategory,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::TopCustomers,
        Section::MonthlyCategory,
        Section::StorePerformance,
        Section::Inventory,
        Section::DurationByCategory,
    ];

    /// Shown when a request names no sections
    pub const DEFAULT_SELECTION: [Section; 3] = [
        Section::TopCustomers,
        Section::MonthlyCategory,
        Section::StorePerformance,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::TopCustomers => "top-customers",
            Section::MonthlyCategory => "monthly-category",
            Section::StorePerformance => "store-performance",
            Section::Inventory => "inventory",
            Section::DurationByCategory => "duration-by-category",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::TopCustomers => "Top 10 Customers by Rental Revenue",
            Section::MonthlyCategory => "Monthly Revenue Trend by Film Category",
            Section::StorePerformance => "Store Performance (Revenue, Rentals, Avg Ticket)",
            Section::Inventory => "Inventory Utilization (Rentals per Inventory Item)",
            Section::DurationByCategory => "Average Rental Duration by Film Category",
        }
    }

    /// Whether the section needs the normalized category relation.
    pub fn needs_categories(self) -> bool {
        matches!(self, Section::MonthlyCategory | Section::DurationByCategory)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RentalError::UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        for section in Section::ALL {
            assert_eq!(section.id().parse::<Section>().unwrap(), section);
        }
        assert_eq!(" Inventory ".parse::<Section>().unwrap(), Section::Inventory);
        assert!(matches!(
            "charts".parse::<Section>(),
            Err(RentalError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Section::DurationByCategory).unwrap();
        assert_eq!(json, "\"duration-by-category\"");
    }
}
