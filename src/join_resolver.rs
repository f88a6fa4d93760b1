//! Join Resolver
//!
//! Attaches dimension attributes to fact-derived frames. All joins are left
//! joins on surrogate keys: a row without a dimension match keeps its own
//! columns and gets nulls for the dimension attributes. Category joins fan
//! out, one output row per (fact row, category) pair.

use crate::error::Result;
use crate::schema::{customer, fact, film, store};
use polars::prelude::*;
use tracing::{debug, warn};

/// Set to `true` on rows that found their customer
pub const CUSTOMER_MATCHED: &str = "customer_matched";

/// Set to `true` on rows that found their store
pub const STORE_MATCHED: &str = "store_matched";

pub struct JoinResolver;

impl JoinResolver {
    /// Left join customer id and name parts on `customer_key`.
    pub fn attach_customers(&self, left: DataFrame, customers: &DataFrame) -> Result<DataFrame> {
        let lookup = customers
            .clone()
            .lazy()
            .select([
                col(customer::CUSTOMER_KEY),
                col(customer::CUSTOMER_ID),
                col(customer::FIRST_NAME),
                col(customer::LAST_NAME),
            ])
            .with_column(lit(true).alias(CUSTOMER_MATCHED));

        let joined = left
            .lazy()
            .left_join(lookup, col(fact::CUSTOMER_KEY), col(customer::CUSTOMER_KEY))
            .collect()?;

        log_unmatched(&joined, CUSTOMER_MATCHED, "customer")?;
        Ok(joined)
    }

    /// Left join store id and manager name parts on `store_key`.
    pub fn attach_stores(&self, left: DataFrame, stores: &DataFrame) -> Result<DataFrame> {
        let lookup = stores
            .clone()
            .lazy()
            .select([
                col(store::STORE_KEY),
                col(store::STORE_ID),
                col(store::MANAGER_FIRST_NAME),
                col(store::MANAGER_LAST_NAME),
            ])
            .with_column(lit(true).alias(STORE_MATCHED));

        let joined = left
            .lazy()
            .left_join(lookup, col(fact::STORE_KEY), col(store::STORE_KEY))
            .collect()?;

        log_unmatched(&joined, STORE_MATCHED, "store")?;
        Ok(joined)
    }

    /// Fan-out left join of facts against the `(film_key, category)` relation.
    ///
    /// A film in two categories yields two rows carrying the same measures; a
    /// film in none yields one row with a null `category`.
    pub fn attach_categories(&self, facts: &DataFrame, film_categories: &DataFrame) -> Result<DataFrame> {
        let joined = facts
            .clone()
            .lazy()
            .left_join(
                film_categories.clone().lazy(),
                col(fact::FILM_KEY),
                col(film::FILM_KEY),
            )
            .collect()?;

        debug!(
            "Category fan-out join: {} fact rows -> {} rows",
            facts.height(),
            joined.height()
        );
        Ok(joined)
    }
}

fn log_unmatched(joined: &DataFrame, marker: &str, dimension: &str) -> Result<()> {
    let unmatched = joined.column(marker)?.null_count();
    if unmatched > 0 {
        warn!("{} rows have no {} dimension match", unmatched, dimension);
    }
    Ok(())
}

/// `first + " " + last` with missing parts as empty strings, trimmed.
pub fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{i64_values, str_values};

    #[test]
    fn test_full_name() {
        assert_eq!(full_name(Some("MARY"), Some("SMITH")), "MARY SMITH");
        assert_eq!(full_name(Some("MARY"), None), "MARY");
        assert_eq!(full_name(None, Some("SMITH")), "SMITH");
        assert_eq!(full_name(None, None), "");
        assert_eq!(full_name(Some("  Ann "), Some("")), "Ann");
    }

    #[test]
    fn test_customer_join_keeps_unmatched_rows() {
        let grouped = df![
            "customer_key" => [1i64, 7],
            "revenue" => [5.0f64, 3.0]
        ]
        .unwrap();
        let customers = df![
            "customer_key" => [1i64, 2],
            "customer_id" => [101i64, 102],
            "first_name" => ["MARY", "PATRICIA"],
            "last_name" => ["SMITH", "JOHNSON"]
        ]
        .unwrap();

        let joined = JoinResolver.attach_customers(grouped, &customers).unwrap();
        assert_eq!(joined.height(), 2);
        assert_eq!(i64_values(&joined, "customer_key").unwrap(), vec![Some(1), Some(7)]);
        assert_eq!(
            str_values(&joined, "first_name").unwrap(),
            vec![Some("MARY".to_string()), None]
        );
        assert_eq!(joined.column(CUSTOMER_MATCHED).unwrap().null_count(), 1);
    }

    #[test]
    fn test_category_join_fans_out() {
        let facts = df![
            "rental_id" => [1i64, 2, 3],
            "film_key" => [10i64, 20, 30],
            "payment_amount" => [4.0f64, 5.0, 6.0]
        ]
        .unwrap();
        let relation = df![
            "film_key" => [10i64, 10, 20],
            "category" => ["Action", "Comedy", "Drama"]
        ]
        .unwrap();

        let joined = JoinResolver.attach_categories(&facts, &relation).unwrap();
        assert_eq!(joined.height(), 4);
        assert_eq!(joined.column("category").unwrap().null_count(), 1);

        let rental_ids = i64_values(&joined, "rental_id").unwrap();
        assert_eq!(rental_ids.iter().filter(|id| **id == Some(1)).count(), 2);
    }
}
