use chrono::NaiveDate;
use rental_insights::loader::{load_tables, table_path};
use rental_insights::{AnalyticsConfig, Dashboard, FilterParams, RentalError, Section, SectionResult};
use std::error::Error;
use std::fs;
use std::path::Path;

fn write_export(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::write(
        table_path(dir, "fact_rental"),
        "RENTAL_ID,CUSTOMER_KEY,STAFF_KEY,FILM_KEY,STORE_KEY,INVENTORY_ID,RENTAL_DATE_KEY,RETURN_DATE_KEY,COUNT_RENTALS,COUNT_RETURNS,RENTAL_DURATION,PAYMENT_AMOUNT\n\
         1,1,1,10,1,100,20050524,20050526,1,1,2,2.99\n\
         2,2,1,20,1,101,20050525,,1,0,,4.99\n\
         3,1,2,10,2,102,20050601,20050605,1,1,4,0.99\n",
    )?;
    fs::write(
        table_path(dir, "dim_customer"),
        "customer_key,customer_id,first_name,last_name\n1,1,MARY,SMITH\n2,2,PATRICIA,JOHNSON\n",
    )?;
    fs::write(
        table_path(dir, "dim_store"),
        "store_key,store_id,manager_first_name,manager_last_name\n1,1,Mike,Hillyer\n2,2,Jon,Stephens\n",
    )?;
    fs::write(
        table_path(dir, "dim_film"),
        "film_key,title,film_in_category_action,film_in_category_sci_fi\n10,ALIEN CENTER,0,1\n20,ACE GOLDFINGER,1,1\n",
    )?;
    fs::write(
        table_path(dir, "dim_date"),
        "date_key,date\n20050524,2005-05-24\n20050525,2005-05-25\n20050601,2005-06-01\n",
    )?;
    Ok(())
}

#[test]
fn test_load_export_and_run_dashboard() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    write_export(dir.path())?;

    let tables = load_tables(dir.path(), &AnalyticsConfig::default())?;
    assert_eq!(tables.fact().height(), 3);
    assert_eq!(tables.store_choices()?, vec![1, 2]);

    let categories: Vec<&str> = tables
        .categories()
        .fields()
        .iter()
        .map(|f| f.category.as_str())
        .collect();
    assert_eq!(categories, vec!["Action", "Sci_Fi"]);

    let bounds = tables.date_bounds().expect("date bounds");
    assert_eq!(bounds.min, NaiveDate::from_ymd_opt(2005, 5, 24).unwrap());
    assert_eq!(bounds.max, NaiveDate::from_ymd_opt(2005, 6, 1).unwrap());

    let params = FilterParams::new(bounds.min, bounds.max)?.with_sections(Section::ALL);
    let report = Dashboard::default().run(&tables, &params)?;
    assert_eq!(report.filtered_rows, 3);

    match report.outcome(Section::DurationByCategory).and_then(|o| o.result()) {
        Some(SectionResult::DurationByCategory(durations)) => {
            let rows: Vec<(&str, f64)> = durations
                .rows
                .iter()
                .map(|r| (r.film_category.as_str(), r.avg_rental_duration))
                .collect();
            // Rental 2 has no duration and is left out of both averages
            assert_eq!(rows, vec![("Sci_Fi", 3.0)]);
        }
        other => panic!("expected durations, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_table_is_io_error() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    write_export(dir.path())?;
    fs::remove_file(table_path(dir.path(), "dim_store"))?;

    let err = load_tables(dir.path(), &AnalyticsConfig::default()).unwrap_err();
    assert!(matches!(err, RentalError::Io(_)));
    Ok(())
}
