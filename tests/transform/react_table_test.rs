//! Integration tests for the react table widget.
//!
//! These tests run whole result tables through `ReactTable::transform` and
//! check the header tree and row records the grid receives.

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pivotgrid::config::ReactTableSettings;
    use pivotgrid::model::{
        Dimension, DimensionLike, Interval, Metric, Reference, ReferenceDelta, ResultTable, Scalar,
    };
    use pivotgrid::modifier::Rollup;
    use pivotgrid::transform::{
        get_in, AccessorPath, CellValue, ColumnHeader, ReactTable, ReactTableOutput, RowRecord,
    };
    use pivotgrid::TransformError;

    fn sales() -> Metric {
        Metric::new("sales").with_label("Sales")
    }

    fn region() -> Dimension {
        Dimension::new("region").with_label("Region")
    }

    fn month() -> Dimension {
        Dimension::datetime("month", Interval::Monthly).with_label("Month")
    }

    fn sales_by_region_month() -> ResultTable {
        ResultTable::builder()
            .dimensions(["region", "month"])
            .columns(["sales"])
            .row(vec!["EU".into(), "2024-01-01".into()], vec![10.into()])
            .row(vec!["EU".into(), "2024-02-01".into()], vec![20.into()])
            .row(vec!["US".into(), "2024-01-01".into()], vec![30.into()])
            .build()
            .unwrap()
    }

    fn cell<'a>(record: &'a RowRecord, accessor: &str) -> &'a CellValue {
        get_in(record, &AccessorPath::parse(accessor))
            .unwrap_or_else(|| panic!("no cell at {}", accessor))
    }

    fn assert_accessors_agree(output: &ReactTableOutput) {
        for record in &output.data {
            for accessor in output.leaf_accessors() {
                assert!(
                    get_in(record, &AccessorPath::parse(accessor)).is_some(),
                    "row is missing {}",
                    accessor
                );
            }
        }
    }

    // ------------------------------------------------------------------------
    // Pivot
    // ------------------------------------------------------------------------

    #[test]
    fn test_pivot_on_date() {
        let (region, month) = (region(), month());
        let output = ReactTable::new([sales()])
            .pivot(["month"])
            .transform(&sales_by_region_month(), &[&region, &month], &[])
            .unwrap();

        let json = serde_json::to_string_pretty(&output).unwrap();
        assert_snapshot!(json, @r#"
        {
          "columns": [
            {
              "Header": "Region",
              "accessor": "region"
            },
            {
              "Header": "2024-01",
              "columns": [
                {
                  "Header": "Sales",
                  "accessor": "2024-01.sales"
                }
              ]
            },
            {
              "Header": "2024-02",
              "columns": [
                {
                  "Header": "Sales",
                  "accessor": "2024-02.sales"
                }
              ]
            }
          ],
          "data": [
            {
              "region": {
                "raw": "EU"
              },
              "2024-01": {
                "sales": {
                  "raw": 10
                }
              },
              "2024-02": {
                "sales": {
                  "raw": 20
                }
              }
            },
            {
              "region": {
                "raw": "US"
              },
              "2024-01": {
                "sales": {
                  "raw": 30
                }
              },
              "2024-02": {
                "sales": {
                  "raw": null
                }
              }
            }
          ]
        }
        "#);
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_unpivoted_keeps_dimension_columns() {
        let (region, month) = (region(), month());
        let output = ReactTable::new([sales()])
            .transform(&sales_by_region_month(), &[&region, &month], &[])
            .unwrap();

        let headers: Vec<&str> = output.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Region", "Month", "Sales"]);
        assert_eq!(output.leaf_accessors(), vec!["region", "month", "sales"]);
        assert_eq!(output.data.len(), 3);
        assert_eq!(cell(&output.data[1], "month").raw, Scalar::from("2024-02"));
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_unknown_pivot_key_is_ignored() {
        let (region, month) = (region(), month());
        let table = sales_by_region_month();
        let pivoted = ReactTable::new([sales()])
            .pivot(["channel"])
            .transform(&table, &[&region, &month], &[])
            .unwrap();
        let plain = ReactTable::new([sales()])
            .transform(&table, &[&region, &month], &[])
            .unwrap();

        assert_eq!(pivoted, plain);
    }

    #[test]
    fn test_max_columns_truncates_pivoted_columns() {
        let (region, month) = (region(), month());
        let output = ReactTable::new([sales()])
            .pivot(["month"])
            .max_columns(1)
            .transform(&sales_by_region_month(), &[&region, &month], &[])
            .unwrap();

        assert_eq!(output.leaf_accessors(), vec!["region", "2024-01.sales"]);
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_single_metric_collapse() {
        let (region, month) = (region(), month());
        let settings = ReactTableSettings {
            collapse_single_metric: true,
            ..ReactTableSettings::default()
        };
        let output = ReactTable::new([sales()])
            .pivot(["month"])
            .with_settings(settings)
            .transform(&sales_by_region_month(), &[&region, &month], &[])
            .unwrap();

        // Month values become leaves, still resolving to the sales column
        assert_eq!(output.columns[1].header, "2024-01");
        assert!(output.columns[1].children().is_empty());
        assert_eq!(output.leaf_accessors(), vec!["region", "2024-01.sales", "2024-02.sales"]);
        assert_eq!(cell(&output.data[0], "2024-02.sales").raw, Scalar::Int(20));
        assert_accessors_agree(&output);
    }

    // ------------------------------------------------------------------------
    // Empty tables
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_table() {
        let region = region();
        let table = ResultTable::builder()
            .dimensions(["region"])
            .columns(["sales"])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .transform(&table, &[&region], &[])
            .unwrap();

        assert_eq!(output.leaf_accessors(), vec!["region", "sales"]);
        assert!(output.data.is_empty());
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"columns":[{"Header":"Region","accessor":"region"},{"Header":"Sales","accessor":"sales"}],"data":[]}"#
        );
    }

    // ------------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------------

    #[test]
    fn test_reference_columns() {
        let region = region();
        let table = ResultTable::builder()
            .dimensions(["region"])
            .columns(["sales", "sales_dod"])
            .row(vec!["EU".into()], vec![10.into(), 8.into()])
            .row(vec!["US".into()], vec![5.into(), 4.into()])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .pivot(["region"])
            .transform(&table, &[&region], &[Reference::new("dod", "DoD")])
            .unwrap();

        // Every row level was pivoted, so there are no dimension headers
        assert_eq!(output.columns.len(), 2);
        let eu = &output.columns[0];
        assert_eq!(eu.header, "EU");
        let labels: Vec<&str> = eu.children().iter().map(|c| c.header.as_str()).collect();
        assert_eq!(labels, vec!["Sales", "Sales (DoD)"]);
        assert_eq!(eu.leaf_accessors(), vec!["EU.sales", "EU.sales_dod"]);

        assert_eq!(output.data.len(), 1);
        assert_eq!(cell(&output.data[0], "US.sales_dod").raw, Scalar::Int(4));
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_reference_delta_inherits_formatting() {
        let table = ResultTable::builder()
            .columns(["sales", "sales_yoy_delta_percent"])
            .row(vec![], vec![1.5.into(), 0.26.into()])
            .build()
            .unwrap();
        let metric = sales().with_suffix("%").with_precision(1);
        let yoy = Reference::new("yoy", "YoY").with_delta(ReferenceDelta::Percent);

        let output = ReactTable::new([metric])
            .transform(&table, &[], &[yoy])
            .unwrap();

        assert_eq!(output.columns[1].header, "Sales (YoY) Δ%");
        let delta = cell(&output.data[0], "sales_yoy_delta_percent");
        assert_eq!(delta.display.as_deref(), Some("0.3%"));
    }

    #[test]
    fn test_missing_metric_column_fails() {
        let region = region();
        let err = ReactTable::new([sales(), Metric::new("profit")])
            .transform(&sales_by_region_month(), &[&region], &[])
            .unwrap_err();

        match err {
            TransformError::MissingColumn { column } => assert_eq!(column, "profit"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------------
    // Totals
    // ------------------------------------------------------------------------

    fn sales_with_totals() -> ResultTable {
        ResultTable::builder()
            .dimensions(["region"])
            .columns(["sales"])
            .row(vec!["EU".into()], vec![10.into()])
            .row(vec!["US".into()], vec![5.into()])
            .row(vec![Scalar::Null], vec![15.into()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_totals_row() {
        let region = Rollup::new(region());
        let output = ReactTable::new([sales()])
            .transform(&sales_with_totals(), &[&region], &[])
            .unwrap();

        // The rollup delegates its label to the wrapped dimension
        assert_eq!(output.columns[0].header, "Region");

        let totals = cell(&output.data[2], "region");
        assert_eq!(totals.raw, Scalar::Totals);
        assert_eq!(totals.display.as_deref(), Some("Totals"));
        assert_eq!(
            serde_json::to_string(totals).unwrap(),
            r#"{"raw":"$totals","display":"Totals"}"#
        );
    }

    #[test]
    fn test_totals_column_is_marked() {
        let region = region();
        let output = ReactTable::new([sales()])
            .pivot(["region"])
            .transform(&sales_with_totals(), &[&region], &[])
            .unwrap();

        let marked: Vec<&str> = output
            .columns
            .iter()
            .filter(|c| c.is_totals())
            .map(|c| c.header.as_str())
            .collect();
        assert_eq!(marked, vec!["Totals"]);

        let totals = output.columns.last().unwrap();
        assert_eq!(totals.class_name.as_deref(), Some("totals-marker"));
        assert_eq!(totals.leaf_accessors(), vec!["$totals.sales"]);
        assert_eq!(cell(&output.data[0], "$totals.sales").raw, Scalar::Int(15));
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_nested_pivot_marks_inner_totals() {
        let (region, month) = (region(), month());
        let table = ResultTable::builder()
            .dimensions(["region", "month"])
            .columns(["sales"])
            .row(vec!["EU".into(), "2024-01-01".into()], vec![10.into()])
            .row(vec!["EU".into(), Scalar::Null], vec![25.into()])
            .row(vec!["US".into(), "2024-01-01".into()], vec![30.into()])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .pivot(["region", "month"])
            .transform(&table, &[&region, &month], &[])
            .unwrap();

        // Both dimensions pivoted, so no dimension columns and a single row
        let top: Vec<&str> = output.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(top, vec!["EU", "US"]);
        assert_eq!(output.data.len(), 1);

        let eu = &output.columns[0];
        let months: Vec<&str> = eu.children().iter().map(|c| c.header.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "Totals"]);
        assert_eq!(eu.children()[1].class_name.as_deref(), Some("totals-marker"));
        assert_eq!(eu.children()[1].children()[0].header, "Sales");

        fn marked<'a>(headers: &'a [ColumnHeader], out: &mut Vec<&'a str>) {
            for header in headers {
                if header.class_name.is_some() {
                    out.push(header.header.as_str());
                }
                marked(header.children(), out);
            }
        }
        let mut marked_headers = Vec::new();
        marked(&output.columns, &mut marked_headers);
        assert_eq!(marked_headers, vec!["Totals"]);

        assert_eq!(
            output.leaf_accessors(),
            vec!["EU.2024-01.sales", "EU.$totals.sales", "US.2024-01.sales"]
        );
        assert_eq!(cell(&output.data[0], "EU.2024-01.sales").raw, Scalar::Int(10));
        assert_eq!(cell(&output.data[0], "EU.$totals.sales").raw, Scalar::Int(25));
        assert_eq!(cell(&output.data[0], "US.2024-01.sales").raw, Scalar::Int(30));
        assert_accessors_agree(&output);
    }

    #[test]
    fn test_pivoted_cells_keep_raw_value() {
        let (region, month) = (region(), month());
        let revenue = || {
            Metric::new("sales")
                .with_label("Sales")
                .with_prefix("$")
                .with_precision(2)
        };
        let table = ResultTable::builder()
            .dimensions(["region", "month"])
            .columns(["sales"])
            .row(vec!["EU".into(), "2024-01-01".into()], vec![1500.into()])
            .build()
            .unwrap();

        let flat = ReactTable::new([revenue()])
            .transform(&table, &[&region, &month], &[])
            .unwrap();
        assert_eq!(cell(&flat.data[0], "sales").display.as_deref(), Some("$1,500"));

        let pivoted = ReactTable::new([revenue()])
            .pivot(["month"])
            .transform(&table, &[&region, &month], &[])
            .unwrap();
        let value = cell(&pivoted.data[0], "2024-01.sales");
        assert_eq!(value.raw, Scalar::Int(1500));
        assert_eq!(value.display, None);
    }

    #[test]
    fn test_custom_totals_label() {
        let region = region();
        let settings = ReactTableSettings {
            totals_label: "All".to_string(),
            totals_class_name: "grand-total".to_string(),
            ..ReactTableSettings::default()
        };
        let output = ReactTable::new([sales()])
            .pivot(["region"])
            .with_settings(settings)
            .transform(&sales_with_totals(), &[&region], &[])
            .unwrap();

        let totals = output.columns.last().unwrap();
        assert_eq!(totals.header, "All");
        assert_eq!(totals.class_name.as_deref(), Some("grand-total"));
    }

    // ------------------------------------------------------------------------
    // Transpose
    // ------------------------------------------------------------------------

    #[test]
    fn test_transpose() {
        let region = region();
        let table = ResultTable::builder()
            .dimensions(["region"])
            .columns(["sales", "visits"])
            .row(vec!["EU".into()], vec![1.5.into(), 1200.into()])
            .row(vec!["US".into()], vec![2.0.into(), 800.into()])
            .build()
            .unwrap();
        let metrics = [
            sales().with_prefix("$").with_precision(2),
            Metric::new("visits").with_label("Visits"),
        ];

        let output = ReactTable::new(metrics)
            .transpose(true)
            .transform(&table, &[&region], &[])
            .unwrap();

        assert_eq!(output.leaf_accessors(), vec!["metrics", "EU", "US"]);
        assert_eq!(output.columns[0].header, "");

        let sales_row = &output.data[0];
        assert_eq!(cell(sales_row, "metrics").display.as_deref(), Some("Sales"));
        assert_eq!(cell(sales_row, "EU").display.as_deref(), Some("$1.50"));

        let visits_row = &output.data[1];
        assert_eq!(cell(visits_row, "EU").display.as_deref(), Some("1,200"));
        assert_eq!(cell(visits_row, "US"), &CellValue::new(800.into()));
        assert_accessors_agree(&output);
    }

    // ------------------------------------------------------------------------
    // Display values and substitutions
    // ------------------------------------------------------------------------

    #[test]
    fn test_display_field() {
        let country = Dimension::new("country")
            .with_label("Country")
            .with_display_field("country_display");
        let table = ResultTable::builder()
            .dimensions(["country"])
            .columns(["country_display", "sales"])
            .row(vec!["de".into()], vec!["Germany".into(), 3.into()])
            .row(vec!["fr".into()], vec![Scalar::Null, 4.into()])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .transform(&table, &[&country], &[])
            .unwrap();

        // The display column is consumed, not emitted
        assert_eq!(output.leaf_accessors(), vec!["country", "sales"]);
        assert_eq!(cell(&output.data[0], "country").display.as_deref(), Some("Germany"));
        assert_eq!(cell(&output.data[1], "country").display.as_deref(), Some("null"));
    }

    #[test]
    fn test_static_display_values_in_headers() {
        let country = Dimension::new("country").with_display_values([("de", "Germany")]);
        let table = ResultTable::builder()
            .dimensions(["country"])
            .columns(["sales"])
            .row(vec!["de".into()], vec![3.into()])
            .row(vec!["fr".into()], vec![4.into()])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .pivot(["country"])
            .transform(&table, &[&country], &[])
            .unwrap();

        let headers: Vec<&str> = output.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Germany", "fr"]);
        assert_eq!(output.leaf_accessors(), vec!["de.sales", "fr.sales"]);
    }

    #[test]
    fn test_nan_and_infinity_are_substituted() {
        let table = ResultTable::builder()
            .columns(["sales"])
            .row(vec![], vec![f64::NAN.into()])
            .row(vec![], vec![f64::NEG_INFINITY.into()])
            .build()
            .unwrap();

        let output = ReactTable::new([sales()])
            .transform(&table, &[], &[])
            .unwrap();

        assert_eq!(cell(&output.data[0], "sales"), &CellValue::new("NaN".into()));
        assert_eq!(cell(&output.data[1], "sales"), &CellValue::new("Inf".into()));
    }

    #[test]
    fn test_dimensions_as_trait_objects() {
        let dims: Vec<Box<dyn DimensionLike>> = vec![Box::new(Rollup::new(region())), Box::new(month())];
        let refs: Vec<&dyn DimensionLike> = dims.iter().map(|d| &**d).collect();

        let output = ReactTable::new([sales()])
            .pivot(["month"])
            .transform(&sales_by_region_month(), &refs, &[])
            .unwrap();

        assert_eq!(output.leaf_accessors(), vec!["region", "2024-01.sales", "2024-02.sales"]);
    }
}
