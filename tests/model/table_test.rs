#[cfg(test)]
mod tests {
    use pivotgrid::model::{Index, Level, ResultTable, ResultTableDocument, Scalar, TOTALS_VALUE};
    use pivotgrid::TransformError;

    fn sample() -> ResultTable {
        ResultTable::builder()
            .dimensions(["region", "month"])
            .columns(["sales", "visits"])
            .row(vec!["EU".into(), "2024-01".into()], vec![1.into(), 10.into()])
            .row(vec!["EU".into(), "2024-02".into()], vec![2.into(), f64::INFINITY.into()])
            .row(vec!["US".into(), Scalar::Null], vec![Scalar::Null, 30.into()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_table_shape() {
        let table = sample();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(
            table.index().levels(),
            &[Level::dimension("region"), Level::dimension("month")]
        );
        assert_eq!(table.index().position_of("month"), Some(1));
        assert_eq!(table.index().position_of("metrics"), None);
        assert_eq!(
            table.column_values("sales").unwrap(),
            vec![&Scalar::Int(1), &Scalar::Int(2), &Scalar::Null]
        );
    }

    #[test]
    fn test_select_and_substitute() {
        let mut table = sample().select_columns(&["visits"]).unwrap();
        table.replace_missing(&"NaN".into(), &"Inf".into());

        assert_eq!(table.column_count(), 1);
        assert_eq!(
            table.rows(),
            &[
                vec![Scalar::Int(10)],
                vec![Scalar::from("Inf")],
                vec![Scalar::Int(30)],
            ]
        );
    }

    #[test]
    fn test_select_missing_column() {
        let err = sample().select_columns(&["sales", "profit"]).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { ref column } if column == "profit"));
    }

    #[test]
    fn test_group_outer_preserves_order() {
        let table = sample();
        let groups = table.index().group_outer();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].value, Scalar::from("EU"));
        let inner = groups[0].rest.as_ref().unwrap();
        assert_eq!(inner.levels(), &[Level::dimension("month")]);
        assert_eq!(inner.len(), 2);

        let flat = Index::flat(Level::Metrics, ["sales".into(), "visits".into()]);
        assert!(flat.group_outer().iter().all(|g| g.rest.is_none()));
    }

    #[test]
    fn test_fill_missing_uses_totals() {
        let mut index = sample().index().clone();
        index.fill_missing(&Scalar::Totals);

        assert_eq!(index.entries()[2][1], Scalar::Totals);
        assert_eq!(index.entries()[2][1].to_string(), TOTALS_VALUE);
    }

    #[test]
    fn test_transpose_swaps_axes() {
        let table = sample().transpose();

        assert_eq!(table.index().levels(), &[Level::Unnamed]);
        assert_eq!(table.columns().nlevels(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1][0], Scalar::Int(10));
    }

    #[test]
    fn test_row_shape_is_checked() {
        let err = ResultTable::builder()
            .columns(["sales"])
            .row(vec![], vec![1.into(), 2.into()])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::RowShape {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_document_round_trip() {
        let doc: ResultTableDocument = serde_json::from_str(
            r#"{
                "index": ["region"],
                "columns": ["sales"],
                "rows": [
                    {"index": ["EU"], "values": [1.5]},
                    {"index": [null], "values": [3]}
                ]
            }"#,
        )
        .unwrap();
        let table = doc.into_table().unwrap();

        assert_eq!(table.index().entries()[1], vec![Scalar::Null]);
        assert_eq!(table.rows()[0], vec![Scalar::Float(1.5)]);
        assert_eq!(table.rows()[1], vec![Scalar::Int(3)]);
    }
}
