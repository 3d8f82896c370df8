//! Scan filtering, projection and pagination.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::{Value, json};

    use crate::{call, call_err, create_composite_table, create_hash_table, handler, put_items};

    fn ids(response: &Value) -> BTreeSet<String> {
        response["Items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["pk"]["S"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_should_scan_all_items() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-all")?;
        put_items(
            &handler,
            &table,
            &[json!({"pk": {"S": "a"}}), json!({"pk": {"S": "b"}})],
        )?;

        let response = call(&handler, "Scan", &json!({"TableName": table}))?;
        assert_eq!(response["Count"], 2);
        assert_eq!(response["ScannedCount"], 2);
        assert!(response.get("LastEvaluatedKey").is_none());
        assert_eq!(ids(&response), BTreeSet::from(["a".to_owned(), "b".to_owned()]));
        Ok(())
    }

    #[test]
    fn test_should_compare_values_by_type() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-types")?;
        put_items(
            &handler,
            &table,
            &[
                json!({"pk": {"S": "num"}, "b": {"N": "1234"}, "c": {"S": "k"}}),
                json!({"pk": {"S": "str"}, "b": {"S": "1234"}, "c": {"S": "k"}}),
            ],
        )?;

        let response = call(
            &handler,
            "Scan",
            &json!({
                "TableName": table,
                "ScanFilter": {
                    "b": {"ComparisonOperator": "EQ", "AttributeValueList": [{"N": "1234"}]},
                    "c": {"ComparisonOperator": "EQ", "AttributeValueList": [{"S": "k"}]}
                }
            }),
        )?;
        assert_eq!(ids(&response), BTreeSet::from(["num".to_owned()]));
        assert_eq!(response["Count"], 1);
        assert_eq!(response["ScannedCount"], 2);

        let response = call(
            &handler,
            "Scan",
            &json!({
                "TableName": table,
                "ScanFilter": {"b": {"ComparisonOperator": "NE", "AttributeValueList": [{"N": "1234"}]}}
            }),
        )?;
        assert_eq!(ids(&response), BTreeSet::from(["str".to_owned()]));
        Ok(())
    }

    #[test]
    fn test_should_match_between_bounds_inclusively() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-between")?;
        let values = ["abc", "abd", "abd\u{0}", "abe", "abe\u{0}"];
        let items: Vec<Value> = values
            .iter()
            .map(|v| json!({"pk": {"S": format!("id-{v}")}, "b": {"S": v}}))
            .collect();
        put_items(&handler, &table, &items)?;

        let response = call(
            &handler,
            "Scan",
            &json!({
                "TableName": table,
                "ScanFilter": {"b": {
                    "ComparisonOperator": "BETWEEN",
                    "AttributeValueList": [{"S": "abd"}, {"S": "abe"}]
                }}
            }),
        )?;
        assert_eq!(
            ids(&response),
            BTreeSet::from([
                "id-abd".to_owned(),
                "id-abd\u{0}".to_owned(),
                "id-abe".to_owned()
            ])
        );
        Ok(())
    }

    #[test]
    fn test_should_distinguish_membership_from_substring() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-contains")?;
        put_items(
            &handler,
            &table,
            &[
                json!({"pk": {"S": "set"}, "b": {"SS": ["abd", "bde"]}}),
                json!({"pk": {"S": "string"}, "b": {"S": "abdef"}}),
                json!({"pk": {"S": "number"}, "b": {"N": "1234"}}),
                json!({"pk": {"S": "absent"}}),
            ],
        )?;

        let contains = |operand: Value| -> anyhow::Result<BTreeSet<String>> {
            let response = call(
                &handler,
                "Scan",
                &json!({
                    "TableName": table,
                    "ScanFilter": {"b": {"ComparisonOperator": "CONTAINS", "AttributeValueList": [operand]}}
                }),
            )?;
            Ok(ids(&response))
        };
        assert_eq!(
            contains(json!({"S": "bde"}))?,
            BTreeSet::from(["set".to_owned(), "string".to_owned()])
        );
        assert!(contains(json!({"N": "234"}))?.is_empty());

        let response = call(
            &handler,
            "Scan",
            &json!({
                "TableName": table,
                "ScanFilter": {"b": {"ComparisonOperator": "NOT_CONTAINS", "AttributeValueList": [{"S": "bde"}]}}
            }),
        )?;
        assert_eq!(
            ids(&response),
            BTreeSet::from(["number".to_owned(), "absent".to_owned()])
        );
        Ok(())
    }

    #[test]
    fn test_should_paginate_with_last_evaluated_key() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_composite_table(&handler, "scan-pages")?;
        let items: Vec<Value> = (0..5)
            .map(|i| json!({"pk": {"S": "p"}, "sk": {"N": i.to_string()}}))
            .collect();
        put_items(&handler, &table, &items)?;

        let mut seen = Vec::new();
        let mut start: Option<Value> = None;
        loop {
            let mut request = json!({"TableName": table, "Limit": 2});
            if let Some(key) = start.take() {
                request["ExclusiveStartKey"] = key;
            }
            let response = call(&handler, "Scan", &request)?;
            for item in response["Items"].as_array().into_iter().flatten() {
                seen.push(item["sk"]["N"].as_str().unwrap_or_default().to_owned());
            }
            match response.get("LastEvaluatedKey") {
                Some(key) => start = Some(key.clone()),
                None => break,
            }
        }
        assert_eq!(seen, ["0", "1", "2", "3", "4"]);
        Ok(())
    }

    #[test]
    fn test_should_cover_table_with_parallel_segments() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-segments")?;
        let items: Vec<Value> = (0..40).map(|i| json!({"pk": {"S": format!("k{i}")}})).collect();
        put_items(&handler, &table, &items)?;

        let mut union = BTreeSet::new();
        let mut total = 0;
        for segment in 0..3 {
            let response = call(
                &handler,
                "Scan",
                &json!({"TableName": table, "Segment": segment, "TotalSegments": 3}),
            )?;
            let segment_ids = ids(&response);
            total += segment_ids.len();
            union.extend(segment_ids);
        }
        assert_eq!(total, 40);
        assert_eq!(union.len(), 40);
        Ok(())
    }

    #[test]
    fn test_should_count_and_project() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "scan-select")?;
        put_items(
            &handler,
            &table,
            &[json!({"pk": {"S": "a"}, "x": {"S": "1"}, "y": {"N": "2"}})],
        )?;

        let response = call(&handler, "Scan", &json!({"TableName": table, "Select": "COUNT"}))?;
        assert!(response.get("Items").is_none());
        assert_eq!(response["Count"], 1);

        let response = call(
            &handler,
            "Scan",
            &json!({"TableName": table, "AttributesToGet": ["y", "missing"]}),
        )?;
        assert_eq!(response["Items"], json!([{"y": {"N": "2"}}]));
        Ok(())
    }

    #[test]
    fn test_should_report_missing_table() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(&handler, "Scan", &json!({"TableName": "no-such-table"}))?;
        assert_eq!(
            err.to_json(),
            json!({
                "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
                "Message": "Requested resource not found"
            })
        );
        Ok(())
    }
}
