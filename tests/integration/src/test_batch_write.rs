//! `BatchWriteItem` puts, deletes and rejections.

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use scanlite_model::DynamoDBErrorCode;

    use crate::{call, call_err, create_composite_table, create_hash_table, handler, put_items};

    fn batch(table: &str, requests: Vec<Value>) -> Value {
        json!({"RequestItems": {table: requests}})
    }

    #[test]
    fn test_should_put_and_delete_items() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_composite_table(&handler, "batch-put-delete")?;

        let response = call(
            &handler,
            "BatchWriteItem",
            &batch(
                &table,
                vec![
                    json!({"PutRequest": {"Item": {"pk": {"S": "a"}, "sk": {"N": "1"}, "v": {"S": "x"}}}}),
                    json!({"PutRequest": {"Item": {"pk": {"S": "a"}, "sk": {"N": "2"}}}}),
                ],
            ),
        )?;
        assert_eq!(response, json!({"UnprocessedItems": {}}));

        call(
            &handler,
            "BatchWriteItem",
            &batch(
                &table,
                vec![json!({"DeleteRequest": {"Key": {"pk": {"S": "a"}, "sk": {"N": "2.0"}}}})],
            ),
        )?;

        let response = call(&handler, "Scan", &json!({"TableName": table}))?;
        assert_eq!(
            response["Items"],
            json!([{"pk": {"S": "a"}, "sk": {"N": "1"}, "v": {"S": "x"}}])
        );
        Ok(())
    }

    #[test]
    fn test_should_replace_existing_item() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-replace")?;
        put_items(&handler, &table, &[json!({"pk": {"S": "a"}, "v": {"N": "1"}})])?;
        put_items(&handler, &table, &[json!({"pk": {"S": "a"}, "w": {"N": "2"}})])?;

        let response = call(&handler, "Scan", &json!({"TableName": table}))?;
        assert_eq!(response["Items"], json!([{"pk": {"S": "a"}, "w": {"N": "2"}}]));
        Ok(())
    }

    #[test]
    fn test_should_write_across_tables() -> anyhow::Result<()> {
        let handler = handler();
        let first = create_hash_table(&handler, "batch-first")?;
        let second = create_hash_table(&handler, "batch-second")?;
        call(
            &handler,
            "BatchWriteItem",
            &json!({"RequestItems": {
                first.as_str(): [{"PutRequest": {"Item": {"pk": {"S": "1"}}}}],
                second.as_str(): [{"PutRequest": {"Item": {"pk": {"S": "2"}}}}]
            }}),
        )?;
        for table in [&first, &second] {
            let response = call(&handler, "Scan", &json!({"TableName": table}))?;
            assert_eq!(response["Count"], 1);
        }
        Ok(())
    }

    #[test]
    fn test_should_reject_items_missing_key_attributes() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-missing-key")?;
        let err = call_err(
            &handler,
            "BatchWriteItem",
            &batch(&table, vec![json!({"PutRequest": {"Item": {"other": {"S": "a"}}}})]),
        )?;
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);
        assert_eq!(
            err.message,
            "One or more parameter values were invalid: Missing the key pk in the item"
        );
        Ok(())
    }

    #[test]
    fn test_should_apply_nothing_when_one_request_fails() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-atomic")?;
        let err = call_err(
            &handler,
            "BatchWriteItem",
            &batch(
                &table,
                vec![
                    json!({"PutRequest": {"Item": {"pk": {"S": "ok"}}}}),
                    json!({"PutRequest": {"Item": {"pk": {"N": "1"}}}}),
                ],
            ),
        )?;
        assert_eq!(
            err.message,
            "One or more parameter values were invalid: Type mismatch for key pk expected: S actual: N"
        );

        let response = call(&handler, "Scan", &json!({"TableName": table}))?;
        assert_eq!(response["Count"], 0);
        Ok(())
    }

    #[test]
    fn test_should_reject_delete_with_extra_attributes() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-delete-key")?;
        let err = call_err(
            &handler,
            "BatchWriteItem",
            &batch(
                &table,
                vec![json!({"DeleteRequest": {"Key": {"pk": {"S": "a"}, "x": {"S": "b"}}}})],
            ),
        )?;
        assert_eq!(err.message, "The provided key element does not match the schema");
        Ok(())
    }

    #[test]
    fn test_should_reject_duplicate_keys() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-duplicates")?;
        let err = call_err(
            &handler,
            "BatchWriteItem",
            &batch(
                &table,
                vec![
                    json!({"PutRequest": {"Item": {"pk": {"S": "a"}}}}),
                    json!({"DeleteRequest": {"Key": {"pk": {"S": "a"}}}}),
                ],
            ),
        )?;
        assert_eq!(err.message, "Provided list of item keys contains duplicates");
        Ok(())
    }

    #[test]
    fn test_should_reject_too_many_items() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-too-many")?;
        let requests = (0..26)
            .map(|i| json!({"PutRequest": {"Item": {"pk": {"S": i.to_string()}}}}))
            .collect();
        let err = call_err(&handler, "BatchWriteItem", &batch(&table, requests))?;
        assert_eq!(err.message, "Too many items requested for the BatchWriteItem call");
        Ok(())
    }

    #[test]
    fn test_should_reject_empty_request_list() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "batch-empty")?;
        let err = call_err(&handler, "BatchWriteItem", &batch(&table, Vec::new()))?;
        assert_eq!(
            err.message,
            format!("The batch write request list for a table cannot be null or empty: {table}")
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_unknown_table() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(
            &handler,
            "BatchWriteItem",
            &batch("missing", vec![json!({"PutRequest": {"Item": {"pk": {"S": "a"}}}})]),
        )?;
        assert_eq!(err.code, DynamoDBErrorCode::ResourceNotFoundException);
        Ok(())
    }
}
