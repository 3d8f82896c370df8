//! Validation errors as seen by a client.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use scanlite_core::ScanliteConfig;
    use scanlite_model::DynamoDBErrorCode;

    use crate::{call_err, create_hash_table, handler, handler_with};

    #[test]
    fn test_should_render_validation_error_json() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(&handler, "Scan", &json!({}))?;
        assert_eq!(
            err.to_json(),
            json!({
                "__type": "com.amazon.coral.validate#ValidationException",
                "message": "The paramater 'tableName' is required but was not present in the request"
            })
        );
        Ok(())
    }

    #[test]
    fn test_should_report_wire_type_errors() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(&handler, "Scan", &json!({"TableName": "abc", "Limit": "1"}))?;
        assert_eq!(err.code, DynamoDBErrorCode::SerializationException);
        assert_eq!(
            err.to_json()["__type"],
            "com.amazon.coral.service#SerializationException"
        );

        let err = call_err(
            &handler,
            "BatchWriteItem",
            &json!({"RequestItems": {"abc": [{"PutRequest": {"Item": {"a": {"S": 1}}}}]}}),
        )?;
        assert_eq!(err.code, DynamoDBErrorCode::SerializationException);
        Ok(())
    }

    #[test]
    fn test_should_aggregate_nine_scan_violations() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(
            &handler,
            "Scan",
            &json!({
                "TableName": "abc;",
                "ReturnConsumedCapacity": "hi",
                "AttributesToGet": [],
                "Segment": -1,
                "TotalSegments": -1,
                "Select": "hi",
                "Limit": -1,
                "ScanFilter": {"a": {}, "b": {"ComparisonOperator": ""}}
            }),
        )?;
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);
        assert!(err.message.starts_with("9 validation errors detected: "));
        assert!(err.message.ends_with(
            "Value null at 'scanFilter.a.member.comparisonOperator' failed to satisfy constraint: Member must not be null"
        ));
        Ok(())
    }

    #[test]
    fn test_should_cap_reported_violations() -> anyhow::Result<()> {
        let handler = handler_with(ScanliteConfig {
            max_validation_errors: 1,
            ..ScanliteConfig::default()
        });
        let err = call_err(
            &handler,
            "Scan",
            &json!({"TableName": "abc;", "Limit": -1, "TotalSegments": -1}),
        )?;
        assert_eq!(
            err.message,
            "1 validation error detected: \
             Value '-1' at 'limit' failed to satisfy constraint: Member must have value greater than or equal to 1"
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_filter_argument_count() -> anyhow::Result<()> {
        let handler = handler();
        let table = create_hash_table(&handler, "validation-arity")?;
        let err = call_err(
            &handler,
            "Scan",
            &json!({
                "TableName": table,
                "ScanFilter": {"a": {"ComparisonOperator": "NULL", "AttributeValueList": [{"S": "a"}]}}
            }),
        )?;
        assert_eq!(
            err.message,
            "The attempted filter operation is not supported for the provided filter argument count"
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_null_filter_operand() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(
            &handler,
            "Scan",
            &json!({
                "TableName": "abc",
                "ScanFilter": {"a": {"ComparisonOperator": "EQ", "AttributeValueList": [null]}}
            }),
        )?;
        assert_eq!(err.code, DynamoDBErrorCode::ValidationException);
        assert_eq!(
            err.message,
            "Supplied AttributeValue is empty, must contain exactly one of the supported datatypes"
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_filter_argument_type() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(
            &handler,
            "Scan",
            &json!({
                "TableName": "abc",
                "ScanFilter": {"a": {"ComparisonOperator": "LT", "AttributeValueList": [{"SS": ["a"]}]}}
            }),
        )?;
        assert_eq!(
            err.message,
            "The attempted filter operation is not supported for the provided type"
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_segment_without_total() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(&handler, "Scan", &json!({"TableName": "abc", "Segment": 0}))?;
        assert_eq!(
            err.message,
            "The TotalSegments parameter is required but was not present in the request when parameter Segment is present"
        );
        Ok(())
    }

    #[test]
    fn test_should_prefix_invalid_starting_keys() -> anyhow::Result<()> {
        let handler = handler();
        let err = call_err(
            &handler,
            "Scan",
            &json!({"TableName": "abc", "ExclusiveStartKey": {"a": {}}}),
        )?;
        assert_eq!(
            err.message,
            "The provided starting key is invalid: Supplied AttributeValue is empty, must contain exactly one of the supported datatypes"
        );

        let table = create_hash_table(&handler, "validation-start-key")?;
        let err = call_err(
            &handler,
            "Scan",
            &json!({"TableName": table, "ExclusiveStartKey": {"other": {"S": "a"}}}),
        )?;
        assert_eq!(
            err.message,
            "The provided starting key is invalid: The provided key element does not match the schema"
        );
        Ok(())
    }
}
