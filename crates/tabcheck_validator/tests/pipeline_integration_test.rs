//! End-to-end pipeline tests: configuration in, aggregated results out.

use pretty_assertions::assert_eq;
use tabcheck_core::{
    CustomFn, DataSet, DataValue, PipelineSpecBuilder, RowId, ValidationError,
    ValidationSpecBuilder,
};
use tabcheck_parser::parse_yaml;
use tabcheck_validator::{builtin_registry, ValidationPipeline};

fn sample_dataset() -> DataSet {
    DataSet::from_columns(vec![
        (
            "num",
            vec![DataValue::Int(5), DataValue::Int(0), DataValue::Int(10), DataValue::Int(15)],
        ),
        (
            "word",
            vec![
                DataValue::from("good"),
                DataValue::from("Bad"),
                DataValue::from("ok"),
                DataValue::from("excellent"),
            ],
        ),
    ])
}

const SAMPLE_CONFIG: &str = r#"
validations:
  - column: num
    validator: range
    params:
      min_value: 0
      max_value: 10
      inclusive: true
  - column: word
    validator: regex
    params:
      pattern: "^[a-z]+$"
      case_sensitive: false
"#;

#[test]
fn test_end_to_end_example() {
    let registry = builtin_registry().unwrap();
    let spec = parse_yaml(SAMPLE_CONFIG, &registry).unwrap();
    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();

    let result = pipeline.run(&sample_dataset()).unwrap();

    assert!(!result.passed);
    assert_eq!(result.total_validations, 2);
    assert_eq!(result.passed_validations, 1);
    assert_eq!(result.failed_validations, 1);

    let range = &result.results[0];
    assert_eq!(range.validator_name, "range");
    assert_eq!(range.failed_records, 1);
    assert_eq!(range.error_details[0].row, RowId::Ordinal(3));
    assert_eq!(range.error_details[0].value, DataValue::Int(15));

    let regex = &result.results[1];
    assert_eq!(regex.validator_name, "regex");
    assert!(regex.passed);
}

#[test]
fn test_repeated_runs_are_identical() {
    let registry = builtin_registry().unwrap();
    let spec = parse_yaml(SAMPLE_CONFIG, &registry).unwrap();
    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
    let dataset = sample_dataset();

    let first = pipeline.run(&dataset).unwrap();
    let second = pipeline.run(&dataset).unwrap();

    assert_eq!(first.passed_validations, second.passed_validations);
    assert_eq!(first.failed_validations, second.failed_validations);
    for (a, b) in first.results.iter().zip(&second.results) {
        assert_eq!(a.error_details, b.error_details);
    }
}

#[test]
fn test_summary_after_run() {
    let registry = builtin_registry().unwrap();
    let spec = parse_yaml(SAMPLE_CONFIG, &registry).unwrap();
    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
    pipeline.run(&sample_dataset()).unwrap();

    let summary = pipeline.summary().unwrap();
    assert!(summary.contains("1. Validator: range (column: num)"));
    assert!(summary.contains("     - Row 4: value=15, reason=Value above maximum 10"));
    assert!(summary.contains("2. Validator: regex (column: word)"));
    assert!(summary.contains("   Status: ✓ PASSED"));
    assert!(summary.contains("Failed: 1/2 validations"));
}

#[test]
fn test_labelled_rows_shown_as_is() {
    let registry = builtin_registry().unwrap();
    let spec = PipelineSpecBuilder::new().check("name", "null_check").build();
    let dataset = DataSet::from_columns(vec![("name", vec![DataValue::from("a"), DataValue::Null])])
        .with_row_ids(vec![RowId::Ordinal(100), RowId::Label("row-b".into())])
        .unwrap();

    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
    let result = pipeline.run(&dataset).unwrap();
    assert_eq!(result.results[0].error_details[0].row, RowId::Label("row-b".into()));

    let summary = pipeline.summary().unwrap();
    assert!(summary.contains("     - Row row-b: value=null, reason=Null value not allowed"));
}

#[test]
fn test_missing_column_aborts_run() {
    let registry = builtin_registry().unwrap();
    let spec = PipelineSpecBuilder::new()
        .check("num", "null_check")
        .check("absent", "null_check")
        .build();
    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();

    let err = pipeline.run(&sample_dataset()).unwrap_err();
    assert!(err.is_config_error());
    assert!(matches!(err, ValidationError::ColumnNotFound { ref column, .. } if column == "absent"));
}

#[test]
fn test_invalid_regex_aborts_run() {
    let registry = builtin_registry().unwrap();
    let spec = PipelineSpecBuilder::new()
        .validation(
            ValidationSpecBuilder::new("word", "regex")
                .param("pattern", "[unclosed")
                .build(),
        )
        .build();
    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();

    let err = pipeline.run(&sample_dataset()).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidRegex { .. }));
}

#[test]
fn test_custom_function_from_config() {
    let mut registry = builtin_registry().unwrap();
    registry.register_function(CustomFn::new("even", |value| match value.as_int() {
        Some(n) => Ok(n % 2 == 0),
        None => Err("expected an integer".to_string()),
    }));

    let spec = parse_yaml(
        r#"
validations:
  - column: num
    validator: custom_function
    params:
      validation_func: even
      error_message: "must be even"
"#,
        &registry,
    )
    .unwrap();

    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
    let result = pipeline.run(&sample_dataset()).unwrap();

    let details = &result.results[0].error_details;
    let values: Vec<_> = details.iter().map(|d| d.value.clone()).collect();
    assert_eq!(values, vec![DataValue::Int(5), DataValue::Int(15)]);
    assert_eq!(details[0].reason, "must be even");
}

#[test]
fn test_type_checks_over_json_records() {
    let records = serde_json::json!([
        {"id": 1, "joined": "2024-01-15", "active": "true"},
        {"id": 2.5, "joined": "yesterday", "active": 1},
        {"id": "3", "joined": "2024-02-01 08:00:00", "active": null},
    ]);
    let dataset = DataSet::from_json_records(&records).unwrap();

    let registry = builtin_registry().unwrap();
    let spec = PipelineSpecBuilder::new()
        .validation(ValidationSpecBuilder::new("id", "type").param("expected_type", "int").build())
        .validation(
            ValidationSpecBuilder::new("joined", "type")
                .param("expected_type", "datetime")
                .build(),
        )
        .validation(
            ValidationSpecBuilder::new("active", "type")
                .param("expected_type", "bool")
                .build(),
        )
        .build();

    let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
    let result = pipeline.run(&dataset).unwrap();

    let failed: Vec<_> = result.results.iter().map(|r| r.failed_records).collect();
    assert_eq!(failed, vec![1, 1, 1]);
    assert_eq!(result.results[2].error_details[0].reason, "Null value");
}
