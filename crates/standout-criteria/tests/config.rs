//! Criteria and CSV options loaded from configuration files.

use standout_criteria::{
    Criteria, CsvOptions, CsvSource, Dir, Limit, Op, OrderBy, PredicateExpr, QueryPlan,
};

const PRENOMS: &str = "\
prenoms;nombre;sexe;annee
Adam;41;M;2004
Eve;12;F;2004
Abel;8;M;2005
Lilith;3;F;2006
";

#[test]
fn criteria_from_json_with_operator_symbols() {
    let json = r#"{
        "predicate": {
            "and": [
                { "comparison": { "field": "sexe", "op": "=", "value": "F" } },
                { "comparison": { "field": "annee", "op": ">=", "value": 2005 } }
            ]
        },
        "orderings": [{ "field": "prenoms", "dir": "DESC" }],
        "offset": 0,
        "limit": -1
    }"#;

    let criteria: Criteria = serde_json::from_str(json).unwrap();
    let expected = Criteria::new()
        .filter(PredicateExpr::eq("sexe", "F").and(PredicateExpr::gte("annee", 2005)))
        .order_desc("prenoms");
    assert_eq!(criteria, expected);
}

#[test]
fn operator_names_and_symbols_deserialize_alike() {
    let pairs = [
        ("\"neq\"", "\"<>\""),
        ("\"lt\"", "\"<\""),
        ("\"in\"", "\"IN\""),
        ("\"notIn\"", "\"NIN\""),
        ("\"memberOf\"", "\"MEMBER_OF\""),
        ("\"startsWith\"", "\"STARTS_WITH\""),
    ];
    for (name, symbol) in pairs {
        let by_name: Op = serde_json::from_str(name).unwrap();
        let by_symbol: Op = serde_json::from_str(symbol).unwrap();
        assert_eq!(by_name, by_symbol, "{name} vs {symbol}");
    }
}

#[test]
fn missing_keys_take_defaults() {
    let criteria: Criteria = serde_json::from_str("{}").unwrap();
    assert!(criteria.is_empty());

    let criteria: Criteria = serde_json::from_str(r#"{ "orderings": [{ "field": 2 }] }"#).unwrap();
    assert_eq!(criteria.orderings(), &[OrderBy::new(2usize, Dir::Asc)]);
}

#[test]
fn limit_below_minus_one_is_rejected() {
    let err = serde_json::from_str::<Criteria>(r#"{ "limit": -2 }"#).unwrap_err();
    assert!(err.to_string().contains("invalid limit -2"));
}

#[test]
fn limit_serializes_as_sentinel() {
    let json = serde_json::to_value(Criteria::new().offset(3)).unwrap();
    assert_eq!(json["limit"], -1);
    assert_eq!(json["offset"], 3);

    let json = serde_json::to_value(Criteria::new().limit(7)).unwrap();
    assert_eq!(json["limit"], 7);
}

#[test]
fn query_from_yaml_runs_against_csv() {
    let yaml = "
orderings:
  - field: nombre
    dir: DESC
offset: 1
limit: 2
";
    let criteria: Criteria = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(criteria.get_limit(), Limit::At(2));

    let options: CsvOptions = serde_yaml::from_str(
        "
delimiter: 59
header_offset: 0
infer_numbers: true
",
    )
    .unwrap();
    assert_eq!(options.delimiter, b';');

    let mut source = CsvSource::from_reader(PRENOMS.as_bytes(), &options);
    let result = QueryPlan::build(&criteria).unwrap().process(&mut source).unwrap();

    let names: Vec<String> = result
        .iter()
        .map(|r| r.get("prenoms").unwrap().to_string())
        .collect();
    assert_eq!(names, ["Eve", "Abel"]);
}
