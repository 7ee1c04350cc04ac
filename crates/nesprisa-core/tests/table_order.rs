use std::str::FromStr;

use nesprisa_core::{Error, TableName, validate_order};

#[test]
fn fixed_order_respects_dependencies() {
    validate_order(&TableName::ALL).expect("fixed order is valid");
}

#[test]
fn table_names_round_trip_through_strings() {
    for table in TableName::ALL {
        let parsed = TableName::from_str(table.as_str()).expect("known table");
        assert_eq!(parsed, table);
    }
    assert_eq!(
        TableName::from_str(" Var_En_Cafetera ").expect("case and spaces are ignored"),
        TableName::VarEnCafetera
    );
}

#[test]
fn unknown_table_is_rejected() {
    let err = TableName::from_str("espresso").unwrap_err();
    assert!(matches!(err, Error::UnknownTable(name) if name == "espresso"));
}

#[test]
fn serializes_as_snake_case() {
    let json = serde_json::to_string(&TableName::GranoEnPlantacion).expect("serialize");
    assert_eq!(json, "\"grano_en_plantacion\"");
    let table: TableName = serde_json::from_str("\"tiene_cafetera\"").expect("deserialize");
    assert_eq!(table, TableName::TieneCafetera);
}
