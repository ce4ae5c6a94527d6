//! JSON parser for the products API payload.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::records::SaleRecord;

/// Decodes the API payload into sales records.
///
/// Accepts either an array of row objects or an object mapping each column
/// name to an array of values.
///
/// # Errors
///
/// Returns an error if the payload is not valid JSON, if column arrays differ
/// in length, or if any row is missing a field or has a malformed date.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<SaleRecord>> {
    let value: Value = serde_json::from_slice(bytes).context("payload is not valid JSON")?;

    match value {
        Value::Array(rows) => rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value(row).with_context(|| format!("invalid sales row {}", i))
            })
            .collect(),
        Value::Object(columns) => from_columns(columns),
        other => bail!("expected an array or object of sales data, got {}", kind(&other)),
    }
}

fn from_columns(columns: Map<String, Value>) -> Result<Vec<SaleRecord>> {
    let mut series = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        match values {
            Value::Array(values) => series.push((name, values)),
            other => bail!("column {:?} should be an array, got {}", name, kind(&other)),
        }
    }

    let len = series.first().map_or(0, |(_, v)| v.len());
    if let Some((name, values)) = series.iter().find(|(_, v)| v.len() != len) {
        bail!(
            "column {:?} has {} values, expected {}",
            name,
            values.len(),
            len
        );
    }

    let mut iters: Vec<_> = series
        .into_iter()
        .map(|(name, values)| (name, values.into_iter()))
        .collect();

    (0..len)
        .map(|i| {
            let row: Map<String, Value> = iters
                .iter_mut()
                .filter_map(|(name, values)| values.next().map(|v| (name.clone(), v)))
                .collect();
            serde_json::from_value(Value::Object(row))
                .with_context(|| format!("invalid sales row {}", i))
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ROWS: &str = r#"[
        {"Produto": "Celular ABXY", "Categoria do Produto": "eletronicos", "Preço": 850.0,
         "Frete": 44.2, "Data da Compra": "10/02/2022", "Vendedor": "Pedro Gomes",
         "Local da compra": "BA", "Avaliação da compra": 5, "Tipo de pagamento": "boleto",
         "Quantidade de parcelas": 1, "lat": -13.29, "lon": -41.71},
        {"Produto": "Cama box", "Categoria do Produto": "moveis", "Preço": 1200.5,
         "Frete": 60.0, "Data da Compra": "31/12/2021", "Vendedor": "Ana",
         "Local da compra": "SP", "Avaliação da compra": 3, "Tipo de pagamento": "cartao_credito",
         "Quantidade de parcelas": 8, "lat": -22.19, "lon": -48.79}
    ]"#;

    #[test]
    fn test_parse_row_array() {
        let records = parse_records(ROWS.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, "BA");
        assert_eq!(
            records[1].purchase_date,
            NaiveDate::from_ymd_opt(2021, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_column_mapping() {
        let rows: Vec<Value> = serde_json::from_str(ROWS).unwrap();
        let mut columns = Map::new();
        for row in &rows {
            for (k, v) in row.as_object().unwrap() {
                columns
                    .entry(k.clone())
                    .or_insert_with(|| Value::Array(Vec::new()))
                    .as_array_mut()
                    .unwrap()
                    .push(v.clone());
            }
        }
        let bytes = serde_json::to_vec(&Value::Object(columns)).unwrap();

        let records = parse_records(&bytes).unwrap();
        assert_eq!(records, parse_records(ROWS.as_bytes()).unwrap());
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_records(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_ragged_columns() {
        let err = parse_records(br#"{"Produto": ["a", "b"], "Frete": [1.0]}"#).unwrap_err();
        assert!(err.to_string().contains("values, expected"));
    }

    #[test]
    fn test_parse_bad_date() {
        let bad = ROWS.replace("10/02/2022", "2022-02-10");
        assert!(parse_records(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        assert!(parse_records(&[0xFF, 0xFE]).is_err());
        assert!(parse_records(b"42").is_err());
    }
}
