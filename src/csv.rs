use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Amount;
use crate::engine::Cart;
use crate::model::{Customizations, LineId, LineRef, NewLine, Operation, SizeCode};

/// Errors that can occur when reading or writing csv
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized operation '{op}'")]
    UnrecognizedOp { line: usize, op: String },

    #[error("line {line}: {op} missing {field}")]
    MissingField {
        line: usize,
        op: &'static str,
        field: &'static str,
    },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("failed to write summary: {0}")]
    Write(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    op: String,
    line: Option<String>,
    item: Option<String>,
    name: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
    size: Option<String>,
    toppings: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    kind: &'a str,
    id: &'a str,
    item: &'a str,
    name: &'a str,
    size: &'a str,
    price: String,
    quantity: String,
    amount: String,
}

impl<'a> OutputRow<'a> {
    fn total(kind: &'a str, name: &'a str, amount: Amount) -> Self {
        Self {
            kind,
            id: "",
            item: "",
            name,
            size: "",
            price: String::new(),
            quantity: String::new(),
            amount: amount.to_string(),
        }
    }
}

/// Read cart operations from a csv file
pub fn read_operations(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Operation, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: InputRow) -> Result<Operation, CsvError> {
    let missing = |op, field| CsvError::MissingField { line, op, field };

    match row.op.as_str() {
        "add" => {
            let item = row.item.ok_or_else(|| missing("add", "item"))?;
            let price = row.price.ok_or_else(|| missing("add", "price"))?;
            if !price.is_finite() || price < 0.0 {
                return Err(CsvError::InvalidField {
                    line,
                    field: "price",
                    value: price.to_string(),
                });
            }
            let quantity = match row.quantity {
                None => 1,
                Some(q) => u32::try_from(q)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| CsvError::InvalidField {
                        line,
                        field: "quantity",
                        value: q.to_string(),
                    })?,
            };

            let name = row.name.unwrap_or_else(|| item.clone());
            let mut new_line = NewLine::new(item, name, Amount::from_float(price)).quantity(quantity);
            if let Some(size) = row.size {
                let size = size.parse::<SizeCode>().map_err(|e| CsvError::InvalidField {
                    line,
                    field: "size",
                    value: e.0,
                })?;
                new_line = new_line.size(size);
            }
            if let Some(toppings) = row.toppings {
                new_line = new_line.customizations(Customizations::with_toppings(
                    toppings.split(';').map(str::trim).filter(|t| !t.is_empty()),
                ));
            }
            Ok(Operation::AddLine(new_line))
        }
        "remove" => {
            let target = row.line.ok_or_else(|| missing("remove", "line"))?;
            Ok(Operation::RemoveLine(parse_line_ref(line, &target)?))
        }
        "quantity" => {
            let target = row.line.ok_or_else(|| missing("quantity", "line"))?;
            let quantity = row.quantity.ok_or_else(|| missing("quantity", "quantity"))?;
            Ok(Operation::SetQuantity(parse_line_ref(line, &target)?, quantity))
        }
        "promo" => {
            let code = row.code.ok_or_else(|| missing("promo", "code"))?;
            Ok(Operation::ApplyPromo(code))
        }
        "clear" => Ok(Operation::Clear),
        other => Err(CsvError::UnrecognizedOp {
            line,
            op: other.to_string(),
        }),
    }
}

/// `#n` is the n-th line; anything else is a line id
fn parse_line_ref(line: usize, value: &str) -> Result<LineRef, CsvError> {
    match value.strip_prefix('#') {
        Some(pos) => pos
            .parse::<usize>()
            .map(LineRef::Position)
            .map_err(|_| CsvError::InvalidField {
                line,
                field: "line",
                value: value.to_string(),
            }),
        None => Ok(LineRef::Id(LineId::new(value))),
    }
}

/// Write the cart lines and totals in csv format
pub fn write_summary(cart: &Cart, writer: impl io::Write) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for line in cart.lines() {
        writer.serialize(OutputRow {
            kind: "line",
            id: line.id.as_str(),
            item: line.item_id.as_str(),
            name: &line.name,
            size: line.size.map(SizeCode::code).unwrap_or_default(),
            price: line.price.to_string(),
            quantity: line.quantity.to_string(),
            amount: line.amount().to_string(),
        })?;
    }

    let totals = cart.totals();
    writer.serialize(OutputRow::total("subtotal", "", totals.subtotal))?;
    writer.serialize(OutputRow::total("tax", "", totals.tax))?;
    writer.serialize(OutputRow::total("delivery", "", totals.delivery_fee))?;
    writer.serialize(OutputRow::total(
        "discount",
        cart.promo_code().unwrap_or_default(),
        totals.discount,
    ))?;
    writer.serialize(OutputRow::total("total", "", totals.total))?;

    writer.flush().map_err(|e| CsvError::Write(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CartEngine;
    use crate::pricing::PricingConfig;
    use crate::store::MemoryStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,line,item,name,price,quantity,size,toppings,code\n";

    fn write_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(rows.as_bytes()).unwrap();
        file
    }

    fn read(rows: &str) -> Vec<Result<Operation, CsvError>> {
        let file = write_csv(rows);
        read_operations(file.path()).unwrap().collect()
    }

    #[test]
    fn read_add() {
        let results = read("add,,margherita,Classic Margherita,323,2,M,extra-cheese;basil,\n");
        assert_eq!(results.len(), 1);

        let op = results.into_iter().next().unwrap().unwrap();
        match op {
            Operation::AddLine(line) => {
                assert_eq!(line.item_id.as_str(), "margherita");
                assert_eq!(line.name, "Classic Margherita");
                assert_eq!(line.price, Amount::from_whole(323));
                assert_eq!(line.quantity, 2);
                assert_eq!(line.size, Some(SizeCode::Medium));
                assert_eq!(
                    line.customizations.unwrap().toppings,
                    ["extra-cheese", "basil"]
                );
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn read_add_defaults() {
        let results = read("add,,coke,,60,,,,\n");
        match results.into_iter().next().unwrap().unwrap() {
            Operation::AddLine(line) => {
                assert_eq!(line.name, "coke");
                assert_eq!(line.quantity, 1);
                assert!(line.size.is_none());
                assert!(line.customizations.is_none());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn read_line_operations() {
        let results = read(
            "remove,#2,,,,,,,\nquantity,coke-17,,,,-1,,,\npromo,,,,,,,,first50\nclear,,,,,,,,\n",
        );
        let ops: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            ops,
            [
                Operation::RemoveLine(LineRef::Position(2)),
                Operation::SetQuantity(LineRef::Id(LineId::new("coke-17")), -1),
                Operation::ApplyPromo("first50".to_string()),
                Operation::Clear,
            ]
        );
    }

    #[test]
    fn read_with_whitespace() {
        let results = read("add, , coke, Coca Cola, 60, 1, , , \n");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn read_returns_error_for_unknown_op() {
        let results = read("refund,,,,,,,,\n");
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedOp { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_missing_fields() {
        let results = read("add,,coke,,,,,,\npromo,,,,,,,,\nquantity,#1,,,,,,,\n");
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::MissingField { line: 2, op: "add", field: "price" }
        ));
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::MissingField { line: 3, op: "promo", field: "code" }
        ));
        assert!(matches!(
            results[2].as_ref().unwrap_err(),
            CsvError::MissingField { line: 4, op: "quantity", field: "quantity" }
        ));
    }

    #[test]
    fn read_returns_error_for_invalid_fields() {
        let results = read("add,,coke,,60,1,XL,,\nremove,#x,,,,,,,\nadd,,coke,,60,0,,,\n");
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::InvalidField { field: "size", .. }
        ));
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::InvalidField { field: "line", .. }
        ));
        assert!(matches!(
            results[2].as_ref().unwrap_err(),
            CsvError::InvalidField { field: "quantity", .. }
        ));
    }

    #[test]
    fn read_errors_do_not_stop_reading() {
        let results = read("bogus,,,,,,,,\nclear,,,,,,,,\n");
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn read_missing_file_fails_to_open() {
        let result = read_operations("/nonexistent/ops.csv");
        assert!(matches!(result, Err(CsvError::Open { .. })));
    }

    #[test]
    fn write_summary_lists_lines_and_totals() {
        let mut engine = CartEngine::new(MemoryStore::new(), PricingConfig::default())
            .with_clock(|| 7);
        engine
            .add_line(
                NewLine::new("margherita", "Classic Margherita", Amount::from_whole(249))
                    .size(SizeCode::Medium),
            )
            .unwrap();
        engine
            .add_line(NewLine::new("coke", "Coca Cola", Amount::from_whole(60)))
            .unwrap();
        engine.apply_promo("FIRST50").unwrap();

        let mut out = Vec::new();
        write_summary(engine.cart(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "kind,id,item,name,size,price,quantity,amount");
        assert_eq!(
            lines[1],
            "line,margherita-7,margherita,Classic Margherita,M,249.00,1,249.00"
        );
        assert_eq!(lines[2], "line,coke-8,coke,Coca Cola,,60.00,1,60.00");
        assert_eq!(lines[3], "subtotal,,,,,,,309.00");
        assert_eq!(lines[4], "tax,,,,,,,15.45");
        assert_eq!(lines[5], "delivery,,,,,,,0.00");
        assert_eq!(lines[6], "discount,,,FIRST50,,,,50.00");
        assert_eq!(lines[7], "total,,,,,,,274.45");
    }
}
