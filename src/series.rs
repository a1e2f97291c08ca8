//! Candle records and the normalized price series the indicators consume.
//!
//! The exchange returns klines as fixed-order JSON arrays with mixed
//! number/string fields. Parsing normalizes them into `Candle` values and an
//! ordered `PriceSeries` of closes, oldest first. Anything that does not fit
//! the expected shape is a `MalformedData` error, never a silent skip.

use crate::errors::RsiWatchError;
use serde_json::Value;

/// One raw kline record. Only `close` is consumed by the indicators; the
/// rest is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

/// Minimum fields a kline row must carry: open_time, open, high, low,
/// close, volume. Extra exchange fields (close_time, qav, trade counts,
/// taker volumes) are optional and ignored beyond close_time.
const MIN_KLINE_FIELDS: usize = 6;

impl Candle {
    /// Parse one fixed-order kline row. `index` is only used for error
    /// context.
    pub fn from_row(index: usize, row: &Value) -> Result<Self, RsiWatchError> {
        let context = format!("kline row {}", index);
        let fields = row
            .as_array()
            .ok_or_else(|| RsiWatchError::malformed(&context, "row is not an array"))?;

        if fields.len() < MIN_KLINE_FIELDS {
            return Err(RsiWatchError::malformed(
                &context,
                format!(
                    "{} fields, expected at least {}",
                    fields.len(),
                    MIN_KLINE_FIELDS
                ),
            ));
        }

        Ok(Candle {
            open_time: int_field(fields, 0, &context)?,
            open: num_field(fields, 1, &context)?,
            high: num_field(fields, 2, &context)?,
            low: num_field(fields, 3, &context)?,
            close: num_field(fields, 4, &context)?,
            volume: num_field(fields, 5, &context)?,
            close_time: if fields.len() > 6 {
                int_field(fields, 6, &context)?
            } else {
                0
            },
        })
    }
}

/// The exchange encodes prices as JSON strings and times as numbers; accept
/// both for every field.
fn num_field(fields: &[Value], index: usize, context: &str) -> Result<f64, RsiWatchError> {
    match &fields[index] {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| field_error(context, index, "number out of f64 range")),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| field_error(context, index, &format!("non-numeric value '{}'", s))),
        other => Err(field_error(
            context,
            index,
            &format!("unexpected type {:?}", other),
        )),
    }
}

fn int_field(fields: &[Value], index: usize, context: &str) -> Result<i64, RsiWatchError> {
    match &fields[index] {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| field_error(context, index, "number out of i64 range")),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| field_error(context, index, &format!("non-integer value '{}'", s))),
        other => Err(field_error(
            context,
            index,
            &format!("unexpected type {:?}", other),
        )),
    }
}

fn field_error(context: &str, index: usize, error: &str) -> RsiWatchError {
    RsiWatchError::malformed(context, format!("field {}: {}", index, error))
}

/// Parse a full kline response, preserving input order.
pub fn parse_klines(rows: &[Value]) -> Result<Vec<Candle>, RsiWatchError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| Candle::from_row(i, row))
        .collect()
}

/// Ordered closing prices, oldest first. Built once per cycle and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn from_closes(closes: Vec<f64>) -> Self {
        Self { closes }
    }

    pub fn from_candles(candles: &[Candle]) -> Self {
        Self {
            closes: candles.iter().map(|c| c.close).collect(),
        }
    }

    pub fn from_rows(rows: &[Value]) -> Result<Self, RsiWatchError> {
        Ok(Self::from_candles(&parse_klines(rows)?))
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close, if any.
    pub fn last(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}
