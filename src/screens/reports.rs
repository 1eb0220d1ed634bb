use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ClientError;
use crate::screens::ScreenContext;

const LABEL_KEYS: [&str; 4] = ["label", "_id", "name", "date"];
const VALUE_KEYS: [&str; 4] = ["value", "count", "total", "amount"];
const ROW_KEYS: [&str; 4] = ["data", "items", "results", "rows"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    Attendance,
    Revenue,
    Membership,
    Classes,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Attendance,
        ReportKind::Revenue,
        ReportKind::Membership,
        ReportKind::Classes,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ReportKind::Attendance => "reports/attendance",
            ReportKind::Revenue => "reports/revenue",
            ReportKind::Membership => "reports/membership",
            ReportKind::Classes => "reports/classes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Attendance => "Attendance",
            ReportKind::Revenue => "Revenue",
            ReportKind::Membership => "Memberships",
            ReportKind::Classes => "Class popularity",
        }
    }
}

/// Chart-ready data: `labels[i]` pairs with `values[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Accepts a list of rows, a wrapped list of rows, pre-split
    /// `{labels, values}` arrays, or a flat `{label: number}` object.
    pub fn from_value(value: &Value) -> Result<Self, ClientError> {
        match value {
            Value::Array(rows) => Self::from_rows(rows),
            Value::Object(map) => {
                if let Some(rows) = ROW_KEYS.iter().find_map(|k| map.get(*k).and_then(Value::as_array)) {
                    return Self::from_rows(rows);
                }
                if let (Some(Value::Array(labels)), Some(Value::Array(values))) =
                    (map.get("labels"), map.get("values"))
                {
                    return Ok(Self {
                        labels: labels.iter().map(label_text).collect(),
                        values: values.iter().map(|v| number(v).unwrap_or(0.0)).collect(),
                    });
                }
                let mut series = Self::default();
                for (label, value) in map {
                    let Some(value) = number(value) else {
                        return Err(unexpected(value));
                    };
                    series.labels.push(label.clone());
                    series.values.push(value);
                }
                Ok(series)
            }
            other => Err(unexpected(other)),
        }
    }

    fn from_rows(rows: &[Value]) -> Result<Self, ClientError> {
        let mut series = Self::default();
        for row in rows {
            let Value::Object(fields) = row else {
                return Err(unexpected(row));
            };
            let label = LABEL_KEYS
                .iter()
                .find_map(|k| fields.get(*k).filter(|v| !v.is_null()))
                .map(label_text)
                .unwrap_or_default();
            let value = VALUE_KEYS
                .iter()
                .find_map(|k| fields.get(*k).and_then(number))
                .unwrap_or(0.0);
            series.labels.push(label);
            series.values.push(value);
        }
        Ok(series)
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn unexpected(value: &Value) -> ClientError {
    ClientError::UnexpectedResponse(format!("cannot chart report data: {value}"))
}

#[derive(Debug)]
pub struct ReportsScreen {
    ctx: ScreenContext,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    series: BTreeMap<ReportKind, ChartSeries>,
}

impl ReportsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            start: None,
            end: None,
            series: BTreeMap::new(),
        }
    }

    pub fn set_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
    }

    pub fn series(&self, kind: ReportKind) -> Option<&ChartSeries> {
        self.series.get(&kind)
    }

    async fn fetch(&self, kind: ReportKind) -> Result<ChartSeries, ClientError> {
        let mut query = Vec::new();
        if let Some(start) = self.start {
            query.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            query.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        let value: Value = self.ctx.api.get_json_with(kind.path(), &query).await?;
        ChartSeries::from_value(&value)
    }

    /// Loads one report. A failure is alerted and leaves an empty series.
    pub async fn load(&mut self, kind: ReportKind) -> ChartSeries {
        let series = match self.fetch(kind).await {
            Ok(series) => series,
            Err(err) => {
                self.ctx.fail(err);
                ChartSeries::default()
            }
        };
        self.series.insert(kind, series.clone());
        series
    }

    pub async fn load_all(&mut self) {
        for kind in ReportKind::ALL {
            self.load(kind).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_with_mixed_keys() {
        let value = json!([
            {"_id": "2025-01-06", "count": 14},
            {"label": "Tuesday", "value": "9"},
            {"name": "Spin", "total": 3.5},
        ]);
        let series = ChartSeries::from_value(&value).unwrap();
        assert_eq!(series.labels, vec!["2025-01-06", "Tuesday", "Spin"]);
        assert_eq!(series.values, vec![14.0, 9.0, 3.5]);
    }

    #[test]
    fn test_wrapped_rows() {
        let value = json!({"data": [{"date": "2025-01", "amount": 1200}]});
        let series = ChartSeries::from_value(&value).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.sum(), 1200.0);
    }

    #[test]
    fn test_split_arrays_and_flat_map() {
        let split = json!({"labels": ["a", "b"], "values": [1, 2]});
        assert_eq!(ChartSeries::from_value(&split).unwrap().values, vec![1.0, 2.0]);

        let flat = json!({"active": 10, "expired": 4});
        let series = ChartSeries::from_value(&flat).unwrap();
        assert_eq!(series.labels, vec!["active", "expired"]);
    }

    #[test]
    fn test_rejects_scalars() {
        assert!(ChartSeries::from_value(&json!(42)).is_err());
        assert!(ChartSeries::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_paths() {
        assert_eq!(ReportKind::Membership.path(), "reports/membership");
    }
}
