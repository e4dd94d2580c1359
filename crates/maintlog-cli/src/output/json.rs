//! JSON output formatting for records.

use serde::Serialize;

use maintlog_core::MaintenanceRecord;

/// Convert a record to JSON for output.
pub fn record_json(record: &MaintenanceRecord) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(record)?)
}

/// Convert multiple records to a JSON array for output.
pub fn records_json(records: &[&MaintenanceRecord]) -> anyhow::Result<serde_json::Value> {
    let values = records
        .iter()
        .map(|record| record_json(record))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(serde_json::Value::Array(values))
}

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_json_keeps_order_and_fields() {
        let first: MaintenanceRecord = serde_json::from_value(serde_json::json!({
            "id": "b",
            "machine_name": "Lathe-2",
            "created_at": "2025-03-02T00:00:00Z"
        }))
        .unwrap();
        let second: MaintenanceRecord = serde_json::from_value(serde_json::json!({
            "id": "a",
            "machine_name": "Press-1",
            "created_at": "2025-03-01T00:00:00Z"
        }))
        .unwrap();

        let value = records_json(&[&first, &second]).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["id"], "b");
        assert_eq!(array[1]["machine_name"], "Press-1");
        assert_eq!(array[1]["created_by"], "User");
    }
}
