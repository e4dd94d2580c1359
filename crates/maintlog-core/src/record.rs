//! Maintenance record model.
//!
//! `MaintenanceRecord` is the only persisted entity. Its JSON form is a flat
//! snake_case object and is shared by the local slot and every remote
//! backend, so decoding is deliberately lenient: rows written by older
//! clients or by loosely typed backends (numeric ids, `null` columns,
//! quantities sent as strings) still load.

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{MaintlogError, Result};

/// Placeholder author used when no user name is configured.
pub const DEFAULT_CREATED_BY: &str = "User";

/// A material consumed or required by a maintenance job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    /// Material name
    pub name: String,

    /// Quantity required for the job
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity_needed: u32,

    /// Quantity on hand
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity_available: u32,
}

impl MaterialLine {
    pub fn new(name: impl Into<String>, quantity_needed: u32, quantity_available: u32) -> Self {
        Self {
            name: name.into(),
            quantity_needed,
            quantity_available,
        }
    }

    /// Build a line from raw form values.
    ///
    /// A line is only kept when both `name` and `needed` are present. An
    /// unparsable `needed` counts as 0; `available` falls back to 0 when it
    /// is absent or invalid.
    pub fn parse(name: &str, needed: &str, available: Option<&str>) -> Option<Self> {
        let name = name.trim();
        let needed = needed.trim();
        if name.is_empty() || needed.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            quantity_needed: parse_quantity(needed),
            quantity_available: available.map(parse_quantity).unwrap_or(0),
        })
    }
}

impl FromStr for MaterialLine {
    type Err = MaintlogError;

    /// Parse `name:needed[:available]`.
    fn from_str(value: &str) -> Result<Self> {
        let mut parts = value.splitn(3, ':');
        let name = parts.next().unwrap_or_default();
        let needed = parts.next().unwrap_or_default();
        let available = parts.next();
        Self::parse(name, needed, available).ok_or_else(|| {
            MaintlogError::InvalidInput(format!(
                "Invalid material \"{}\" (expected name:needed[:available])",
                value
            ))
        })
    }
}

/// Parse a form quantity the way an integer input field reads: leading
/// integer part, anything unreadable or negative is 0.
fn parse_quantity(value: &str) -> u32 {
    let value = value.trim();
    if let Ok(parsed) = value.parse::<u32>() {
        return parsed;
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc().min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// A maintenance log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Opaque identifier, unique within the local collection
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub machine_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub machine_section: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub machine_details: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_part_area: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub operator_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub maintenance_staff: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration_hours: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub needs_external_repair: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor_name: String,

    /// Older rows store this as `external_duration`.
    #[serde(default, alias = "external_duration", deserialize_with = "lenient_u32")]
    pub external_duration_days: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub materials: Vec<MaterialLine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotation_ref: Option<String>,

    /// Set once at creation. Rows without one decode as the Unix epoch.
    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default = "default_created_by", deserialize_with = "created_by_or_default")]
    pub created_by: String,
}

/// External repair details, only available when the record asks for one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalRepair<'a> {
    pub vendor_name: &'a str,
    pub duration_days: u32,
    pub quotation_ref: Option<&'a str>,
}

impl MaintenanceRecord {
    /// External repair details.
    ///
    /// Returns `None` whenever `needs_external_repair` is false, whatever the
    /// stored vendor, duration and quotation fields contain.
    pub fn external_repair(&self) -> Option<ExternalRepair<'_>> {
        if !self.needs_external_repair {
            return None;
        }
        Some(ExternalRepair {
            vendor_name: &self.vendor_name,
            duration_days: self.external_duration_days,
            quotation_ref: self.quotation_ref.as_deref(),
        })
    }

    /// Case-insensitive substring match over machine name, operator,
    /// section and sub-part area. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [
            &self.machine_name,
            &self.operator_name,
            &self.machine_section,
            &self.sub_part_area,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Form payload for creating or fully replacing a record.
///
/// Edits always resubmit the whole form; there is no partial patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordInput {
    pub machine_name: String,
    pub machine_section: String,
    pub sub_part_area: String,
    pub machine_details: String,
    pub operator_name: String,
    pub maintenance_staff: String,
    pub duration_hours: f64,
    pub description: String,
    pub needs_external_repair: bool,
    pub vendor_name: String,
    pub external_duration_days: u32,
    pub materials: Vec<MaterialLine>,
    pub image_ref: Option<String>,
    pub quotation_ref: Option<String>,
}

impl RecordInput {
    pub fn new(
        machine_name: impl Into<String>,
        machine_section: impl Into<String>,
        sub_part_area: impl Into<String>,
    ) -> Self {
        Self {
            machine_name: machine_name.into(),
            machine_section: machine_section.into(),
            sub_part_area: sub_part_area.into(),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.machine_details = details.into();
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator_name = operator.into();
        self
    }

    pub fn with_staff(mut self, staff: impl Into<String>) -> Self {
        self.maintenance_staff = staff.into();
        self
    }

    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_external_repair(mut self, vendor: impl Into<String>, days: u32) -> Self {
        self.needs_external_repair = true;
        self.vendor_name = vendor.into();
        self.external_duration_days = days;
        self
    }

    pub fn with_material(mut self, line: MaterialLine) -> Self {
        self.materials.push(line);
        self
    }

    pub fn with_image_ref(mut self, reference: impl Into<String>) -> Self {
        self.image_ref = Some(reference.into());
        self
    }

    pub fn with_quotation_ref(mut self, reference: impl Into<String>) -> Self {
        self.quotation_ref = Some(reference.into());
        self
    }

    /// Check required fields and numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns `MaintlogError::Validation` if machine name, section or
    /// sub-part area is empty, or if the duration is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("machine name", &self.machine_name),
            ("machine section", &self.machine_section),
            ("sub-part area", &self.sub_part_area),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

        if !missing.is_empty() {
            return Err(MaintlogError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        if !self.duration_hours.is_finite() || self.duration_hours < 0.0 {
            return Err(MaintlogError::Validation(format!(
                "Duration must be a non-negative number of hours (got {})",
                self.duration_hours
            )));
        }

        Ok(())
    }

    /// Turn validated input into a stored record with the given identity.
    pub(crate) fn into_record(
        self,
        id: String,
        created_at: DateTime<Utc>,
        created_by: String,
    ) -> MaintenanceRecord {
        MaintenanceRecord {
            id,
            machine_name: self.machine_name,
            machine_section: self.machine_section,
            machine_details: self.machine_details,
            sub_part_area: self.sub_part_area,
            operator_name: self.operator_name,
            maintenance_staff: self.maintenance_staff,
            duration_hours: self.duration_hours,
            description: self.description,
            needs_external_repair: self.needs_external_repair,
            vendor_name: self.vendor_name,
            external_duration_days: self.external_duration_days,
            materials: self.materials,
            image_ref: self.image_ref,
            quotation_ref: self.quotation_ref,
            created_at,
            created_by,
        }
    }
}

impl From<&MaintenanceRecord> for RecordInput {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            machine_name: record.machine_name.clone(),
            machine_section: record.machine_section.clone(),
            sub_part_area: record.sub_part_area.clone(),
            machine_details: record.machine_details.clone(),
            operator_name: record.operator_name.clone(),
            maintenance_staff: record.maintenance_staff.clone(),
            duration_hours: record.duration_hours,
            description: record.description.clone(),
            needs_external_repair: record.needs_external_repair,
            vendor_name: record.vendor_name.clone(),
            external_duration_days: record.external_duration_days,
            materials: record.materials.clone(),
            image_ref: record.image_ref.clone(),
            quotation_ref: record.quotation_ref.clone(),
        }
    }
}

/// Fresh time-ordered record id.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Embedded-binary attachment reference (`data:<mime>;base64,<payload>`).
pub fn embed_data_uri(bytes: &[u8], mime_type: &str) -> String {
    let mime_type = if mime_type.trim().is_empty() {
        "application/octet-stream"
    } else {
        mime_type.trim()
    };
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

fn default_created_by() -> String {
    DEFAULT_CREATED_BY.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn created_by_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(default_created_by))
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) if !value.is_empty() => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a non-empty string or a number, got {}",
            other
        ))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(value) => value.as_f64(),
        serde_json::Value::String(value) => value.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0))
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(value) => value
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| value.as_f64().map(|v| parse_quantity(&v.to_string())))
            .unwrap_or(0),
        serde_json::Value::String(value) => parse_quantity(&value),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MaintenanceRecord {
        RecordInput::new("Press-1", "Line A", "Motor")
            .with_operator("Dana")
            .with_duration_hours(2.5)
            .into_record("rec-1".to_string(), Utc::now(), "User".to_string())
    }

    #[test]
    fn test_missing_created_at_decodes_as_epoch_every_time() {
        let row = serde_json::json!({
            "id": "legacy",
            "machine_name": "Press-1",
            "machine_section": "Line A",
            "sub_part_area": "Motor"
        });
        let first: MaintenanceRecord = serde_json::from_value(row.clone()).unwrap();
        let second: MaintenanceRecord = serde_json::from_value(row).unwrap();

        assert_eq!(first.created_at.timestamp(), 0);
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn test_validate_rejects_each_missing_required_field() {
        let cases = [
            RecordInput::new("", "Line A", "Motor"),
            RecordInput::new("Press-1", "  ", "Motor"),
            RecordInput::new("Press-1", "Line A", ""),
        ];
        for input in cases {
            let err = input.validate().unwrap_err();
            assert!(matches!(err, MaintlogError::Validation(_)));
        }
    }

    #[test]
    fn test_validate_lists_all_missing_fields() {
        let err = RecordInput::default().validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("machine name"));
        assert!(message.contains("machine section"));
        assert!(message.contains("sub-part area"));
    }

    #[test]
    fn test_validate_rejects_negative_duration() {
        let input = RecordInput::new("Press-1", "Line A", "Motor").with_duration_hours(-1.0);
        assert!(matches!(
            input.validate(),
            Err(MaintlogError::Validation(_))
        ));
        let input = RecordInput::new("Press-1", "Line A", "Motor").with_duration_hours(f64::NAN);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_material_line_requires_name_and_needed() {
        assert!(MaterialLine::parse("", "2", Some("1")).is_none());
        assert!(MaterialLine::parse("Bearing", "", Some("1")).is_none());

        let line = MaterialLine::parse("Bearing", "2", None).unwrap();
        assert_eq!(line, MaterialLine::new("Bearing", 2, 0));
    }

    #[test]
    fn test_material_line_invalid_quantities_become_zero() {
        let line = MaterialLine::parse("Belt", "lots", Some("-3")).unwrap();
        assert_eq!(line.quantity_needed, 0);
        assert_eq!(line.quantity_available, 0);

        let line = MaterialLine::parse("Belt", "4.7", Some("x")).unwrap();
        assert_eq!(line.quantity_needed, 4);
        assert_eq!(line.quantity_available, 0);
    }

    #[test]
    fn test_material_line_from_str() {
        let line: MaterialLine = "Grease:3:1".parse().unwrap();
        assert_eq!(line, MaterialLine::new("Grease", 3, 1));

        let line: MaterialLine = "Grease:3".parse().unwrap();
        assert_eq!(line.quantity_available, 0);

        assert!("Grease".parse::<MaterialLine>().is_err());
    }

    #[test]
    fn test_external_repair_suppressed_when_not_needed() {
        let mut record = sample_record();
        record.vendor_name = "Acme Rewinds".to_string();
        record.external_duration_days = 5;
        assert!(record.external_repair().is_none());

        record.needs_external_repair = true;
        let repair = record.external_repair().unwrap();
        assert_eq!(repair.vendor_name, "Acme Rewinds");
        assert_eq!(repair.duration_days, 5);
    }

    #[test]
    fn test_matches_is_case_insensitive_over_four_fields() {
        let record = sample_record();
        assert!(record.matches("press"));
        assert!(record.matches("line a"));
        assert!(record.matches("mot"));
        assert!(record.matches("dana"));
        assert!(record.matches(""));
        assert!(!record.matches("lathe"));
    }

    #[test]
    fn test_matches_ignores_description() {
        let mut record = sample_record();
        record.description = "replaced lathe belt".to_string();
        assert!(!record.matches("lathe"));
    }

    #[test]
    fn test_decode_sparse_remote_row() {
        let json = serde_json::json!({
            "id": 1718000000000u64,
            "machine_name": "Lathe-2",
            "machine_section": "Line B",
            "sub_part_area": "Chuck",
            "operator_name": null,
            "duration_hours": "1.5",
            "external_duration": 4,
            "needs_external_repair": true,
            "materials": null,
            "created_at": "2025-01-02T03:04:05Z",
            "created_by": null
        });

        let record: MaintenanceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, "1718000000000");
        assert_eq!(record.operator_name, "");
        assert_eq!(record.duration_hours, 1.5);
        assert_eq!(record.external_duration_days, 4);
        assert!(record.materials.is_empty());
        assert_eq!(record.created_by, DEFAULT_CREATED_BY);
    }

    #[test]
    fn test_decode_rejects_missing_id() {
        let json = serde_json::json!({ "machine_name": "Lathe-2" });
        assert!(serde_json::from_value::<MaintenanceRecord>(json).is_err());
    }

    #[test]
    fn test_serialize_omits_absent_refs() {
        let record = sample_record();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("image_ref").is_none());
        assert!(value.get("quotation_ref").is_none());
        assert_eq!(value["machine_name"], "Press-1");
    }

    #[test]
    fn test_record_input_round_trips_form_fields() {
        let record = sample_record();
        let input = RecordInput::from(&record);
        assert_eq!(input.machine_name, record.machine_name);
        assert_eq!(input.operator_name, record.operator_name);
        assert_eq!(input.duration_hours, record.duration_hours);
    }

    #[test]
    fn test_new_record_ids_are_unique() {
        let first = new_record_id();
        let second = new_record_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_embed_data_uri() {
        assert_eq!(embed_data_uri(b"hi", "text/plain"), "data:text/plain;base64,aGk=");
        assert!(embed_data_uri(b"hi", "").starts_with("data:application/octet-stream;base64,"));
    }
}
