//! Form flags applied on top of a `RecordInput`.

use maintlog_core::{RecordInput, RecordStore};

use crate::cli::FormArgs;
use crate::helpers::{parse_materials, read_attachment};

fn set(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

/// Overlay the text, numeric and external-repair flags onto `input`.
///
/// `--vendor` and `--external-days` imply `--external`.
pub fn apply_fields(form: &FormArgs, input: &mut RecordInput) -> anyhow::Result<()> {
    set(&mut input.machine_name, &form.machine);
    set(&mut input.machine_section, &form.section);
    set(&mut input.sub_part_area, &form.sub_part);
    set(&mut input.machine_details, &form.details);
    set(&mut input.operator_name, &form.operator);
    set(&mut input.maintenance_staff, &form.staff);
    set(&mut input.description, &form.description);
    if let Some(hours) = form.hours {
        input.duration_hours = hours;
    }

    if form.external || form.vendor.is_some() || form.external_days.is_some() {
        input.needs_external_repair = true;
    }
    set(&mut input.vendor_name, &form.vendor);
    if let Some(days) = form.external_days {
        input.external_duration_days = days;
    }

    input.materials.extend(parse_materials(&form.material)?);
    Ok(())
}

/// Read and store the `--image` and `--quotation` files.
pub async fn apply_attachments(
    store: &RecordStore,
    form: &FormArgs,
    input: &mut RecordInput,
) -> anyhow::Result<()> {
    if let Some(path) = form.image.as_deref() {
        let file = read_attachment(path)?;
        input.image_ref = Some(store.attach(&file.bytes, &file.name, file.mime_type).await);
    }
    if let Some(path) = form.quotation.as_deref() {
        let file = read_attachment(path)?;
        input.quotation_ref = Some(store.attach(&file.bytes, &file.name, file.mime_type).await);
    }
    Ok(())
}
