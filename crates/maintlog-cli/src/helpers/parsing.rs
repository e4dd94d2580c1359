//! Parsing helpers for material flags, output format and MIME types.

use std::path::Path;

use maintlog_core::MaterialLine;

use crate::errors::CliError;

/// List output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(CliError::invalid_input(format!(
            "Unsupported format: {} (use table or plain)",
            other
        ))
        .into()),
    }
}

/// Parse repeated `--material name:needed[:available]` flags.
pub fn parse_materials(values: &[String]) -> anyhow::Result<Vec<MaterialLine>> {
    values
        .iter()
        .map(|value| value.parse::<MaterialLine>().map_err(anyhow::Error::from))
        .collect()
}

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maintlog_core::MaintlogError;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(
            parse_output_format(Some("plain")).unwrap(),
            Some(OutputFormat::Plain)
        );
        let err = parse_output_format(Some("yaml")).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_parse_materials() {
        let values = vec!["Bearing:2:1".to_string(), "Grease:3".to_string()];
        let lines = parse_materials(&values).unwrap();
        assert_eq!(lines[0], MaterialLine::new("Bearing", 2, 1));
        assert_eq!(lines[1], MaterialLine::new("Grease", 3, 0));
    }

    #[test]
    fn test_parse_materials_rejects_missing_quantity() {
        let err = parse_materials(&["Bearing".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MaintlogError>(),
            Some(MaintlogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("motor.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("quote.pdf")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("blob")), "application/octet-stream");
    }
}
