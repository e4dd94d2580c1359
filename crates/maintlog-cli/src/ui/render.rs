//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, NOTHING, UTF8_FULL};
use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::context::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Maintlog · command (context)"
/// Plain mode: "maintlog command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Maintlog", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("maintlog {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", plain_key(key), value)
    }
}

/// `Sub-part Area` becomes `sub_part_area`.
fn plain_key(key: &str) -> String {
    key.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Render a hint line.
///
/// Pretty mode: "Hint: text" with dim styling
/// Plain mode: "hint=text"
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Render a bordered table.
///
/// Pretty mode: Styled table with borders
/// Plain mode: Tab-separated values (no header)
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width.min(u16::MAX as usize) as u16);

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}

/// Render a simple table without borders (for record lists).
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }

    let mut table = ComfyTable::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| {
            let mut cell = Cell::new(c.header);
            if ctx.color {
                cell = cell.add_attribute(Attribute::Dim);
            }
            cell
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..columns.len() {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }

    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}

/// Cells may contain spaces, so plain rows are tab-separated.
fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a message to stdout unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }

    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header_pretty() {
        let h = header(&pretty_ctx(), "search", Some("press"));
        assert!(h.contains("Maintlog"));
        assert!(h.contains("search (press)"));
    }

    #[test]
    fn test_header_plain() {
        assert_eq!(header(&plain_ctx(), "list", None), "maintlog list");
    }

    #[test]
    fn test_badge_ok() {
        let b = badge(&plain_ctx(), Badge::Ok, "Done");
        assert_eq!(b, "[OK] Done");
    }

    #[test]
    fn test_kv_pretty() {
        let line = kv(&pretty_ctx(), "Machine", "Press-1");
        assert_eq!(line, "Machine: Press-1");
    }

    #[test]
    fn test_kv_plain_keys() {
        let ctx = plain_ctx();
        assert_eq!(kv(&ctx, "Sub-part Area", "Motor"), "sub_part_area=Motor");
        assert_eq!(kv(&ctx, "Duration (h)", "2.5"), "duration_h=2.5");
    }

    #[test]
    fn test_hint_modes() {
        assert_eq!(hint(&plain_ctx(), "try this"), "hint=try this");
        assert_eq!(hint(&pretty_ctx(), "try this"), "Hint: try this");
    }

    #[test]
    fn test_table_plain_is_tab_separated() {
        let columns = [Column::new("Machine"), Column::new("Section")];
        let rows = vec![vec!["Press 1".to_string(), "Line A".to_string()]];
        assert_eq!(table(&plain_ctx(), &columns, &rows), "Press 1\tLine A");
    }

    #[test]
    fn test_table_pretty_has_headers_and_cells() {
        let columns = [Column::new("Machine"), Column::new("Section")];
        let rows = vec![vec!["Press-1".to_string(), "Line A".to_string()]];
        let t = table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("Machine"));
        assert!(t.contains("Press-1"));
        assert!(t.contains("Line A"));
    }

    #[test]
    fn test_table_empty_rows_keeps_headers() {
        let columns = [Column::new("ID"), Column::new("Machine")];
        let t = table(&pretty_ctx(), &columns, &[]);
        assert!(t.contains("ID"));
        assert!(t.contains("Machine"));
    }

    #[test]
    fn test_simple_table_plain_has_no_header() {
        let columns = [Column::new("ID"), Column::new("Machine")];
        let rows = vec![
            vec!["0192f1d2".to_string(), "Press-1".to_string()],
            vec!["0192f1d3".to_string(), "Lathe-2".to_string()],
        ];
        let t = simple_table(&plain_ctx(), &columns, &rows);
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines, vec!["0192f1d2\tPress-1", "0192f1d3\tLathe-2"]);
    }

    #[test]
    fn test_simple_table_pretty_has_header() {
        let columns = [Column::new("ID"), Column::new("Machine")];
        let rows = vec![vec!["0192f1d2".to_string(), "Press-1".to_string()]];
        let t = simple_table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("ID"));
        assert!(t.contains("Press-1"));
    }

    #[test]
    fn test_receipt_modes() {
        let items = [("ID", "0192f1d2"), ("Machine", "Press-1")];
        let r = receipt(&pretty_ctx(), "Record added", &items);
        assert!(r.contains("[\u{2713}] Record added"));
        assert!(r.contains("  Machine: Press-1"));

        let r = receipt(&plain_ctx(), "Record added", &items);
        assert_eq!(r, "status=ok\nid=0192f1d2\nmachine=Press-1");
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&pretty_ctx(), "Record abc not found", Some("Run `maintlog list`"));
        assert!(e.contains("[\u{2717}] Record abc not found"));
        assert!(e.contains("Hint: Run `maintlog list`"));

        let e = error_message(&plain_ctx(), "Record abc not found", None);
        assert_eq!(e, "error=Record abc not found");
    }
}
