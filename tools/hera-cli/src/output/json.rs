//! JSON Output Formatting

use serde::Serialize;

use super::OutputFormat;

/// Format data as pretty JSON
pub fn format_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Format data as compact JSON (one line)
pub fn format_json_compact<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Format data as JSON in the requested flavour. `Table` falls back to
/// pretty JSON.
pub fn format_json<T: Serialize + ?Sized>(
    data: &T,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::JsonCompact => format_json_compact(data),
        OutputFormat::Json | OutputFormat::Table => format_json_pretty(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::validate::ValidationReport;
    use hera_codegen::{demo_app_pack, validate};

    #[test]
    fn test_json_formatting() {
        let pack = demo_app_pack();
        let report = ValidationReport::new(&pack, &validate(&pack));

        let pretty = format_json(&report, OutputFormat::Json).unwrap();
        assert!(pretty.contains("\"app_id\": \"dealer-ops\""), "{pretty}");
        assert!(pretty.contains('\n'));

        let compact = format_json(&report, OutputFormat::JsonCompact).unwrap();
        assert!(compact.contains("\"smart_code_errors\":0"), "{compact}");
        assert!(!compact.contains('\n'));
    }
}
