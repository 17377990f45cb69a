use anyhow::Result;
use std::io::Write;

use crate::report::DashboardReport;

pub fn export_json(report: &DashboardReport, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;

    #[test]
    fn test_export_json_compact_and_pretty() {
        let report = DashboardReport::new("proj", &Dashboard::default(), None);

        let mut compact = Vec::new();
        export_json(&report, false, &mut compact).unwrap();
        let mut pretty = Vec::new();
        export_json(&report, true, &mut pretty).unwrap();

        let compact = String::from_utf8(compact).unwrap();
        let pretty = String::from_utf8(pretty).unwrap();
        assert_eq!(compact.lines().count(), 1);
        assert!(pretty.lines().count() > 1);
        assert!(compact.contains(r#""project":"proj""#));
    }
}
