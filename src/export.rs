//! Export renderers: CSV table and HTML report
//!
//! Pure serialization of already-computed results; nothing here recomputes
//! or mutates anything.

use std::fmt::Write as _;

use crate::catalog;
use crate::models::{ResultSet, TopologyPolicy, Totals};

const CSV_HEADER: &str =
    "domain,environment,throughput_mbps,storage_gb,topics,partitions,ecku,tier,monthly_cost,annual_cost";

/// Renders the tabular export: a `#`-prefixed summary block followed by one
/// CSV row per enabled (domain, environment) cell.
pub fn render_csv(results: &ResultSet, totals: &Totals, topology: TopologyPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Streaming capacity plan");
    let _ = writeln!(out, "# Topology: {}", topology.label());
    let _ = writeln!(out, "# Monthly total: {:.2}", totals.monthly_cost);
    let _ = writeln!(out, "# Annual total: {:.2}", totals.annual_cost);
    let _ = writeln!(out, "# Total ECKUs: {}", totals.ecku);
    let _ = writeln!(out, "# Total storage GB: {:.0}", totals.storage_gb);
    let _ = writeln!(out, "{}", CSV_HEADER);

    for (domain, cells) in results {
        for (env, cell) in cells {
            let _ = writeln!(
                out,
                "{},{},{:.2},{:.0},{},{},{},{},{:.2},{:.2}",
                catalog::domain_name(*domain),
                catalog::env_label(*env),
                cell.throughput_mbps,
                cell.storage_gb,
                cell.topics,
                cell.partitions,
                cell.ecku,
                cell.tier,
                cell.monthly_cost,
                cell.annual_cost,
            );
        }
    }
    out
}

/// Renders a standalone HTML report with the same summary and table.
pub fn render_html(results: &ResultSet, totals: &Totals, topology: TopologyPolicy) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n<title>Streaming capacity plan</title>\n");
    out.push_str(
        "<style>body{font-family:sans-serif;margin:2em}table{border-collapse:collapse}\
         th,td{border:1px solid #999;padding:4px 8px;text-align:right}\
         th:first-child,td:first-child,th:nth-child(2),td:nth-child(2){text-align:left}</style>\n",
    );
    out.push_str("</head>\n<body>\n<h1>Streaming capacity plan</h1>\n");

    let _ = writeln!(out, "<p>Topology: {}</p>", topology.label());
    out.push_str("<ul>\n");
    let _ = writeln!(out, "<li>Monthly total: {:.2}</li>", totals.monthly_cost);
    let _ = writeln!(out, "<li>Annual total: {:.2}</li>", totals.annual_cost);
    let _ = writeln!(out, "<li>Total ECKUs: {}</li>", totals.ecku);
    let _ = writeln!(out, "<li>Total storage: {:.0} GB</li>", totals.storage_gb);
    out.push_str("</ul>\n");

    out.push_str("<table>\n<tr>");
    for col in [
        "Domain",
        "Environment",
        "MB/s",
        "Storage GB",
        "Topics",
        "Partitions",
        "ECKU",
        "Tier",
        "ECKU cost",
        "Storage cost",
        "Monthly",
        "Annual",
    ] {
        let _ = write!(out, "<th>{}</th>", col);
    }
    out.push_str("</tr>\n");

    for (domain, cells) in results {
        for (env, cell) in cells {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.0}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td>\
                 <td>{:.2}</td><td>{:.2}</td></tr>",
                catalog::domain_name(*domain),
                catalog::env_label(*env),
                cell.throughput_mbps,
                cell.storage_gb,
                cell.topics,
                cell.partitions,
                cell.ecku,
                cell.tier,
                cell.monthly_ecku_cost,
                cell.monthly_storage_cost,
                cell.monthly_cost,
                cell.annual_cost,
            );
        }
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_input_set;
    use crate::models::{DomainId, EnvId};
    use crate::pricing::PricingTable;
    use crate::sizer::recompute;

    fn plan(topology: TopologyPolicy) -> (ResultSet, Totals) {
        recompute(&default_input_set(), topology, &PricingTable::default())
    }

    #[test]
    fn csv_has_summary_header_and_one_row_per_cell() {
        let (results, totals) = plan(TopologyPolicy::Shared);
        let csv = render_csv(&results, &totals, TopologyPolicy::Shared);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.iter().filter(|l| l.starts_with('#')).count(), 6);
        assert!(lines.contains(&CSV_HEADER));

        let cell_count: usize = results.values().map(|cells| cells.len()).sum();
        let data_rows = lines.len() - 7;
        assert_eq!(data_rows, cell_count);
        assert_eq!(cell_count, 20);

        assert!(csv.contains("# Topology: Single shared cluster"));
        assert!(csv.contains("Customer,Development,"));
    }

    #[test]
    fn csv_drops_rows_for_disabled_environments() {
        let mut inputs = default_input_set();
        if let Some(cfg) = inputs
            .domain_mut(DomainId::Mkt)
            .environments
            .get_mut(&EnvId::Dev)
        {
            cfg.enabled = false;
        }
        let (results, totals) =
            recompute(&inputs, TopologyPolicy::Shared, &PricingTable::default());
        let csv = render_csv(&results, &totals, TopologyPolicy::Shared);

        assert!(!csv.contains("Marketing,Development,"));
        assert!(csv.contains("Marketing,Test,"));
    }

    #[test]
    fn csv_rows_use_contract_precision() {
        let (results, totals) = plan(TopologyPolicy::Shared);
        let csv = render_csv(&results, &totals, TopologyPolicy::Shared);

        let row = csv
            .lines()
            .find(|l| l.starts_with("Customer,Production,"))
            .unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 10);
        // throughput: 2 decimals; storage: none; costs: 2 decimals
        assert_eq!(fields[2].split('.').nth(1).map(str::len), Some(2));
        assert!(!fields[3].contains('.'));
        assert_eq!(fields[8].split('.').nth(1).map(str::len), Some(2));
        assert_eq!(fields[9].split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn html_contains_summary_and_table() {
        let (results, totals) = plan(TopologyPolicy::PerDomain);
        let html = render_html(&results, &totals, TopologyPolicy::PerDomain);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Cluster per domain"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Payments</td>"));
        assert!(html.contains(&format!("<li>Total ECKUs: {}</li>", totals.ecku)));
        assert_eq!(html.matches("<tr>").count(), 21);
    }
}
