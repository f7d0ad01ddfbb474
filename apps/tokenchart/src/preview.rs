use tokenchart_domain::entities::dataset::CombinedDataset;

/// Renders the first `limit` rows as a fixed-width table, index column first.
pub fn render_head(dataset: &CombinedDataset, limit: usize) -> String {
    let rows = dataset.head(limit);
    let mut out = format!(
        "{:>5}  {:<12} {:>14} {:>16} {:>20} {:>20}  {}\n",
        "", "coin", "timestamp", "price", "market_cap", "volume", "datetime"
    );
    for (idx, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>5}  {:<12} {:>14} {:>16.6} {:>20.2} {:>20.2}  {}\n",
            idx,
            row.coin,
            row.timestamp_ms,
            row.price,
            row.market_cap,
            row.volume,
            row.datetime_label()
        ));
    }
    if dataset.len() > rows.len() {
        out.push_str(&format!("... {} more rows\n", dataset.len() - rows.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_head;
    use tokenchart_domain::entities::dataset::CombinedDataset;
    use tokenchart_domain::services::normalizer::normalize;

    #[test]
    fn renders_header_rows_and_remainder() {
        let raw = serde_json::json!({
            "prices": [[1735689600000i64, 300.5], [1735776000000i64, 310.0]],
            "market_caps": [[1735689600000i64, 4.5e9], [1735776000000i64, 4.6e9]],
            "total_volumes": [[1735689600000i64, 2.0e8], [1735776000000i64, 2.1e8]]
        });
        let dataset = CombinedDataset::concat(vec![normalize(&raw, "aave").unwrap()]);

        let rendered = render_head(&dataset, 1);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("market_cap"));
        assert!(lines[1].contains("aave"));
        assert!(lines[1].contains("300.500000"));
        assert!(lines[1].ends_with("2025-01-01 00:00:00"));
        assert_eq!(lines[2], "... 1 more rows");
    }
}
