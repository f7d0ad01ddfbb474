use crate::value_objects::market_row::NormalizedRow;

/// Row-concatenation of every successfully normalized token in a run.
///
/// Order is token iteration order, then the provider's order within a token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedDataset {
    rows: Vec<NormalizedRow>,
}

impl CombinedDataset {
    pub fn concat(parts: Vec<Vec<NormalizedRow>>) -> Self {
        let total = parts.iter().map(Vec::len).sum();
        let mut rows = Vec::with_capacity(total);
        for part in parts {
            rows.extend(part);
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[NormalizedRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Distinct coin names in first-seen order.
    pub fn coins(&self) -> Vec<&str> {
        let mut coins: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !coins.contains(&row.coin.as_str()) {
                coins.push(row.coin.as_str());
            }
        }
        coins
    }

    pub fn rows_for<'a>(&'a self, coin: &'a str) -> impl Iterator<Item = &'a NormalizedRow> + 'a {
        self.rows.iter().filter(move |row| row.coin == coin)
    }
}

#[cfg(test)]
mod tests {
    use super::CombinedDataset;
    use crate::value_objects::market_row::NormalizedRow;
    use chrono::DateTime;

    fn row(coin: &str, ts: i64) -> NormalizedRow {
        NormalizedRow {
            coin: coin.to_string(),
            timestamp_ms: ts,
            price: 1.0,
            market_cap: 2.0,
            volume: 3.0,
            datetime: DateTime::from_timestamp_millis(ts).unwrap(),
        }
    }

    #[test]
    fn concat_keeps_part_order() {
        let dataset = CombinedDataset::concat(vec![
            vec![row("aave", 1), row("aave", 2)],
            vec![],
            vec![row("cronos", 1)],
        ]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.coins(), vec!["aave", "cronos"]);
        assert_eq!(dataset.rows_for("aave").count(), 2);
        assert_eq!(dataset.head(10).len(), 3);
        assert_eq!(dataset.head(1)[0].timestamp_ms, 1);
    }
}
