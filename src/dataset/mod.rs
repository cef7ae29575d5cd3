mod types;

pub use types::*;

use chrono::Utc;
use tracing::debug;

impl Dataset {
    /// Parse an uploaded CSV file. The first record is the header row.
    pub fn from_csv(name: impl Into<String>, bytes: &[u8]) -> Result<Self, DatasetError> {
        let name = name.into();
        let text = std::str::from_utf8(bytes).map_err(|_| DatasetError::Encoding)?;
        if text.trim().is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_string)
            .collect();
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(DatasetError::Empty);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(
            "Parsed dataset '{}' with {} columns and {} rows",
            name,
            columns.len(),
            rows.len()
        );

        Ok(Self {
            name,
            columns,
            rows,
            uploaded_at: Utc::now(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.rows.iter().take(n).cloned().collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            name: self.name.clone(),
            columns: self.columns.clone(),
            row_count: self.row_count(),
            preview: self.preview(PREVIEW_ROWS),
            uploaded_at: self.uploaded_at,
        }
    }

    /// Render every row and column as a fixed-width, right-aligned table with
    /// a leading 0-based row index. Nothing is truncated. Line breaks and tabs
    /// inside a value are written as `\n`, `\r` and `\t` so each row stays on
    /// one line.
    pub fn render_table(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|h| escape(h)).collect();
        if self.rows.is_empty() {
            return format!(
                "Empty DataFrame\nColumns: [{}]\nIndex: []",
                columns.join(", ")
            );
        }

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| escape(cell)).collect())
            .collect();

        let index_labels: Vec<String> = (0..rows.len()).map(|i| i.to_string()).collect();
        let index_width = index_labels.iter().map(|l| width(l)).max().unwrap_or(0);

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(col, header)| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| width(cell))
                    .chain(std::iter::once(width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 1);

        let mut header_line = " ".repeat(index_width);
        for (header, w) in columns.iter().zip(&widths) {
            header_line.push_str("  ");
            header_line.push_str(&pad_left(header, *w));
        }
        lines.push(header_line);

        for (label, row) in index_labels.iter().zip(&rows) {
            let mut line = pad_left(label, index_width);
            for (col, w) in widths.iter().enumerate() {
                line.push_str("  ");
                line.push_str(&pad_left(row.get(col).map_or("", String::as_str), *w));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn malformed(err: csv::Error) -> DatasetError {
    let line = err.position().map_or(0, |p| p.line());
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { .. } => "invalid UTF-8 in field".to_string(),
        _ => err.to_string(),
    };
    DatasetError::Malformed { line, reason }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad_left(s: &str, w: usize) -> String {
    format!("{}{}", " ".repeat(w.saturating_sub(width(s))), s)
}
