/// How a column pads its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column-aligned plain text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<(String, Alignment)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, header: impl Into<String>, alignment: Alignment) -> Self {
        self.headers.push((header.into(), alignment));
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        self.headers
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, ((_, alignment), width))| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                match alignment {
                    Alignment::Left => format!("{cell:<width$}"),
                    Alignment::Right => format!("{cell:>width$}"),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let header: Vec<String> = self.headers.iter().map(|(name, _)| name.clone()).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_cells_to_the_widest_value() {
        let mut table = Table::new()
            .column("Vendor", Alignment::Left)
            .column("Balance", Alignment::Right);
        table.row(vec!["Local Market".into(), "1,000.00".into()]);
        table.row(vec!["Electric Co.".into(), "0.00".into()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Vendor         Balance");
        assert_eq!(lines[1], "-".repeat(22));
        assert_eq!(lines[2], "Local Market  1,000.00");
        assert_eq!(lines[3], "Electric Co.      0.00");
    }
}
