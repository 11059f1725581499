use colored::Colorize;

use crate::cli::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub align: Align,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            align: Align::Left,
        }
    }

    pub fn numeric(header: impl Into<String>, width: usize) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(header, width)
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }
}

/// Renders [`Table`] instances using padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table) {
        if let Some(title) = &table.title {
            output::section(title);
        }
        for (index, line) in Self::lines(table).into_iter().enumerate() {
            if index == 0 {
                output::line(line.bold());
            } else {
                output::line(line);
            }
        }
    }

    /// Header, rule and body lines without styling.
    pub fn lines(table: &Table) -> Vec<String> {
        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([column.width, column.header.chars().count()])
                    .max()
                    .unwrap_or(column.width)
            })
            .collect();

        let format_row = |cells: &[String]| {
            table
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(index, (column, width))| {
                    let cell = cells.get(index).map(String::as_str).unwrap_or("");
                    match column.align {
                        Align::Left => format!("{cell:<width$}"),
                        Align::Right => format!("{cell:>width$}"),
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut lines = vec![format_row(&headers), "-".repeat(rule_width)];
        lines.extend(table.rows.iter().map(|row| format_row(row)));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_widen_to_fit_cells() {
        let mut table = Table::new(
            None::<String>,
            vec![TableColumn::new("Sector", 4), TableColumn::numeric("Rate", 4)],
        );
        table.add_row(vec!["Intensive Care", "91.5%"]);
        table.add_row(vec!["Ward A", "7.0%"]);

        let lines = TableRenderer::lines(&table);
        assert_eq!(lines[0], "Sector           Rate");
        assert_eq!(lines[1], "-".repeat(21));
        assert_eq!(lines[2], "Intensive Care  91.5%");
        assert_eq!(lines[3], "Ward A           7.0%");
    }
}
