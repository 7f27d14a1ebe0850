use std::fmt::{self, Write};

/// Cells that would otherwise be empty are rendered with this placeholder so
/// that every row keeps the same number of whitespace-separated fields.
const EMPTY_CELL: &str = "-";

/// Replaces whitespace inside body cells.
const WHITESPACE_REPLACEMENT: &str = "_";

pub(crate) struct Row {
    cells: Vec<String>,
}

impl Row {
    fn is_awk_safe(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.contains(|c: char| c.is_whitespace()))
    }

    /// Collapses each run of whitespace in every cell into a single
    /// [`WHITESPACE_REPLACEMENT`], so a cell is always one awk field.
    fn make_awk_safe(&mut self) {
        for cell in self.cells.iter_mut() {
            if !cell.contains(|c: char| c.is_whitespace()) {
                continue;
            }

            *cell = cell
                .split_whitespace()
                .collect::<Vec<&str>>()
                .join(WHITESPACE_REPLACEMENT);

            if cell.is_empty() {
                *cell = EMPTY_CELL.to_string();
            }
        }
    }

    fn columns(&self) -> usize {
        self.cells.len()
    }
}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        let cells = value
            .into_iter()
            .map(|cell| {
                if cell.is_empty() {
                    EMPTY_CELL.to_string()
                } else {
                    cell
                }
            })
            .collect();

        Row { cells }
    }
}

impl From<Vec<&str>> for Row {
    fn from(value: Vec<&str>) -> Self {
        let value: Vec<String> = value.into_iter().map(|s| s.to_owned()).collect();

        value.into()
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("table has {expected} columns but a row with {found} columns was inserted")]
    ColumnMismatch { expected: usize, found: usize },
    #[error("table header is not awk safe, it contains whitespace")]
    HeaderNotAwkSafe,
}

pub(crate) struct Table {
    body: Vec<Row>,
    header: Option<Row>,
    num_columns: Option<usize>,
    print_header: bool,
}

impl Table {
    pub(crate) fn new() -> Table {
        Table {
            body: Vec::new(),
            header: None,
            num_columns: None,
            print_header: true,
        }
    }

    fn expect_num_columns(&mut self, found: usize) -> Result<(), Error> {
        match self.num_columns {
            Some(expected) if expected != found => Err(Error::ColumnMismatch { expected, found }),
            Some(_) => Ok(()),
            None => {
                self.num_columns = Some(found);
                Ok(())
            }
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    pub(crate) fn add_row<R: Into<Row>>(&mut self, row: R) -> Result<(), Error> {
        let mut row: Row = row.into();

        row.make_awk_safe();

        self.expect_num_columns(row.columns())?;

        self.body.push(row);

        Ok(())
    }

    pub(crate) fn set_header<R: Into<Row>>(&mut self, header: R) -> Result<(), Error> {
        let header = header.into();

        if !header.is_awk_safe() {
            return Err(Error::HeaderNotAwkSafe);
        }

        self.expect_num_columns(header.columns())?;

        self.header.replace(header);

        Ok(())
    }

    fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        let header = if self.print_header {
            self.header.as_ref()
        } else {
            None
        };

        header.into_iter().chain(self.body.iter())
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0usize; self.num_columns.unwrap_or(0)];

        for row in self.visible_rows() {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        for row in self.visible_rows() {
            let last = row.cells.len().saturating_sub(1);

            for (i, cell) in row.cells.iter().enumerate() {
                if i == last {
                    // No trailing padding on the last column
                    f.write_str(cell)?;
                } else {
                    write!(f, "{:<width$}  ", cell, width = widths[i])?;
                }
            }

            f.write_char('\n')?;
        }

        Ok(())
    }
}
