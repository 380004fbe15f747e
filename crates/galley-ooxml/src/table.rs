//! Table model and cell operations
//!
//! A cell is a mini body: it owns an ordered list of paragraphs. Every row
//! of a table must hold the same number of cells when the document is
//! serialized; [`Table::normalize`] restores that invariant by padding
//! short rows with empty cells.

use crate::document::{Block, Document, Paragraph};
use crate::error::{OoxmlError, Result};

/// Table width setting (`w:tblW` / `w:tcW`)
#[derive(Debug, Clone, PartialEq)]
pub struct TableWidth {
    /// Width type: "auto", "dxa", or "pct"
    pub width_type: String,
    /// Width value as the raw attribute string
    pub width: String,
}

impl TableWidth {
    /// Automatic width
    pub fn auto() -> Self {
        Self {
            width_type: "auto".to_string(),
            width: "0".to_string(),
        }
    }
}

/// Table-level properties (`w:tblPr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableProps {
    /// Table style id
    pub style: Option<String>,
    pub width: Option<TableWidth>,
}

/// Cell-level properties (`w:tcPr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellProps {
    pub width: Option<TableWidth>,
}

/// A table cell (`w:tc`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub props: Option<CellProps>,
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    /// A cell holding one empty paragraph
    pub fn empty() -> Self {
        Self {
            props: None,
            paragraphs: vec![Paragraph::from_text("")],
        }
    }

    /// Concatenated text of all paragraphs in the cell
    pub fn text(&self) -> String {
        self.paragraphs.iter().map(|p| p.text()).collect()
    }
}

/// A table row (`w:tr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// A row of `cols` empty cells
    pub fn empty(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| TableCell::empty()).collect(),
        }
    }
}

/// A table (`w:tbl`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub props: Option<TableProps>,
    /// Grid column widths as raw attribute strings
    pub grid: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table of empty cells
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            props: Some(TableProps {
                style: None,
                width: Some(TableWidth::auto()),
            }),
            grid: vec![String::new(); cols],
            rows: (0..rows).map(|_| TableRow::empty(cols)).collect(),
        }
    }

    /// Set the text of a cell, replacing its content with a single run
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: impl Into<String>) -> Result<()> {
        let row = self
            .rows
            .get_mut(row)
            .ok_or(OoxmlError::RowOutOfRange(row))?;
        let cell = row
            .cells
            .get_mut(col)
            .ok_or(OoxmlError::ColumnOutOfRange(col))?;
        cell.paragraphs = vec![Paragraph::from_text(text)];
        Ok(())
    }

    /// Get the concatenated text of a cell
    pub fn cell_text(&self, row: usize, col: usize) -> Result<String> {
        let row = self.rows.get(row).ok_or(OoxmlError::RowOutOfRange(row))?;
        let cell = row
            .cells
            .get(col)
            .ok_or(OoxmlError::ColumnOutOfRange(col))?;
        Ok(cell.text())
    }

    /// Append a row with the same cell count as the first row
    pub fn add_row(&mut self) {
        let cols = self.column_count();
        if cols == 0 {
            return;
        }
        self.rows.push(TableRow::empty(cols));
    }

    /// Delete the row at `index`
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(OoxmlError::RowOutOfRange(index));
        }
        self.rows.remove(index);
        Ok(())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell count of the first row
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Restore row uniformity: pad every row to the widest cell count
    pub fn normalize(&mut self) {
        let widest = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        for row in &mut self.rows {
            while row.cells.len() < widest {
                row.cells.push(TableCell::empty());
            }
        }
    }
}

impl Document {
    /// Append a table of empty cells and return a mutable reference to it
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        self.body.push(Block::Table(Table::empty(rows, cols)));
        match self.body.last_mut() {
            Some(Block::Table(table)) => table,
            _ => unreachable!("table was just pushed"),
        }
    }

    /// Get the table at `index` (counting tables only)
    pub fn table(&self, index: usize) -> Result<&Table> {
        self.tables()
            .nth(index)
            .ok_or(OoxmlError::TableOutOfRange(index))
    }

    /// Get the table at `index` mutably
    pub fn table_mut(&mut self, index: usize) -> Result<&mut Table> {
        self.body
            .iter_mut()
            .filter_map(|block| match block {
                Block::Table(t) => Some(t),
                Block::Paragraph(_) => None,
            })
            .nth(index)
            .ok_or(OoxmlError::TableOutOfRange(index))
    }
}
