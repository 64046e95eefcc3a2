use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
}

/// One grid cell. `span` counts declared section columns, never points.
#[derive(Clone, Debug)]
pub struct Cell {
    pub text: String,
    pub span: u16,
    pub bold: bool,
    pub fill: bool,
    pub alignment: Alignment,
}

impl Cell {
    pub fn text(text: impl Into<String>, span: u16) -> Self {
        Self {
            text: text.into(),
            span,
            bold: false,
            fill: false,
            alignment: Alignment::Left,
        }
    }

    /// Bold label on a filled background, used for section titles and table heads.
    pub fn heading(text: impl Into<String>, span: u16) -> Self {
        Self {
            text: text.into(),
            span,
            bold: true,
            fill: true,
            alignment: Alignment::Left,
        }
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell spans must sum to exactly `columns`; anything else is a defect in
    /// the section template, surfaced at construction.
    pub fn new(cells: Vec<Cell>, columns: u16) -> Result<Self, Error> {
        if cells.iter().any(|c| c.span == 0) {
            return Err(Error::Layout("cell with zero colSpan".into()));
        }
        let total: u16 = cells.iter().map(|c| c.span).sum();
        if total != columns {
            return Err(Error::Layout(format!(
                "row spans sum to {total}, section declares {columns} columns"
            )));
        }
        Ok(Self { cells })
    }
}

/// A titled, fixed-column-count group of rows. The title is materialized as the
/// section's first row at build time.
#[derive(Clone, Debug)]
pub struct Section {
    pub title: String,
    pub columns: u16,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(title: impl Into<String>, columns: u16) -> Result<Self, Error> {
        let title = title.into();
        let title_row = Row::new(vec![Cell::heading(title.clone(), columns)], columns)?;
        Ok(Self {
            title,
            columns,
            rows: vec![title_row],
        })
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), Error> {
        self.rows.push(Row::new(cells, self.columns)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_rejects_span_mismatch() {
        let cells = vec![Cell::text("A", 2), Cell::text("B", 3)];
        assert!(Row::new(cells, 6).is_err());
    }

    #[test]
    fn row_rejects_zero_span() {
        let cells = vec![Cell::text("A", 0), Cell::text("B", 6)];
        assert!(Row::new(cells, 6).is_err());
    }

    #[test]
    fn row_accepts_exact_sum() {
        let cells = vec![Cell::text("A", 2), Cell::text("B", 4)];
        assert!(Row::new(cells, 6).is_ok());
    }

    #[test]
    fn section_starts_with_full_width_title_row() {
        let s = Section::new("EDUCATION", 4).unwrap();
        assert_eq!(s.rows.len(), 1);
        assert_eq!(s.rows[0].cells.len(), 1);
        assert_eq!(s.rows[0].cells[0].span, 4);
        assert!(s.rows[0].cells[0].bold);
        assert!(s.rows[0].cells[0].fill);
    }
}
