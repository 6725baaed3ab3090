//! In-process worksheet model shared by the local grid implementations

use serde::{Deserialize, Serialize};

use super::{GridError, GridResult, Row};

/// A titled worksheet: an ordered list of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    pub rows: Vec<Row>,
}

/// Ordered collection of worksheets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.title.clone()).collect()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.sheets.iter().any(|s| s.title == title)
    }

    pub fn sheet(&self, title: &str) -> GridResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.title == title)
            .ok_or_else(|| GridError::WorksheetNotFound(title.to_string()))
    }

    fn sheet_mut(&mut self, title: &str) -> GridResult<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.title == title)
            .ok_or_else(|| GridError::WorksheetNotFound(title.to_string()))
    }

    pub fn create(&mut self, title: &str, header: &[String]) -> GridResult<()> {
        if self.contains(title) {
            return Err(GridError::WorksheetExists(title.to_string()));
        }
        self.sheets.push(Sheet {
            title: title.to_string(),
            rows: vec![header.to_vec()],
        });
        Ok(())
    }

    pub fn remove(&mut self, title: &str) -> GridResult<()> {
        let idx = self
            .sheets
            .iter()
            .position(|s| s.title == title)
            .ok_or_else(|| GridError::WorksheetNotFound(title.to_string()))?;
        self.sheets.remove(idx);
        Ok(())
    }

    pub fn rename(&mut self, title: &str, new_title: &str) -> GridResult<()> {
        if self.contains(new_title) {
            return Err(GridError::WorksheetExists(new_title.to_string()));
        }
        self.sheet_mut(title)?.title = new_title.to_string();
        Ok(())
    }

    pub fn duplicate(&mut self, title: &str, new_title: &str) -> GridResult<()> {
        if self.contains(new_title) {
            return Err(GridError::WorksheetExists(new_title.to_string()));
        }
        let rows = self.sheet(title)?.rows.clone();
        self.sheets.push(Sheet {
            title: new_title.to_string(),
            rows,
        });
        Ok(())
    }

    pub fn header(&self, title: &str) -> GridResult<Row> {
        self.sheet(title)?
            .rows
            .first()
            .cloned()
            .ok_or_else(|| GridError::NoHeader(title.to_string()))
    }

    pub fn rows(&self, title: &str) -> GridResult<Vec<Row>> {
        Ok(self.sheet(title)?.rows.clone())
    }

    pub fn append(&mut self, title: &str, row: &[String]) -> GridResult<()> {
        self.sheet_mut(title)?.rows.push(row.to_vec());
        Ok(())
    }

    pub fn write(&mut self, title: &str, position: usize, row: &[String]) -> GridResult<()> {
        let sheet = self.sheet_mut(title)?;
        let idx = row_index(&sheet.title, sheet.rows.len(), position)?;
        sheet.rows[idx] = row.to_vec();
        Ok(())
    }

    pub fn delete(&mut self, title: &str, position: usize) -> GridResult<()> {
        let sheet = self.sheet_mut(title)?;
        let idx = row_index(&sheet.title, sheet.rows.len(), position)?;
        sheet.rows.remove(idx);
        Ok(())
    }
}

/// Maps a 1-based grid position onto a vector index
fn row_index(title: &str, len: usize, position: usize) -> GridResult<usize> {
    if position == 0 || position > len {
        return Err(GridError::RowOutOfRange {
            table: title.to_string(),
            position,
        });
    }
    Ok(position - 1)
}
