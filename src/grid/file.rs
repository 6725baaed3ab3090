//! JSON workbook file grid
//!
//! On-disk layout (single JSON document):
//!
//! ```text
//! {
//!   "format_version": 1,
//!   "key": "<database key>",
//!   "modified_at": "<RFC 3339 UTC>",
//!   "checksum": <crc32 of serialized sheets>,
//!   "sheets": [{"title": "...", "rows": [["..."]]}]
//! }
//! ```
//!
//! Every call re-reads the file, so edits made by other processes between
//! calls are observed. Mutations rewrite the whole file through a temp file,
//! fsync, then rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, verify_checksum};
use super::workbook::{Sheet, Workbook};
use super::{GridAccessor, GridError, GridResult, Row};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct WorkbookFile {
    format_version: u32,
    key: String,
    modified_at: DateTime<Utc>,
    checksum: u32,
    sheets: Vec<Sheet>,
}

/// Grid backed by a JSON workbook file
#[derive(Debug, Clone)]
pub struct FileGrid {
    path: PathBuf,
    key: String,
}

impl FileGrid {
    /// Creates a new, empty workbook file. Fails if the file already exists.
    pub fn create(path: impl Into<PathBuf>, key: impl Into<String>) -> GridResult<Self> {
        let grid = Self {
            path: path.into(),
            key: key.into(),
        };
        if grid.path.exists() {
            return Err(GridError::Io(format!(
                "Workbook {} already exists",
                grid.path.display()
            )));
        }
        if let Some(parent) = grid.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }
        grid.save(Workbook::new())?;
        Ok(grid)
    }

    /// Opens an existing workbook file, validating its checksum
    pub fn open(path: impl Into<PathBuf>) -> GridResult<Self> {
        let path = path.into();
        let file = load_file(&path)?;
        Ok(Self {
            path,
            key: file.key,
        })
    }

    /// Path of the workbook file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database key stored in the workbook
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last modification time recorded in the workbook
    pub fn modified_at(&self) -> GridResult<DateTime<Utc>> {
        Ok(load_file(&self.path)?.modified_at)
    }

    fn load(&self) -> GridResult<Workbook> {
        let file = load_file(&self.path)?;
        Ok(Workbook { sheets: file.sheets })
    }

    fn save(&self, workbook: Workbook) -> GridResult<()> {
        let payload = serde_json::to_vec(&workbook.sheets).map_err(serde_error)?;
        let file = WorkbookFile {
            format_version: FORMAT_VERSION,
            key: self.key.clone(),
            modified_at: Utc::now(),
            checksum: compute_checksum(&payload),
            sheets: workbook.sheets,
        };
        let bytes = serde_json::to_vec_pretty(&file).map_err(serde_error)?;

        let tmp_path = tmp_path(&self.path);
        let mut tmp = File::create(&tmp_path).map_err(io_error)?;
        tmp.write_all(&bytes).map_err(io_error)?;
        tmp.sync_all().map_err(io_error)?;
        fs::rename(&tmp_path, &self.path).map_err(io_error)?;
        Ok(())
    }

    fn mutate<F>(&self, apply: F) -> GridResult<()>
    where
        F: FnOnce(&mut Workbook) -> GridResult<()>,
    {
        let mut workbook = self.load()?;
        apply(&mut workbook)?;
        self.save(workbook)
    }
}

impl GridAccessor for FileGrid {
    fn list_tables(&self) -> GridResult<Vec<String>> {
        Ok(self.load()?.titles())
    }

    fn table_exists(&self, table: &str) -> GridResult<bool> {
        Ok(self.load()?.contains(table))
    }

    fn create_table(&self, table: &str, header: &[String]) -> GridResult<()> {
        self.mutate(|wb| wb.create(table, header))
    }

    fn delete_table(&self, table: &str) -> GridResult<()> {
        self.mutate(|wb| wb.remove(table))
    }

    fn rename_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.mutate(|wb| wb.rename(table, new_name))
    }

    fn duplicate_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.mutate(|wb| wb.duplicate(table, new_name))
    }

    fn read_header(&self, table: &str) -> GridResult<Row> {
        self.load()?.header(table)
    }

    fn list_rows(&self, table: &str) -> GridResult<Vec<Row>> {
        self.load()?.rows(table)
    }

    fn append_row(&self, table: &str, row: &[String]) -> GridResult<()> {
        self.mutate(|wb| wb.append(table, row))
    }

    fn write_row(&self, table: &str, position: usize, row: &[String]) -> GridResult<()> {
        self.mutate(|wb| wb.write(table, position, row))
    }

    fn delete_row(&self, table: &str, position: usize) -> GridResult<()> {
        self.mutate(|wb| wb.delete(table, position))
    }
}

fn load_file(path: &Path) -> GridResult<WorkbookFile> {
    let bytes = fs::read(path).map_err(io_error)?;
    let file: WorkbookFile = serde_json::from_slice(&bytes)
        .map_err(|e| GridError::Corrupted(format!("{}: {}", path.display(), e)))?;

    if file.format_version != FORMAT_VERSION {
        return Err(GridError::Corrupted(format!(
            "unsupported format_version {}",
            file.format_version
        )));
    }

    let payload = serde_json::to_vec(&file.sheets).map_err(serde_error)?;
    if !verify_checksum(&payload, file.checksum) {
        return Err(GridError::Corrupted(format!(
            "checksum mismatch in {}",
            path.display()
        )));
    }
    Ok(file)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(e: std::io::Error) -> GridError {
    GridError::Io(e.to_string())
}

fn serde_error(e: serde_json::Error) -> GridError {
    GridError::Io(format!("JSON error: {}", e))
}
