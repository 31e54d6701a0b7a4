//! Matrix Writer and reader for the persisted transferability artifact.
//!
//! Two formats, picked by file extension:
//! - `.cbor`: serde CBOR snapshot of [`SimilarityMatrix`]
//! - anything else: CSV, header `occupation,label,<key>...`, one row per key
//!
//! Keys are written already normalized (see [`crate::record::normalize_key`]);
//! readers only normalize their query. `label` is the display spelling.
//!
//! Every artifact goes through a [`StagedFile`]: written in full to a sibling
//! `.tmp` file, then renamed over the target on [`StagedFile::commit`].

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{PipelineError, Result},
    input::SkillTable,
    similarity::SimilarityMatrix,
    utils::csv::{normalize_header, parse_rows, write_row},
};

/// Header of the key column
pub const INDEX_COLUMN: &str = "occupation";
/// Header of the display label column
pub const LABEL_COLUMN: &str = "label";

/// Persisted matrix formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Csv,
    Cbor,
}

impl MatrixFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cbor") => Self::Cbor,
            _ => Self::Csv,
        }
    }
}

/// A fully written temp file waiting to replace `path`.
///
/// Dropping it without [`StagedFile::commit`] removes the temp file and
/// leaves `path` untouched.
#[derive(Debug)]
#[must_use = "a staged file is discarded unless committed"]
pub struct StagedFile {
    tmp: PathBuf,
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Write the whole artifact next to `path`.
    ///
    /// # Errors
    /// `Io` when `path` is a directory or the temp file cannot be written.
    pub fn write<F>(path: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        if path.is_dir() {
            return Err(PipelineError::io(path, io::Error::other("destination is a directory")));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        // from here on, Drop cleans the temp file up on any error
        let staged = Self {
            tmp: PathBuf::from(tmp),
            path: path.to_path_buf(),
            committed: false,
        };
        let file = File::create(&staged.tmp).map_err(|e| PipelineError::io(&staged.tmp, e))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush().map_err(|e| PipelineError::io(&staged.tmp, e))?;
        debug!(path = %staged.tmp.display(), "staged artifact");
        Ok(staged)
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the temp file over the target
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.tmp, &self.path).map_err(|e| PipelineError::io(&self.path, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Stage `matrix` for `path` without touching the current artifact
pub fn stage_matrix<P: AsRef<Path>>(path: P, matrix: &SimilarityMatrix) -> Result<StagedFile> {
    let path = path.as_ref();
    let format = MatrixFormat::from_path(path);
    let staged = StagedFile::write(path, |w| match format {
        MatrixFormat::Cbor => serde_cbor::to_writer(w, matrix).map_err(PipelineError::from),
        MatrixFormat::Csv => write_matrix_csv(w, matrix).map_err(|e| PipelineError::io(path, e)),
    })?;
    info!(path = %path.display(), occupations = matrix.len(), ?format, "staged similarity matrix");
    Ok(staged)
}

/// Persist `matrix` at `path`, replacing any previous artifact
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &SimilarityMatrix) -> Result<()> {
    stage_matrix(path, matrix)?.commit()
}

fn write_matrix_csv<W: Write>(mut w: W, matrix: &SimilarityMatrix) -> io::Result<()> {
    let header: Vec<&str> = [INDEX_COLUMN, LABEL_COLUMN]
        .into_iter()
        .chain(matrix.keys().iter().map(String::as_str))
        .collect();
    write_row(&mut w, &header)?;
    for (i, (key, label)) in matrix.keys().iter().zip(matrix.labels()).enumerate() {
        let mut row = Vec::with_capacity(matrix.len() + 2);
        row.push(key.clone());
        row.push(label.clone());
        // Display of f64 is the shortest string that parses back to the same value
        row.extend(matrix.row(i).unwrap_or_default().iter().map(|v| v.to_string()));
        write_row(&mut w, &row)?;
    }
    Ok(())
}

/// Load a matrix written by [`write_matrix`].
///
/// Checks that the layout is square and that row and column labels match;
/// numeric invariants are not re-validated here.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<SimilarityMatrix> {
    let path = path.as_ref();
    let matrix = match MatrixFormat::from_path(path) {
        MatrixFormat::Cbor => {
            let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
            let mut matrix: SimilarityMatrix = serde_cbor::from_reader(io::BufReader::new(file))?;
            matrix.rebuild_index()?;
            matrix
        }
        MatrixFormat::Csv => {
            let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
            parse_matrix_csv(path, &text)?
        }
    };
    info!(path = %path.display(), occupations = matrix.len(), "loaded similarity matrix");
    Ok(matrix)
}

fn parse_matrix_csv(path: &Path, text: &str) -> Result<SimilarityMatrix> {
    let mut rows = parse_rows(text).into_iter();
    let header = rows
        .next()
        .ok_or_else(|| PipelineError::format(path, "empty file"))?;
    let leading: Vec<String> = header.iter().take(2).map(|h| normalize_header(h)).collect();
    if leading != [INDEX_COLUMN, LABEL_COLUMN] {
        return Err(PipelineError::format(
            path,
            format!("first columns must be '{INDEX_COLUMN},{LABEL_COLUMN}'"),
        ));
    }
    let keys: Vec<String> = header[2..].to_vec();
    let n = keys.len();

    let mut labels = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n * n);
    for (r, row) in rows.enumerate() {
        if row.len() != n + 2 {
            return Err(PipelineError::format(
                path,
                format!("row {} has {} cells, expected {}", r + 1, row.len(), n + 2),
            ));
        }
        if row[0] != keys.get(r).map(String::as_str).unwrap_or_default() {
            return Err(PipelineError::format(
                path,
                format!("row key '{}' does not match column key at position {}", row[0], r + 1),
            ));
        }
        labels.push(row[1].clone());
        for cell in &row[2..] {
            let v: f64 = cell
                .trim()
                .parse()
                .map_err(|_| PipelineError::format(path, format!("'{cell}' is not a number (row {})", r + 1)))?;
            values.push(v);
        }
    }
    if labels.len() != n {
        return Err(PipelineError::format(path, format!("{} rows for {n} columns", labels.len())));
    }
    SimilarityMatrix::from_parts(keys, values)?.with_labels(labels)
}

/// Stage a whole [`SkillTable`] as CSV (used for the tagged skill table)
pub fn stage_table<P: AsRef<Path>>(path: P, table: &SkillTable) -> Result<StagedFile> {
    let path = path.as_ref();
    let staged = StagedFile::write(path, |w| {
        let io = |e| PipelineError::io(path, e);
        write_row(&mut *w, &table.headers).map_err(io)?;
        for row in &table.rows {
            write_row(&mut *w, row).map_err(io)?;
        }
        Ok(())
    })?;
    info!(path = %path.display(), rows = table.rows.len(), "staged table");
    Ok(staged)
}

/// Write a whole [`SkillTable`] as CSV, replacing any previous file
pub fn write_table<P: AsRef<Path>>(path: P, table: &SkillTable) -> Result<()> {
    stage_table(path, table)?.commit()
}
