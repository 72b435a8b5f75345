// Streaming over comment tables that do not fit in memory. A table is read `chunk_size`
// rows at a time and every transformed chunk is flushed to the output before the next
// one is read. Chunk 0 creates the output file with its header, later chunks append.

use crate::error::{PreprocessError, Result};
use crate::record::{CommentRecord, Header};

use csv::{Reader, ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;


pub struct ChunkReader {
    reader: Reader<File>,
    header: Header,
    chunk_size: usize,
    finished: bool,
}

impl ChunkReader {

    pub fn open(file_path: &Path, chunk_size: usize) -> Result<ChunkReader> {

        if chunk_size == 0 {
            return Err(PreprocessError::config("chunk_size must be positive"));
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(file_path)?;
        let header = Header::from_record(reader.headers()?)?;

        Ok(ChunkReader { reader, header, chunk_size, finished: false })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    fn read_chunk(&mut self) -> Result<Vec<CommentRecord>> {

        let mut rows = Vec::with_capacity(self.chunk_size.min(1 << 16));
        let mut record = StringRecord::new();

        while rows.len() < self.chunk_size {
            if !self.reader.read_record(&mut record)? {
                self.finished = true;
                break;
            }
            rows.push(CommentRecord::from_record(&record, &self.header));
        }
        Ok(rows)
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Vec<CommentRecord>>;

    fn next(&mut self) -> Option<Self::Item> {

        if self.finished {
            return None;
        }

        match self.read_chunk() {
            Ok(rows) if rows.is_empty() => None,
            Ok(rows) => Some(Ok(rows)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}


/// Writes chunks to `path`. When the destination is also the file being read, rows go to
/// a temporary file in the same directory that replaces the destination in `finish`.
pub struct ChunkWriter {
    path: PathBuf,
    header: StringRecord,
    staging: Option<NamedTempFile>,
    chunks_written: usize,
}

impl ChunkWriter {

    pub fn create(path: &Path, header: &Header, staged: bool) -> Result<ChunkWriter> {

        // create output folder
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let staging = if staged { Some(NamedTempFile::new_in(parent)?) } else { None };

        Ok(ChunkWriter { path: path.to_path_buf(), header: header.columns().clone(), staging, chunks_written: 0 })
    }

    fn write_path(&self) -> &Path {
        match &self.staging {
            Some(tmp) => tmp.path(),
            None => &self.path,
        }
    }

    pub fn write_chunk(&mut self, index: usize, rows: &[CommentRecord]) -> Result<()> {

        let file = if index == 0 {
            File::create(self.write_path())?
        } else {
            OpenOptions::new().append(true).open(self.write_path())?
        };

        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(BufWriter::new(file));
        if index == 0 {
            wrt.write_record(&self.header)?;
        }
        for row in rows {
            wrt.write_record(&row.to_record())?;
        }
        wrt.flush()?;

        self.chunks_written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf> {

        // an input without rows still produces a table with its header
        if self.chunks_written == 0 {
            self.write_chunk(0, &[])?;
        }

        if let Some(tmp) = self.staging.take() {
            tmp.persist(&self.path)?;
        }
        Ok(self.path)
    }
}


pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Streams `input` through `transform` chunk by chunk into `output`, keeping row order.
/// Returns the number of rows written.
pub fn process<F>(input: &Path, output: &Path, chunk_size: usize, stage: &str, mut transform: F) -> Result<usize>
where
    F: FnMut(Vec<CommentRecord>) -> Result<Vec<CommentRecord>>,
{
    let reader = ChunkReader::open(input, chunk_size)?;
    let mut writer = ChunkWriter::create(output, reader.header(), same_file(input, output))?;
    let mut n_rows = 0;

    for (index, chunk) in reader.enumerate() {
        info!("{} chunk {}...", stage, index);
        let rows = transform(chunk?)?;
        writer.write_chunk(index, &rows)?;
        n_rows += rows.len();
    }

    let output = writer.finish()?;
    debug!("{} wrote {} rows to {}", stage, n_rows, output.display());
    Ok(n_rows)
}

/// Loads a whole table, for stages cheap enough not to need streaming.
pub fn read_all(file_path: &Path) -> Result<(Header, Vec<CommentRecord>)> {

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(file_path)?;
    let header = Header::from_record(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(CommentRecord::from_record(&record?, &header));
    }
    Ok((header, rows))
}

pub fn write_all(file_path: &Path, header: &Header, rows: &[CommentRecord], staged: bool) -> Result<PathBuf> {
    let mut writer = ChunkWriter::create(file_path, header, staged)?;
    writer.write_chunk(0, rows)?;
    writer.finish()
}
