use crate::allocator::Shard;
use crate::error::{Result, SharderError};
use crate::index::UnitIndex;
use crate::scanner::CU_END_PREFIX;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Output file name for a shard: zero-padded so downstream tooling can
/// discover the whole set by pattern.
pub fn shard_file_name(shard: usize) -> String {
    format!("file-{shard:04}.cs")
}

/// Reconstructs project-scoped output streams for each shard.
///
/// Every shard file wraps every known project, in ascending id order, even
/// when the shard holds no unit for that project; assigned unit blocks are
/// copied byte-verbatim from their recorded offsets in the project's input
/// stream. Inputs are seeked backward and forward freely across shards.
pub struct ShardWriter<'a> {
    index: &'a UnitIndex,
    inputs: &'a mut [BufReader<File>],
    out_dir: &'a Path,
}

impl<'a> ShardWriter<'a> {
    /// `inputs[i]` must be the stream project id `i` was scanned from.
    pub fn new(
        index: &'a UnitIndex,
        inputs: &'a mut [BufReader<File>],
        out_dir: &'a Path,
    ) -> Self {
        Self {
            index,
            inputs,
            out_dir,
        }
    }

    /// Write one shard file, returning its path.
    ///
    /// The output stream is exclusively owned here and flushed before the
    /// method returns; on error the shard is reported by number and nothing
    /// further is written to it.
    pub fn write_shard(&mut self, shard_number: usize, shard: &Shard) -> Result<PathBuf> {
        log::info!("Writing out shard {shard_number}");
        let path = self.out_dir.join(shard_file_name(shard_number));
        self.write_to(&path, shard)
            .map_err(|source| SharderError::ShardWrite {
                shard: shard_number,
                source,
            })?;
        Ok(path)
    }

    fn write_to(&mut self, path: &Path, shard: &Shard) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for (project, name) in self.index.projects().iter().enumerate() {
            log::info!("Writing out project {project} [{name}]");
            begin_project(&mut out, name)?;
            for &id in shard.cus() {
                if let Some(offset) = self.index.cu(id).offset_in(project) {
                    copy_cu(&mut self.inputs[project], offset, &mut out)?;
                }
            }
            end_project(&mut out, name)?;
        }
        out.flush()
    }
}

fn begin_project<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "#pragma echo \"Processing project {name}\\n\"")?;
    writeln!(out, "#pragma project \"{name}\"")?;
    writeln!(out, "#pragma block_enter")
}

fn end_project<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "#pragma block_exit")?;
    writeln!(out, "#pragma echo \"Done processing project {name}\\n\\n\"")
}

/// Copy one unit block verbatim: from `offset` through the first line
/// starting with the done-processing sentinel, inclusive. Copying also stops
/// at end of stream, trusting the input to be well formed.
fn copy_cu<W: Write>(
    input: &mut BufReader<File>,
    offset: u64,
    out: &mut W,
) -> io::Result<()> {
    input.seek(SeekFrom::Start(offset))?;
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        out.write_all(&line)?;
        if line.starts_with(CU_END_PREFIX.as_bytes()) {
            return Ok(());
        }
    }
}
