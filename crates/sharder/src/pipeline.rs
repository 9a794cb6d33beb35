use crate::allocator::allocate;
use crate::error::{Result, SharderError};
use crate::index::UnitIndex;
use crate::writer::ShardWriter;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Options for one split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Number of shards to aim for. Clamped to at least 1.
    pub shards: usize,
    /// Directory the shard files are written into.
    pub out_dir: PathBuf,
}

/// Summary of a completed split, suitable for machine-readable output.
#[derive(Debug, Serialize)]
pub struct SplitSummary {
    pub projects: usize,
    pub distinct_cus: usize,
    pub occurrences: usize,
    pub shards: usize,
    pub files: Vec<PathBuf>,
}

/// Run the full pipeline: open every input, scan them all, allocate, then
/// write one output file per shard.
///
/// The three phases are strictly sequential: allocation needs every unit's
/// project memberships, so no output is produced until all inputs have been
/// scanned through. Inputs must be supplied one per project, in project
/// order; [`UnitIndex::scan_stream`] rejects streams that break this.
pub fn split(inputs: &[PathBuf], options: &SplitOptions) -> Result<SplitSummary> {
    let mut streams = Vec::with_capacity(inputs.len());
    for path in inputs {
        let file = File::open(path).map_err(|source| SharderError::InputNotFound {
            path: path.clone(),
            source,
        })?;
        streams.push(file);
    }

    let mut index = UnitIndex::new();
    for file in &mut streams {
        index.scan_stream(BufReader::new(file))?;
    }

    let shards = allocate(&index, options.shards);

    let mut readers: Vec<BufReader<File>> = streams.into_iter().map(BufReader::new).collect();
    let mut writer = ShardWriter::new(&index, &mut readers, &options.out_dir);
    let mut files = Vec::with_capacity(shards.len());
    for (number, shard) in shards.iter().enumerate() {
        files.push(writer.write_shard(number, shard)?);
    }

    Ok(SplitSummary {
        projects: index.project_count(),
        distinct_cus: index.distinct_count(),
        occurrences: index.occurrence_count(),
        shards: shards.len(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_project(dir: &Path, name: &str, cus: &[(&str, &str)]) -> PathBuf {
        let mut text = format!(
            "#pragma echo \"Processing project {name}\\n\"\n#pragma project \"{name}\"\n#pragma block_enter\n"
        );
        for (path, body) in cus {
            text.push_str(&format!(
                "#pragma echo \"Processing {path}\\n\"\n{body}#pragma echo \"Done processing {path}\\n\"\n"
            ));
        }
        text.push_str(&format!(
            "#pragma block_exit\n#pragma echo \"Done processing project {name}\\n\"\n"
        ));
        let file = dir.join(format!("{name}.cs"));
        fs::write(&file, text).unwrap();
        file
    }

    fn three_project_inputs(dir: &Path) -> Vec<PathBuf> {
        vec![
            write_project(dir, "A", &[("/a.c", "int a;\n"), ("/b.c", "int b;\n")]),
            write_project(dir, "B", &[("/a.c", "int a2;\n"), ("/c.c", "int c;\n")]),
            write_project(dir, "C", &[("/c.c", "int c2;\n")]),
        ]
    }

    #[test]
    fn splits_three_projects_into_two_shards() {
        let temp = tempdir().unwrap();
        let inputs = three_project_inputs(temp.path());
        let out = tempdir().unwrap();

        let summary = split(
            &inputs,
            &SplitOptions {
                shards: 2,
                out_dir: out.path().to_path_buf(),
            },
        )
        .unwrap();

        assert_eq!(summary.projects, 3);
        assert_eq!(summary.distinct_cus, 3);
        assert_eq!(summary.occurrences, 5);
        assert_eq!(summary.shards, 2);

        let shard0 = fs::read_to_string(&summary.files[0]).unwrap();
        let shard1 = fs::read_to_string(&summary.files[1]).unwrap();

        // /a.c and /b.c in shard 0, /c.c in shard 1.
        assert!(shard0.contains("Processing /a.c"));
        assert!(shard0.contains("Processing /b.c"));
        assert!(!shard0.contains("Processing /c.c"));
        assert!(shard1.contains("Processing /c.c"));
        assert!(!shard1.contains("Processing /a.c"));

        // /a.c content comes from both A's and B's streams.
        assert!(shard0.contains("int a;"));
        assert!(shard0.contains("int a2;"));

        // Every shard wraps every project.
        for shard in [&shard0, &shard1] {
            for name in ["A", "B", "C"] {
                assert!(shard.contains(&format!("#pragma project \"{name}\"")));
            }
        }
    }

    #[test]
    fn rerun_is_byte_identical() {
        let temp = tempdir().unwrap();
        let inputs = three_project_inputs(temp.path());

        let out_a = tempdir().unwrap();
        let out_b = tempdir().unwrap();
        let first = split(
            &inputs,
            &SplitOptions {
                shards: 2,
                out_dir: out_a.path().to_path_buf(),
            },
        )
        .unwrap();
        let second = split(
            &inputs,
            &SplitOptions {
                shards: 2,
                out_dir: out_b.path().to_path_buf(),
            },
        )
        .unwrap();

        assert_eq!(first.files.len(), second.files.len());
        for (a, b) in first.files.iter().zip(&second.files) {
            assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
        }
    }

    #[test]
    fn missing_input_aborts_before_any_output() {
        let temp = tempdir().unwrap();
        let out = tempdir().unwrap();
        let missing = temp.path().join("nope.cs");

        let err = split(
            &[missing.clone()],
            &SplitOptions {
                shards: 2,
                out_dir: out.path().to_path_buf(),
            },
        )
        .unwrap_err();

        assert!(matches!(err, SharderError::InputNotFound { ref path, .. } if *path == missing));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn shard_files_follow_the_discovery_pattern() {
        let temp = tempdir().unwrap();
        let inputs = three_project_inputs(temp.path());
        let out = tempdir().unwrap();

        let summary = split(
            &inputs,
            &SplitOptions {
                shards: 3,
                out_dir: out.path().to_path_buf(),
            },
        )
        .unwrap();

        for (n, file) in summary.files.iter().enumerate() {
            assert!(file.ends_with(format!("file-{n:04}.cs")));
        }
    }
}
