use crate::error::{Result, SharderError};
use crate::scanner::{Directive, DirectiveScanner};
use std::collections::HashMap;
use std::io::BufRead;

/// Stable handle into the compilation-unit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CuId(usize);

impl CuId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One compilation unit, identified by its absolute path.
///
/// All occurrences of the same path, across every project, alias the same
/// record; the per-project offsets accumulate as later projects are scanned.
#[derive(Debug, Clone)]
pub struct CuRecord {
    path: String,
    /// Byte offset of the unit's start, indexed by project id. An offset of
    /// zero means "not present in that project". A unit starting at byte 0
    /// of a stream cannot occur in well-formed input, since a project marker
    /// always precedes it. See the latent-edge-case note in DESIGN.md.
    offsets: Vec<u64>,
}

impl CuRecord {
    fn new(path: String) -> Self {
        Self {
            path,
            offsets: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of projects this unit belongs to: the unit of balance.
    pub fn weight(&self) -> usize {
        self.offsets.iter().filter(|&&off| off > 0).count()
    }

    /// The unit's starting offset within the given project's stream, or
    /// `None` if the unit does not appear in that project.
    pub fn offset_in(&self, project: usize) -> Option<u64> {
        self.offsets.get(project).copied().filter(|&off| off > 0)
    }

    /// Record the unit's start within a project. Last write wins when the
    /// same project repeats the same path.
    fn record(&mut self, project: usize, offset: u64) {
        if project >= self.offsets.len() {
            self.offsets.resize(project + 1, 0);
        }
        self.offsets[project] = offset;
    }
}

/// Global index built by scanning every input stream before allocation.
///
/// Holds the project table (id = first-encountered order), the unit arena
/// keyed by path, and the occurrence list that drives allocation. One
/// occurrence is appended per unit marker scanned, so the list deliberately
/// contains duplicate handles when a unit appears in multiple projects.
#[derive(Debug, Default)]
pub struct UnitIndex {
    projects: Vec<String>,
    cus: Vec<CuRecord>,
    by_path: HashMap<String, CuId>,
    occurrences: Vec<CuId>,
    streams_scanned: usize,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one input stream, in supplied order.
    ///
    /// Each stream must declare exactly one project, so that the i-th
    /// supplied stream corresponds to project id i, since the writer seeks the
    /// i-th stream for project i's content. A stream declaring zero or more
    /// than one project fails with [`SharderError::StreamMisalignment`]; a
    /// unit marker before the stream's project marker fails with
    /// [`SharderError::StructuralViolation`].
    pub fn scan_stream<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let stream = self.streams_scanned;
        let mut declared = 0usize;

        for event in DirectiveScanner::new(reader) {
            match event? {
                Directive::ProjectStart { name } => {
                    declared += 1;
                    if declared > 1 {
                        return Err(SharderError::StreamMisalignment {
                            stream,
                            found: declared,
                        });
                    }
                    log::info!("Reading project {name}");
                    self.projects.push(name);
                }
                Directive::CuStart { path, offset } => {
                    if declared == 0 {
                        return Err(SharderError::StructuralViolation { offset });
                    }
                    let project = self.projects.len() - 1;
                    let id = self.resolve_or_create(path);
                    self.cus[id.0].record(project, offset);
                    self.occurrences.push(id);
                }
            }
        }

        if declared == 0 {
            return Err(SharderError::StreamMisalignment { stream, found: 0 });
        }
        self.streams_scanned += 1;
        Ok(())
    }

    fn resolve_or_create(&mut self, path: String) -> CuId {
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }
        let id = CuId(self.cus.len());
        self.cus.push(CuRecord::new(path.clone()));
        self.by_path.insert(path, id);
        id
    }

    pub fn cu(&self, id: CuId) -> &CuRecord {
        &self.cus[id.0]
    }

    pub fn lookup(&self, path: &str) -> Option<CuId> {
        self.by_path.get(path).copied()
    }

    /// Project names, indexed by project id.
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of distinct compilation units seen.
    pub fn distinct_count(&self) -> usize {
        self.cus.len()
    }

    /// Total occurrence count `T`: one per (unit, project) membership.
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Unit handles in scan order, duplicates included.
    pub fn occurrences(&self) -> &[CuId] {
        &self.occurrences
    }
}
