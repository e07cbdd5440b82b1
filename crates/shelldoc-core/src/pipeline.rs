//! Batch documentation driver
//!
//! Every source file in the input directory runs through
//! extract → serialize → render → index on its own. A file that fails at any
//! stage is recorded and skipped; the batch always finishes with an index page
//! listing the files that made it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DocConfig;
use crate::doc::html::{INDEX_FILE, STYLESHEET, STYLESHEET_FILE};
use crate::doc::{
    markup, ExtractError, Extractor, HtmlRenderer, PageIndexEntry, RenderError, SerializeError,
};

/// Extension of intermediate markup files
pub const MARKUP_EXTENSION: &str = "xml";

/// Extension of rendered pages
pub const PAGE_EXTENSION: &str = "html";

/// Errors that stop a single file (or, for setup failures, the whole batch)
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializeError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output name '{name}' is already used by {}", first.display())]
    DuplicateOutput { name: String, first: PathBuf },
}

impl PipelineError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How far a file got through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Pending,
    Extracted,
    Serialized,
    Rendered,
    Indexed,
    Failed,
}

impl std::fmt::Display for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Extracted => "extracted",
            Self::Serialized => "serialized",
            Self::Rendered => "rendered",
            Self::Indexed => "indexed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A file that was skipped
#[derive(Debug)]
pub struct FailedFile {
    /// Source path
    pub source: PathBuf,
    /// Display name (file stem)
    pub name: String,
    /// Last stage the file completed before the error
    pub state: FileState,
    pub error: PipelineError,
}

/// Result of processing one file
#[derive(Debug)]
pub enum FileOutcome {
    Indexed {
        source: PathBuf,
        entry: PageIndexEntry,
    },
    Failed(FailedFile),
}

/// Result of a whole batch
#[derive(Debug)]
pub struct BatchReport {
    /// One outcome per source file, in processing order
    pub outcomes: Vec<FileOutcome>,
    /// Location of the written index page
    pub index_path: PathBuf,
}

impl BatchReport {
    /// Files that were fully processed
    pub fn indexed(&self) -> impl Iterator<Item = &PageIndexEntry> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Indexed { entry, .. } => Some(entry),
            FileOutcome::Failed(_) => None,
        })
    }

    /// Files that were skipped
    pub fn failed(&self) -> impl Iterator<Item = &FailedFile> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed(failed) => Some(failed),
            FileOutcome::Indexed { .. } => None,
        })
    }

    /// Entries listed on the index page
    pub fn index_entries(&self) -> Vec<PageIndexEntry> {
        self.indexed().cloned().collect()
    }
}

/// Progress notifications emitted while a batch runs
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    /// A file is about to be processed
    Started { name: &'a str, source: &'a Path },
    /// A file made it onto the index
    Indexed { entry: &'a PageIndexEntry },
    /// A file failed and was skipped
    Skipped { failed: &'a FailedFile },
}

/// Outputs written for one file, removed again if the file fails
struct FileJob {
    state: FileState,
    written: Vec<PathBuf>,
}

impl FileJob {
    fn new() -> Self {
        Self {
            state: FileState::Pending,
            written: Vec::new(),
        }
    }

    fn write(&mut self, path: PathBuf, contents: &str) -> Result<(), PipelineError> {
        std::fs::write(&path, contents).map_err(|e| PipelineError::io(&path, e))?;
        self.written.push(path);
        Ok(())
    }

    fn discard(&mut self) {
        for path in self.written.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed partial output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
            }
        }
        self.state = FileState::Failed;
    }
}

/// Runs the documentation pipeline for one configuration
#[derive(Debug)]
pub struct Pipeline<'c> {
    config: &'c DocConfig,
    renderer: HtmlRenderer,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c DocConfig) -> Self {
        Self {
            config,
            renderer: HtmlRenderer::new(config.project.title.clone()),
        }
    }

    /// Source files the batch will process, sorted by file name
    pub fn sources(&self) -> Result<Vec<PathBuf>, PipelineError> {
        collect_sources(&self.config.input_dir(), self.config)
    }

    /// Process every source file and write the index.
    ///
    /// Per-file failures are reported in the returned [`BatchReport`]. An
    /// `Err` means the batch itself could not run: the input directory is
    /// unreadable or an output location cannot be written.
    pub fn run(&self, mut on_event: impl FnMut(PipelineEvent<'_>)) -> Result<BatchReport, PipelineError> {
        let markup_dir = self.config.markup_dir();
        let output_dir = self.config.output_dir();
        let sources = self.sources()?;

        for dir in [&markup_dir, &output_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        }

        info!(
            files = sources.len(),
            input = %self.config.input_dir().display(),
            "starting documentation batch"
        );

        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            let name = module_name(&source);
            on_event(PipelineEvent::Started {
                name: &name,
                source: &source,
            });

            let mut job = FileJob::new();
            let result = match self.output_owner(&name, &claimed, &output_dir) {
                Some(first) => Err(PipelineError::DuplicateOutput {
                    name: name.clone(),
                    first,
                }),
                None => self.process(&source, &name, &markup_dir, &output_dir, &mut job),
            };

            let outcome = match result {
                Ok(entry) => {
                    job.state = FileState::Indexed;
                    claimed.insert(name, source.clone());
                    on_event(PipelineEvent::Indexed { entry: &entry });
                    FileOutcome::Indexed { source, entry }
                }
                Err(error) => {
                    let state = job.state;
                    job.discard();
                    warn!(file = %source.display(), %state, %error, "skipping file");
                    let failed = FailedFile {
                        source,
                        name,
                        state,
                        error,
                    };
                    on_event(PipelineEvent::Skipped { failed: &failed });
                    FileOutcome::Failed(failed)
                }
            };
            outcomes.push(outcome);
        }

        let report = BatchReport {
            outcomes,
            index_path: output_dir.join(INDEX_FILE),
        };
        self.write_stylesheet(&output_dir)?;
        let index = self.renderer.render_index(&report.index_entries());
        std::fs::write(&report.index_path, index)
            .map_err(|e| PipelineError::io(&report.index_path, e))?;

        info!(
            indexed = report.indexed().count(),
            failed = report.failed().count(),
            index = %report.index_path.display(),
            "documentation batch finished"
        );
        Ok(report)
    }

    /// Whatever already owns the page name of `name`: an earlier source with
    /// the same stem, or the index page itself
    fn output_owner(
        &self,
        name: &str,
        claimed: &HashMap<String, PathBuf>,
        output_dir: &Path,
    ) -> Option<PathBuf> {
        if format!("{name}.{PAGE_EXTENSION}") == INDEX_FILE {
            return Some(output_dir.join(INDEX_FILE));
        }
        claimed.get(name).cloned()
    }

    fn process(
        &self,
        source: &Path,
        name: &str,
        markup_dir: &Path,
        output_dir: &Path,
        job: &mut FileJob,
    ) -> Result<PageIndexEntry, PipelineError> {
        let text = std::fs::read_to_string(source).map_err(|e| PipelineError::io(source, e))?;
        let tree = Extractor::extract(&text, name)?;
        job.state = FileState::Extracted;
        debug!(file = name, nodes = tree.node_count(), "extracted");

        let markup_path = markup_dir.join(format!("{name}.{MARKUP_EXTENSION}"));
        job.write(markup_path.clone(), &markup::serialize(&tree)?)?;
        job.state = FileState::Serialized;
        debug!(file = name, path = %markup_path.display(), "serialized");

        let page = render_file(&markup_path, &self.renderer)?;
        let output_file = format!("{name}.{PAGE_EXTENSION}");
        let page_path = output_dir.join(&output_file);
        job.write(page_path.clone(), &page)?;
        job.state = FileState::Rendered;
        debug!(file = name, path = %page_path.display(), "rendered");

        Ok(PageIndexEntry {
            display_name: name.to_string(),
            output_file,
        })
    }

    fn write_stylesheet(&self, output_dir: &Path) -> Result<(), PipelineError> {
        let target = output_dir.join(STYLESHEET_FILE);
        match self.config.stylesheet() {
            Some(custom) => {
                std::fs::copy(&custom, &target).map_err(|e| PipelineError::io(&custom, e))?;
                debug!(stylesheet = %custom.display(), "copied custom stylesheet");
            }
            None => std::fs::write(&target, STYLESHEET).map_err(|e| PipelineError::io(&target, e))?,
        }
        Ok(())
    }
}

/// Extract one source file and serialize it to markup
pub fn extract_file(source: &Path) -> Result<String, PipelineError> {
    let text = std::fs::read_to_string(source).map_err(|e| PipelineError::io(source, e))?;
    let tree = Extractor::extract(&text, &module_name(source))?;
    Ok(markup::serialize(&tree)?)
}

/// Render one markup file to a page
pub fn render_file(markup_path: &Path, renderer: &HtmlRenderer) -> Result<String, PipelineError> {
    let text =
        std::fs::read_to_string(markup_path).map_err(|e| PipelineError::io(markup_path, e))?;
    let tree = markup::parse(&text)?;
    Ok(renderer.render_page(&tree))
}

/// Module name of a source file: its stem
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "unknown".to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn collect_sources(dir: &Path, config: &DocConfig) -> Result<Vec<PathBuf>, PipelineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() || !config.accepts(&path) {
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_is_file_stem() {
        assert_eq!(module_name(Path::new("js/ui/panel.js")), "panel");
        assert_eq!(module_name(Path::new("README")), "README");
        assert_eq!(module_name(Path::new("archive.tar.gz")), "archive.tar");
    }

    #[test]
    fn sources_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.js", "a.js", ".hidden.js", "notes.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.js")).unwrap();

        let config = DocConfig::default();
        let files = collect_sources(dir.path(), &config).unwrap();
        let names: Vec<_> = files.iter().map(|p| module_name(p)).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn missing_input_dir_is_io_error() {
        let config = DocConfig::default();
        let err = collect_sources(Path::new("/nonexistent/input"), &config).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn discard_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = FileJob::new();
        job.write(dir.path().join("x.xml"), "<Module name=\"x\"/>").unwrap();
        job.state = FileState::Serialized;
        assert!(dir.path().join("x.xml").exists());

        job.discard();
        assert!(!dir.path().join("x.xml").exists());
        assert_eq!(job.state, FileState::Failed);
    }

    #[test]
    fn extract_file_names_module_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.js");
        std::fs::write(&path, "/** Shows things. */\nfunction show() {}\n").unwrap();

        let markup = extract_file(&path).unwrap();
        let tree = markup::parse(&markup).unwrap();
        assert_eq!(tree.name, "panel");
        assert_eq!(tree.children[0].name, "show");
        assert_eq!(tree.children[0].summary, "Shows things.");
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = PipelineError::DuplicateOutput {
            name: "a".to_string(),
            first: PathBuf::from("in/a.js"),
        };
        assert_eq!(err.to_string(), "output name 'a' is already used by in/a.js");
    }
}
