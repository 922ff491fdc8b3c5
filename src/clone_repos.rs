use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    repo_url::{RepositoryReference, UrlFactory},
    url_patterns::EXTENSION_MARKER,
};

/// Performs the actual clone of a single repository.
///
/// Implementations are fire-and-forget: a failed clone is not reported back.
pub trait CloneBackend {
    fn clone_repository(&mut self, url: &RepositoryReference, working_dir: &Path);
}

/// Runs `git clone <url>` inside the working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
}

impl GitCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CloneBackend for GitCli {
    fn clone_repository(&mut self, url: &RepositoryReference, working_dir: &Path) {
        // exit status is logged, never acted upon
        let status = Command::new(&self.binary)
            .arg("clone")
            .arg(url.as_str())
            .current_dir(working_dir)
            .status();

        match status {
            Ok(status) => debug!(%url, %status, "git clone finished"),
            Err(e) => warn!(%url, binary = %self.binary, "failed to spawn git: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloning { folder: String, url: String },
    AlreadyCloned { folder: String, url: String },
}

#[derive(Debug, Clone)]
struct CloneRequest {
    reference: RepositoryReference,
    name: String,
}

impl CloneRequest {
    /// Folder git creates for this repository, the name up to its first `.git`.
    fn folder(&self) -> &str {
        self.name
            .split_once(EXTENSION_MARKER)
            .map_or(self.name.as_str(), |(folder, _)| folder)
    }
}

/// Accumulates repositories of one user and clones the missing ones into a
/// working directory.
pub struct Cloner<B = GitCli> {
    user_id: String,
    factory: UrlFactory,
    working_dir: PathBuf,
    pool: Vec<CloneRequest>,
    backend: B,
}

impl<B: CloneBackend> Cloner<B> {
    pub fn with_backend(
        user_id: impl Into<String>,
        path: impl AsRef<Path>,
        backend: B,
    ) -> Result<Self> {
        let path = path.as_ref();
        let working_dir =
            std::fs::canonicalize(path).map_err(|source| Error::WorkingDirectory {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            user_id: user_id.into(),
            factory: UrlFactory::new(),
            working_dir,
            pool: vec![],
            backend,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// URLs currently queued, in clone order.
    pub fn urls(&self) -> impl Iterator<Item = &RepositoryReference> {
        self.pool.iter().map(|request| &request.reference)
    }

    /// Queue `repository_names` of `project_id`. Nothing is queued if any
    /// of the names fails to produce a valid URL.
    pub fn add_batch<S: AsRef<str>>(
        &mut self,
        project_id: &str,
        repository_names: &[S],
    ) -> Result<()> {
        self.factory.configure(self.user_id.as_str(), project_id);
        let references = self.factory.generate(repository_names)?;

        self.pool.extend(
            references
                .into_iter()
                .zip(repository_names)
                .map(|(reference, name)| CloneRequest {
                    reference,
                    name: name.as_ref().to_string(),
                }),
        );

        debug!(project_id, queued = self.pool.len(), "added batch");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn run(&mut self) -> Vec<CloneOutcome> {
        let mut outcomes = Vec::with_capacity(self.pool.len());

        for request in &self.pool {
            let folder = request.folder().to_string();
            let url = request.reference.to_string();

            if self.working_dir.join(&folder).exists() {
                println!("Component {folder} @ {url} is already cloned locally!");
                outcomes.push(CloneOutcome::AlreadyCloned { folder, url });
                continue;
            }

            println!("Cloning {folder} @ {url}");
            info!(%url, dir = %self.working_dir.display(), "cloning repository");
            self.backend.clone_repository(&request.reference, &self.working_dir);
            outcomes.push(CloneOutcome::Cloning { folder, url });
        }

        outcomes
    }
}
