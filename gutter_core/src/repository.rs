//! Baseline retrieval from the HEAD commit of a git repository.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{ErrorClass, ErrorCode, ObjectType, Repository as GitRepository};

use crate::{BaselineProvider, BaselineSnapshot, Error, Result, Runtime};

/// Handle to the repository containing a tracked file.
pub struct Repository {
    inner: GitRepository,
    root: PathBuf,
}

impl Repository {
    /// Discover the repository containing `path` (a file or a directory).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized, does not resolve
    /// to a git repository, or if libgit2 reports an unsupported repository
    /// layout (such as a bare repository).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let canonical = canonicalize(path.as_ref())?;
        let start = if canonical.is_dir() {
            canonical.as_path()
        } else {
            canonical.parent().unwrap_or(canonical.as_path())
        };

        let repo = match GitRepository::discover(start) {
            Ok(repo) => repo,
            Err(err)
                if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound =>
            {
                return Err(Error::NotARepository {
                    path: display_path(&canonical),
                })
            }
            Err(err) => return Err(Error::from(err)),
        };

        let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: display_path(&canonical),
        })?;
        let root = canonicalize(workdir)?;

        Ok(Self { inner: repo, root })
    }

    /// Returns the absolute path to the working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `location` relative to the working tree root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the location cannot be canonicalized and
    /// [`Error::OutsideWorkdir`] if it is not inside the working tree.
    pub fn relative_path(&self, location: &Path) -> Result<PathBuf> {
        let canonical = canonicalize(location)?;
        canonical
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| Error::OutsideWorkdir {
                path: display_path(&canonical),
                root: display_path(&self.root),
            })
    }

    /// Content of `location` in the HEAD commit.
    ///
    /// An unborn HEAD or a path missing from the HEAD tree yields
    /// [`BaselineSnapshot::Empty`]: the file is tracked territory but has no
    /// committed version yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the location is outside the working tree, the
    /// tree entry is not a blob, the blob is not UTF-8, or libgit2 fails.
    pub fn baseline_for(&self, location: &Path) -> Result<BaselineSnapshot> {
        let relative = self.relative_path(location)?;
        let Some(commit) = self.head_commit()? else {
            return Ok(BaselineSnapshot::Empty);
        };

        let tree = commit.tree()?;
        let entry = match tree.get_path(&relative) {
            Ok(entry) => entry,
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(BaselineSnapshot::Empty),
            Err(err) => return Err(Error::from(err)),
        };

        if entry.kind() != Some(ObjectType::Blob) {
            return Err(Error::NotABlob {
                path: display_path(&relative),
            });
        }

        let blob = self.inner.find_blob(entry.id())?;
        let text = std::str::from_utf8(blob.content()).map_err(|_| Error::InvalidEncoding {
            path: display_path(&relative),
        })?;
        Ok(BaselineSnapshot::from_text(text))
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        let head = match self.inner.head() {
            Ok(head) => head,
            Err(err)
                if matches!(
                    (err.class(), err.code()),
                    (
                        ErrorClass::Reference,
                        ErrorCode::NotFound | ErrorCode::UnbornBranch
                    )
                ) =>
            {
                return Ok(None)
            }
            Err(err) => return Err(Error::from(err)),
        };

        Ok(Some(head.peel_to_commit()?))
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// [`BaselineProvider`] reading the HEAD version of a file.
///
/// The repository is opened on every call and dropped before returning, so no
/// handle outlives a location change.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryBaseline {
    _runtime: Runtime,
}

impl RepositoryBaseline {
    /// Provider usable once [`crate::init`] has run.
    #[must_use]
    pub const fn new(runtime: Runtime) -> Self {
        Self { _runtime: runtime }
    }

    /// Resolve the baseline, keeping the reason when it is unavailable.
    ///
    /// # Errors
    ///
    /// Propagates every failure from [`Repository::open`] and
    /// [`Repository::baseline_for`].
    pub fn load(&self, location: &Path) -> Result<BaselineSnapshot> {
        Repository::open(location)?.baseline_for(location)
    }
}

impl BaselineProvider for RepositoryBaseline {
    fn resolve_baseline(&self, location: &Path) -> BaselineSnapshot {
        match self.load(location) {
            Ok(snapshot) => {
                tracing::debug!(
                    location = %location.display(),
                    lines = ?snapshot.lines().map(<[String]>::len),
                    "resolved baseline"
                );
                snapshot
            }
            Err(err) => {
                tracing::debug!(
                    location = %location.display(),
                    error = %err,
                    "baseline unavailable"
                );
                BaselineSnapshot::Unknown
            }
        }
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| Error::Io {
        path: display_path(path),
        source,
    })
}

fn display_path(path: &Path) -> String {
    path.to_path_buf()
        .into_os_string()
        .to_string_lossy()
        .into_owned()
}
