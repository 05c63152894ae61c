//! Remote template checkouts
//!
//! Remote templates are cloned into a cache directory keyed by the MD5 of
//! their canonical URL, then pulled on every later use. A failed pull is not
//! fatal: the stale checkout is used instead.

use crate::error::{QuarryError, Result};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Direction, Remote, Repository};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How deep nested submodules are initialized
const SUBMODULE_DEPTH: usize = 10;

/// A local working copy of a remote template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// Directory holding the working copy
    pub path: PathBuf,
    /// False when a pull failed and the stale copy is being used
    pub fetched: bool,
}

/// Result of refreshing an existing checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PullOutcome {
    UpToDate,
    FastForwarded,
    Diverged,
}

/// Content-addressed cache of template checkouts
#[derive(Debug, Clone)]
pub struct CheckoutCache {
    root: PathBuf,
}

impl CheckoutCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache key for a canonical URL (lowercase hex MD5)
    pub fn cache_key(url: &str) -> String {
        format!("{:x}", md5::compute(url.as_bytes()))
    }

    /// Directory a URL is checked out into
    pub fn checkout_path(&self, url: &str) -> PathBuf {
        self.root.join(Self::cache_key(url))
    }

    /// Whether a checkout directory exists for the URL
    pub fn is_cached(&self, url: &str) -> bool {
        self.checkout_path(url).exists()
    }

    /// Clone the URL if it has never been fetched, otherwise pull it
    pub fn ensure_fetched(&self, url: &str) -> Result<Checkout> {
        let path = self.checkout_path(url);

        if !path.exists() {
            std::fs::create_dir_all(&self.root)?;
            clone_with_submodules(url, &path);
            return Ok(Checkout {
                path,
                fetched: true,
            });
        }

        let repo = Repository::open(&path).map_err(|source| QuarryError::Fetch {
            step: "open",
            url: url.to_string(),
            source,
        })?;

        let fetched = match pull(&repo) {
            Ok(PullOutcome::UpToDate) => {
                debug!(url, "template checkout already up to date");
                true
            }
            Ok(PullOutcome::FastForwarded) => {
                debug!(url, "template checkout fast-forwarded");
                true
            }
            Ok(PullOutcome::Diverged) => {
                warn!(url, "template checkout diverged from origin, using local copy");
                false
            }
            Err(e) => {
                warn!(url, error = %e, "failed to pull template, using cached copy");
                false
            }
        };

        Ok(Checkout { path, fetched })
    }

    /// Check whether a remote can be reached, without writing to disk
    pub fn is_available(url: &str) -> bool {
        let mut remote = match Remote::create_detached(url) {
            Ok(remote) => remote,
            Err(e) => {
                debug!(url, error = %e, "invalid template remote");
                return false;
            }
        };

        match remote.connect(Direction::Fetch) {
            Ok(()) => {
                let _ = remote.disconnect();
                true
            }
            Err(e) => {
                debug!(url, error = %e, "template remote unreachable");
                false
            }
        }
    }
}

/// Clone failures are only logged; callers detect them by the missing manifest
fn clone_with_submodules(url: &str, path: &Path) {
    debug!(url, path = %path.display(), "cloning template");

    match RepoBuilder::new().clone(url, path) {
        Ok(repo) => {
            if let Err(e) = update_submodules(&repo, SUBMODULE_DEPTH) {
                warn!(url, error = %e, "failed to update template submodules");
            }
        }
        Err(e) => warn!(url, error = %e, "failed to clone template"),
    }
}

fn update_submodules(repo: &Repository, depth: usize) -> std::result::Result<(), git2::Error> {
    if depth == 0 {
        return Ok(());
    }

    for mut submodule in repo.submodules()? {
        submodule.update(true, None)?;
        let nested = submodule.open()?;
        update_submodules(&nested, depth - 1)?;
    }

    Ok(())
}

fn pull(repo: &Repository) -> std::result::Result<PullOutcome, git2::Error> {
    let branch = repo
        .head()?
        .shorthand()
        .map(str::to_string)
        .unwrap_or_else(|| "HEAD".to_string());

    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&[branch.as_str()], None, None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let incoming = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&incoming])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::UpToDate);
    }

    if !analysis.is_fast_forward() {
        return Ok(PullOutcome::Diverged);
    }

    let refname = format!("refs/heads/{}", branch);
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(incoming.id(), "pull: fast-forward")?;
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(PullOutcome::FastForwarded)
}
