//! Local git repository operations.
//!
//! The package-fetch/update workflow around the pipeline needs a small set
//! of version-control primitives: initialize a repository, stage-and-commit
//! a working tree, create and switch branches, tag, and read the current
//! revision. All operations are local; no network transport is configured.

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{IndexAddOption, ObjectType, Repository, Signature};

use crate::errors::Result;

const FALLBACK_NAME: &str = "resio";
const FALLBACK_EMAIL: &str = "resio@localhost";

/// A local git repository.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Initialize a new repository at `path`, creating the directory if
    /// needed.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let repo = Repository::init(&path)?;
        log::debug!("initialized git repository at {}", path.display());
        Ok(Self { repo, path })
    }

    /// Open an existing repository.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let repo = Repository::open(&path)?;
        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage every change in the working tree and commit it. Returns the
    /// new revision id.
    pub fn commit_all(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let signature = self.signature()?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None, // unborn branch, first commit
        };
        let parents: Vec<_> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        log::debug!("committed {oid} ({message})");
        Ok(oid.to_string())
    }

    /// Switch to `branch`, creating it from the current head first when
    /// `create` is set.
    pub fn checkout_branch(&self, branch: &str, create: bool) -> Result<()> {
        if create {
            let head = self.repo.head()?.peel_to_commit()?;
            self.repo.branch(branch, &head, false)?;
        }
        self.repo.set_head(&format!("refs/heads/{branch}"))?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout))?;
        Ok(())
    }

    /// Create a lightweight tag pointing at the current head.
    pub fn tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel(ObjectType::Commit)?;
        self.repo.tag_lightweight(name, &head, false)?;
        Ok(())
    }

    /// The revision id of the current head commit.
    pub fn head_id(&self) -> Result<String> {
        Ok(self.repo.head()?.peel_to_commit()?.id().to_string())
    }

    fn signature(&self) -> Result<Signature<'_>> {
        // fall back to a fixed identity when no user is configured
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(_) => Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
        }
    }
}
