use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    error::{Error, Result},
    url_patterns::UrlValidator,
};

pub const BITBUCKET_HOST: &str = "bitbucket.org";

/// A repository URL that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference(String);

impl RepositoryReference {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if !UrlValidator::bitbucket().verify(&url) {
            return Err(Error::InvalidFormat(url));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RepositoryReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for RepositoryReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_relative_path(name: &str) -> bool {
    name.split(['/', '\\'])
        .all(|segment| !matches!(segment, "" | "." | ".."))
}

/// Builds `https://{user}@bitbucket.org/{project}/{repository}` URLs.
#[derive(Debug, Clone, Default)]
pub struct UrlFactory {
    user_id: Option<String>,
    project_id: Option<String>,
}

impl UrlFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, user_id: impl Into<String>, project_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
        self.project_id = Some(project_id.into());
    }

    fn compose(&self, repository_name: &str) -> Result<String> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or(Error::MissingConfiguration("user id"))?;
        let project_id = self
            .project_id
            .as_deref()
            .ok_or(Error::MissingConfiguration("project id"))?;

        let url = format!("https://{user_id}@{BITBUCKET_HOST}/{project_id}/{repository_name}");

        // the name doubles as a path below the working directory
        if !is_relative_path(repository_name) {
            return Err(Error::InvalidFormat(url));
        }

        Ok(url)
    }

    /// Fails on the first name that does not produce a valid URL.
    pub fn generate<S: AsRef<str>>(
        &self,
        repository_names: &[S],
    ) -> Result<Vec<RepositoryReference>> {
        repository_names
            .iter()
            .map(|name| {
                let url = self.compose(name.as_ref())?;
                debug!(%url, "composed repository URL");
                RepositoryReference::new(url)
            })
            .collect()
    }
}
