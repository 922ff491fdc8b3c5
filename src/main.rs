use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{command, value_parser, Arg, ArgAction, Command};
use tracing::debug;

mod clone_repos;
mod error;
mod repo_list;
mod repo_url;
mod url_patterns;

use clone_repos::{CloneOutcome, Cloner, GitCli};

fn cli() -> Command {
    command!()
        .arg(
            Arg::new("USER")
                .required(true)
                .help("The Bitbucket user to clone as"),
        )
        .arg(
            Arg::new("PROJECT")
                .required(true)
                .help("The project (workspace) the repositories belong to"),
        )
        .arg(
            Arg::new("REPOSITORY")
                .num_args(0..)
                .help("Repository names, including the .git suffix"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Read repository names from a file, one per line"),
        )
        .arg(
            Arg::new("path")
                .short('C')
                .long("path")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("The directory to clone into"),
        )
        .arg(
            Arg::new("git")
                .long("git")
                .default_value("git")
                .help("The git binary to run"),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let user = matches.get_one::<String>("USER").unwrap();
    let project = matches.get_one::<String>("PROJECT").unwrap();
    let path = matches.get_one::<PathBuf>("path").unwrap();
    let git = matches.get_one::<String>("git").unwrap();

    let mut names: Vec<String> = matches
        .get_many::<String>("REPOSITORY")
        .unwrap_or_default()
        .cloned()
        .collect();
    for file in matches.get_many::<PathBuf>("file").unwrap_or_default() {
        names.extend(repo_list::read_repository_list(file)?);
    }

    if names.is_empty() {
        bail!("No repositories given, pass names or a list file with --file");
    }

    let mut cloner = Cloner::with_backend(user.as_str(), path, GitCli::new(git.as_str()))?;
    cloner
        .add_batch(project, names.as_slice())
        .with_context(|| format!("Failed to build repository URLs for project {project}"))?;

    debug!(
        dir = %cloner.working_dir().display(),
        queued = cloner.len(),
        "starting clone run"
    );
    for url in cloner.urls() {
        debug!(%url, "queued");
    }

    let outcomes = cloner.run();
    let started = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, CloneOutcome::Cloning { .. }))
        .count();
    debug!(
        started,
        already_cloned = outcomes.len() - started,
        "clone run finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn cli_collects_names_and_files() {
        let matches = cli()
            .try_get_matches_from([
                "bitbucket-cloner",
                "alice",
                "proj",
                "tool.git",
                "lib.git",
                "-f",
                "a.txt",
                "--file",
                "b.txt",
            ])
            .unwrap();

        let names: Vec<&String> = matches.get_many::<String>("REPOSITORY").unwrap().collect();
        assert_eq!(names, ["tool.git", "lib.git"]);

        let files: Vec<&PathBuf> = matches.get_many::<PathBuf>("file").unwrap().collect();
        assert_eq!(files, [&PathBuf::from("a.txt"), &PathBuf::from("b.txt")]);

        assert_eq!(matches.get_one::<PathBuf>("path").unwrap(), &PathBuf::from("."));
        assert_eq!(matches.get_one::<String>("git").unwrap(), "git");
    }

    #[test]
    fn cli_requires_user_and_project() {
        assert!(cli().try_get_matches_from(["bitbucket-cloner", "alice"]).is_err());
    }
}
