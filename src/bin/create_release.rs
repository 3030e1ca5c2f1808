//! Create a GitHub release for the current repository.
//!
//! Usage: `create_release <tag>`
//!
//! The token is taken from the userinfo of the `origin` remote URL
//! (`https://TOKEN@github.com/owner/repo.git`). The release body comes from
//! `RELEASE_NOTES.md` in the working directory when present.

use std::path::Path;
use std::process::ExitCode;

use tunegrab::release::{self, ReleaseOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    tunegrab::utils::logging::init_tracing();

    let tag = match std::env::args().nth(1) {
        Some(tag) if !tag.trim().is_empty() => tag,
        _ => {
            eprintln!("Usage: create_release <tag>");
            return ExitCode::FAILURE;
        }
    };

    let repo_dir = Path::new(".");

    let remote = match release::origin_url(repo_dir) {
        Ok(remote) => remote,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(token) = release::extract_token(&remote) else {
        eprintln!("Error: no access token found in the origin remote URL");
        eprintln!("Expected a remote of the form https://TOKEN@github.com/owner/repo.git");
        return ExitCode::FAILURE;
    };

    let Some((owner, repo)) = release::extract_repo(&remote) else {
        eprintln!("Error: could not determine owner/repo from the origin remote URL");
        return ExitCode::FAILURE;
    };

    let body = release::read_release_notes(repo_dir, &tag);
    println!("Creating release {} for {}/{}...", tag, owner, repo);

    match release::create_release(&token, &owner, &repo, &tag, &body).await {
        Ok(ReleaseOutcome::Created { html_url }) => {
            println!("Release created: {}", html_url);
            ExitCode::SUCCESS
        }
        Ok(ReleaseOutcome::Failed { status, body }) => {
            eprintln!("Error: GitHub API returned {}", status);
            if status == 422 {
                eprintln!("Hint: a release for tag {} may already exist", tag);
            }
            if !body.is_empty() {
                eprintln!("{}", body);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
