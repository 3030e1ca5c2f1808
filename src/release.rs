//! GitHub release publishing.
//!
//! The publish flow reads the token straight out of the `origin` remote URL
//! (the `https://TOKEN@github.com/owner/repo.git` form), takes the release
//! body from `RELEASE_NOTES.md` when present, and creates the release via
//! the REST API. An existing tag surfaces as a 422 from GitHub.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

const API_BASE: &str = "https://api.github.com";
const RELEASE_NOTES_FILE: &str = "RELEASE_NOTES.md";

/// Result of one create-release attempt.
#[derive(Debug)]
pub enum ReleaseOutcome {
    Created { html_url: String },
    Failed { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
    html_url: String,
}

/// Read the `origin` remote URL of the repository at `repo_dir`.
pub fn origin_url(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(["remote", "get-url", "origin"])
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        bail!("No origin remote configured in {}", repo_dir.display());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extract the access token embedded in a remote URL's userinfo.
///
/// Returns `None` when the URL carries no userinfo or the candidate is too
/// short to be a real token.
pub fn extract_token(remote: &str) -> Option<String> {
    let rest = remote
        .strip_prefix("https://")
        .or_else(|| remote.strip_prefix("http://"))?;
    let (token, _) = rest.split_once('@')?;
    if token.len() > 10 {
        Some(token.to_string())
    } else {
        None
    }
}

/// Extract `(owner, repo)` from a GitHub remote URL.
pub fn extract_repo(remote: &str) -> Option<(String, String)> {
    let rest = remote
        .strip_prefix("https://")
        .or_else(|| remote.strip_prefix("http://"))?;
    let rest = rest.rsplit_once('@').map(|(_, host)| host).unwrap_or(rest);
    let path = rest.split_once('/')?.1;

    let mut segments = path.splitn(2, '/');
    let owner = segments.next()?;
    let repo = segments.next()?.trim_end_matches('/');
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Release body text: `RELEASE_NOTES.md` when readable, a stock line
/// otherwise.
pub fn read_release_notes(repo_dir: &Path, tag: &str) -> String {
    match std::fs::read_to_string(repo_dir.join(RELEASE_NOTES_FILE)) {
        Ok(notes) if !notes.trim().is_empty() => notes,
        _ => format!("Release {}", tag),
    }
}

/// Create a release for `tag` on the given repository.
pub async fn create_release(
    token: &str,
    owner: &str,
    repo: &str,
    tag: &str,
    body: &str,
) -> Result<ReleaseOutcome> {
    let url = format!("{}/repos/{}/{}/releases", API_BASE, owner, repo);
    debug!("POST {}", url);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .header("Authorization", format!("token {}", token))
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "tunegrab-release")
        .json(&json!({
            "tag_name": tag,
            "name": format!("Release {}", tag),
            "body": body,
            "draft": false,
            "prerelease": false,
        }))
        .send()
        .await
        .context("Failed to reach the GitHub API")?;

    let status = response.status();
    if status == reqwest::StatusCode::CREATED {
        let created: CreatedRelease = response
            .json()
            .await
            .context("Failed to parse the GitHub API response")?;
        info!("Created release {} for {}/{}", tag, owner, repo);
        Ok(ReleaseOutcome::Created {
            html_url: created.html_url,
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        Ok(ReleaseOutcome::Failed {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_extracted_from_userinfo() {
        assert_eq!(
            extract_token("https://ghp_abcdefghij123@github.com/me/tunes.git").as_deref(),
            Some("ghp_abcdefghij123")
        );
    }

    #[test]
    fn test_no_userinfo_means_no_token() {
        assert!(extract_token("https://github.com/me/tunes.git").is_none());
        assert!(extract_token("git@github.com:me/tunes.git").is_none());
    }

    #[test]
    fn test_short_token_rejected() {
        assert!(extract_token("https://short@github.com/me/tunes.git").is_none());
    }

    #[test]
    fn test_repo_extraction() {
        assert_eq!(
            extract_repo("https://github.com/me/tunes.git"),
            Some(("me".to_string(), "tunes".to_string()))
        );
        assert_eq!(
            extract_repo("https://token12345678@github.com/me/tunes"),
            Some(("me".to_string(), "tunes".to_string()))
        );
        assert!(extract_repo("https://github.com/").is_none());
    }

    #[test]
    fn test_release_notes_fallback() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_release_notes(dir.path(), "v1.2.0"), "Release v1.2.0");

        std::fs::write(dir.path().join(RELEASE_NOTES_FILE), "## Changes\n- stuff\n").unwrap();
        assert!(read_release_notes(dir.path(), "v1.2.0").contains("## Changes"));
    }

    #[test]
    fn test_blank_release_notes_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RELEASE_NOTES_FILE), "   \n").unwrap();
        assert_eq!(read_release_notes(dir.path(), "v2.0.0"), "Release v2.0.0");
    }
}
