//! Links-file parsing.
//!
//! A links file is plain UTF-8 text with one URL per line. Empty lines and
//! lines starting with `#` are ignored; everything else is kept in file
//! order.

use std::path::Path;

use crate::core::models::{AppError, AppResult};

/// Read and parse a links file.
pub fn read_links(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Precondition(format!("cannot read links file {}: {}", path.display(), e))
    })?;
    Ok(parse_links(&content))
}

/// Extract the usable lines from links-file content.
pub fn parse_links(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_comments_and_blanks_preserving_order() {
        let content = "\
# worship playlist
https://youtu.be/one

https://youtu.be/two
   # indented comment
https://youtu.be/three
   ";
        let links = parse_links(content);
        assert_eq!(
            links,
            vec![
                "https://youtu.be/one",
                "https://youtu.be/two",
                "https://youtu.be/three",
            ]
        );
    }

    #[test]
    fn test_parse_all_comments_yields_empty() {
        assert!(parse_links("# a\n# b\n\n").is_empty());
        assert!(parse_links("").is_empty());
    }

    #[test]
    fn test_read_links_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# list").unwrap();
        writeln!(file, "https://youtu.be/abc").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://youtu.be/def").unwrap();

        let links = read_links(file.path()).unwrap();
        assert_eq!(links, vec!["https://youtu.be/abc", "https://youtu.be/def"]);
    }

    #[test]
    fn test_read_links_missing_file_is_precondition_error() {
        let err = read_links(Path::new("/no/such/links.txt")).unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }
}
