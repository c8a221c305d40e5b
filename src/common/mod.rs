//! Common utilities shared by the harness, the scenario runner and the CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::Config;
pub use error::{Error, Result};

/// Split command output into lines, dropping the trailing newline of each
pub fn output_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_lines_strips_newlines() {
        assert_eq!(
            output_lines(b"//a:b\r\n//a:c\n"),
            vec!["//a:b".to_string(), "//a:c".to_string()]
        );
    }

    #[test]
    fn test_output_lines_empty() {
        assert!(output_lines(b"").is_empty());
    }
}
