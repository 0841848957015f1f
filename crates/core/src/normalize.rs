//! Whitespace normalization applied to source buffers written to an archive.

/// Unifies line endings, trims trailing whitespace on each line, drops
/// leading and trailing blank lines and ends non-empty text with exactly one
/// newline. Deterministic and idempotent.
pub fn normalize_source(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = unified.lines().map(str::trim_end).collect();

    let Some(first) = lines.iter().position(|l| !l.is_empty()) else {
        return String::new();
    };
    let last = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(first);

    let mut out = lines[first..=last].join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_source("\r\n\n  <p>a</p>  \r\n<p>b</p>\t\n\n\n"), "  <p>a</p>\n<p>b</p>\n");
        assert_eq!(normalize_source("body {}\n\n\n.x {}"), "body {}\n\n\n.x {}\n");
    }

    #[test]
    fn test_blank_input_stays_empty() {
        assert_eq!(normalize_source(""), "");
        assert_eq!(normalize_source(" \n\t\n"), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_source("a  \r\nb\n");
        assert_eq!(normalize_source(&once), once);
    }
}
