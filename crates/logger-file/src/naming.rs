//! On-disk file names derived from the requested log path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Number of trailing characters the application tag is inserted in front of.
const EXTENSION_CHARS: usize = 4;

/// Inserts `tag` in front of the last four characters of `path`.
///
/// The four characters are expected to be an extension such as `.log`, so
/// `C:\Logs\app.log` with tag `_host` becomes `C:\Logs\app_host.log`. Paths
/// shorter than that get the tag prepended.
#[must_use]
pub fn tagged_file_name(path: &str, tag: &str) -> String {
    let split = path
        .char_indices()
        .rev()
        .nth(EXTENSION_CHARS - 1)
        .map_or(0, |(index, _)| index);

    let mut name = String::with_capacity(path.len() + tag.len());
    name.push_str(&path[..split]);
    name.push_str(tag);
    name.push_str(&path[split..]);
    name
}

/// Name of the `index`-th rotated segment of `base`.
///
/// Index 0 is the active file itself; `app.log` rotates to `app.1.log`,
/// `app.2.log` and so on.
#[must_use]
pub fn rotated_file_name(base: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }

    let mut name = OsString::new();
    if let Some(stem) = base.file_stem() {
        name.push(stem);
    }
    name.push(format!(".{index}"));
    if let Some(extension) = base.extension() {
        name.push(".");
        name.push(extension);
    }
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_goes_before_extension() {
        assert_eq!(
            tagged_file_name(r"C:\Logs\app.log", "_host"),
            r"C:\Logs\app_host.log"
        );
        assert_eq!(tagged_file_name("/var/log/app.txt", "_svc"), "/var/log/app_svc.txt");
    }

    #[test]
    fn test_position_is_four_characters_not_extension() {
        // Only the character count matters
        assert_eq!(tagged_file_name("trace.json", "_x"), "trace._xjson");
        assert_eq!(tagged_file_name("noext", "_x"), "n_xoext");
    }

    #[test]
    fn test_short_paths_get_tag_prepended() {
        assert_eq!(tagged_file_name(".lg", "_x"), "_x.lg");
        assert_eq!(tagged_file_name("", "_x"), "_x");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(tagged_file_name("日誌.log", "_x"), "日誌_x.log");
        assert_eq!(tagged_file_name("x日誌誌誌", "_t"), "x_t日誌誌誌");
    }

    #[test]
    fn test_rotated_names() {
        let base = Path::new("logs/app_host.log");

        assert_eq!(rotated_file_name(base, 0), base);
        assert_eq!(rotated_file_name(base, 1), Path::new("logs/app_host.1.log"));
        assert_eq!(rotated_file_name(base, 12), Path::new("logs/app_host.12.log"));
        assert_eq!(rotated_file_name(Path::new("logs/app"), 2), Path::new("logs/app.2"));
    }
}
