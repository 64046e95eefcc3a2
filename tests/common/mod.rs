use std::path::PathBuf;

/// Output directory for artifacts produced by the test run.
pub fn output_dir() -> PathBuf {
    let dir = PathBuf::from("tests/output");
    std::fs::create_dir_all(&dir).expect("create tests/output");
    dir
}

fn count_sub(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}

/// Number of page objects in a PDF, independent of whether the writer puts a
/// space between name and value. `/Type /Pages` matches the `/Type /Page`
/// needle too, so the tree node is subtracted back out.
pub fn count_pages(pdf: &[u8]) -> usize {
    let spaced = count_sub(pdf, b"/Type /Page") - count_sub(pdf, b"/Type /Pages");
    let compact = count_sub(pdf, b"/Type/Page") - count_sub(pdf, b"/Type/Pages");
    spaced + compact
}

pub fn has_xobject(pdf: &[u8]) -> bool {
    count_sub(pdf, b"/XObject") > 0
}
