//! Deterministic output filenames derived from DOIs.

/// Characters replaced with `_` so DOIs become safe single-segment names.
const UNSAFE_CHARS: [char; 8] = ['/', '\\', ':', '*', '?', '"', '<', '>'];

/// Derives the output filename for a DOI.
///
/// The DOI's path separators (and other filesystem-hostile characters) are
/// replaced with `_` and a `.pdf` suffix is appended. The mapping is
/// deterministic so re-runs target the same path.
///
/// # Examples
///
/// ```
/// use oaharvest::download::pdf_filename_for_doi;
///
/// assert_eq!(
///     pdf_filename_for_doi("10.1038/s41586-020-2649-2"),
///     "10.1038_s41586-020-2649-2.pdf"
/// );
/// ```
#[must_use]
pub fn pdf_filename_for_doi(doi: &str) -> String {
    let stem: String = doi
        .chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) || c == '|' {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{stem}.pdf")
}
