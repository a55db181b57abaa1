//! Download file names.

use std::collections::HashSet;

use crate::codec::ImageFormat;

/// Derives the output name by swapping a trailing `.png` for the target
/// extension. Names without a PNG extension get the extension appended.
pub fn output_file_name(source_name: &str, target: ImageFormat) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && ImageFormat::from_extension(ext) == Some(ImageFormat::Png) =>
        {
            stem
        }
        _ => source_name,
    };
    format!("{}.{}", stem, target.extension())
}

/// Makes names unique, keeping order. Later duplicates become
/// `name (2).ext`, `name (3).ext` and so on.
pub fn dedupe_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for name in names {
        if seen.insert(name.clone()) {
            unique.push(name);
            continue;
        }

        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
            _ => (name.clone(), String::new()),
        };

        let mut n = 2;
        loop {
            let candidate = format!("{} ({}){}", stem, n, ext);
            if seen.insert(candidate.clone()) {
                unique.push(candidate);
                break;
            }
            n += 1;
        }
    }

    unique
}
