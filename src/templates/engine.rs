//! `{{ VAR }}` substitution and template directory copying.
//!
//! Only keys present in the variable map are replaced. Component sources are
//! full of JSX object literals (`style={{ flex: 1 }}`), so a general template
//! engine cannot be run over them.

use include_dir::{Dir, DirEntry, File};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, Result, fs_ops};

pub type Variables = BTreeMap<String, String>;

const TEMPLATE_SUFFIXES: [&str; 2] = [".template.tsx", ".template.ts"];

/// Replace every `{{ KEY }}` whose trimmed key is in `vars`.
pub fn interpolate(content: &str, vars: &Variables) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };

        let key = after_open[..end].trim();
        out.push_str(&rest[..start]);
        match vars.get(key) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[end + 2..];
            }
            None => {
                // Not ours; emit the braces and keep scanning inside them
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Where a starter tree comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compiled into the binary.
    Embedded(&'static Dir<'static>),
    /// A directory on disk, e.g. from `--template`.
    Directory(PathBuf),
}

/// Copy `source` into `target`; see [`copy_template_dir`].
pub fn copy_template(
    source: &TemplateSource,
    target: &Path,
    vars: &Variables,
) -> Result<Vec<String>> {
    match source {
        TemplateSource::Embedded(dir) => copy_embedded_dir(dir, target, vars),
        TemplateSource::Directory(dir) => copy_template_dir(dir, target, vars),
    }
}

/// Copy an embedded tree into `target` with the same rules as
/// [`copy_template_dir`].
pub fn copy_embedded_dir(
    source: &Dir<'_>,
    target: &Path,
    vars: &Variables,
) -> Result<Vec<String>> {
    fs_ops::ensure_dir(target)?;

    let mut files = Vec::new();
    collect_files(source, &mut files);
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let mut written = Vec::new();
    for file in files {
        let relative = file.path().to_string_lossy().replace('\\', "/");
        match strip_template_infix(&relative) {
            Some(output) => {
                let content = String::from_utf8_lossy(file.contents());
                fs_ops::write(&target.join(&output), &interpolate(&content, vars))?;
                written.push(output);
            }
            None => {
                fs_ops::write_bytes(&target.join(&relative), file.contents())?;
                written.push(relative);
            }
        }
    }

    debug!(count = written.len(), target = %target.display(), "copied embedded template");
    Ok(written)
}

fn collect_files<'a>(dir: &'a Dir<'a>, out: &mut Vec<&'a File<'a>>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_files(sub, out),
            DirEntry::File(file) => out.push(file),
        }
    }
}

/// Copy a template tree into `target`.
///
/// `*.template.ts(x)` files are interpolated and written without the
/// `.template` infix; everything else is copied as-is. Returns the written
/// paths relative to `target`.
pub fn copy_template_dir(source: &Path, target: &Path, vars: &Variables) -> Result<Vec<String>> {
    if !source.is_dir() {
        return Err(Error::TemplateNotFound(source.to_path_buf()));
    }
    fs_ops::ensure_dir(target)?;

    let mut written = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::FileRead {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        match strip_template_infix(&relative) {
            Some(output) => {
                let content = fs_ops::read_to_string(entry.path())?;
                fs_ops::write(&target.join(&output), &interpolate(&content, vars))?;
                written.push(output);
            }
            None => {
                fs_ops::copy_file(entry.path(), &target.join(&relative))?;
                written.push(relative);
            }
        }
    }

    debug!(count = written.len(), target = %target.display(), "copied template");
    Ok(written)
}

/// `a/b.template.tsx` -> `a/b.tsx`; `None` for non-template files.
fn strip_template_infix(path: &str) -> Option<String> {
    TEMPLATE_SUFFIXES.iter().find_map(|suffix| {
        path.strip_suffix(suffix).map(|stem| {
            let ext = &suffix[".template".len()..];
            format!("{}{}", stem, ext)
        })
    })
}
