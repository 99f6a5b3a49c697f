//! Ordered image list with a saturating cursor.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{BoundaryError, Error, Result};

pub struct ImageSet {
    paths: Vec<PathBuf>,
    index: usize,
}

impl ImageSet {
    /// List `*.jpg` files in `dir` in natural order.
    pub fn scan(dir: &Path) -> Result<Self> {
        let paths = list_images(dir)?;
        info!("found {} images in {}", paths.len(), dir.display());
        Self::from_paths(paths).ok_or_else(|| Error::EmptyImageSet(dir.to_path_buf()))
    }

    /// Build from an explicit list, natural-sorting it. `None` if empty.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            return None;
        }
        sort_naturally(&mut paths);
        Some(Self { paths, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path_at(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn current(&self) -> &Path {
        &self.paths[self.index]
    }

    pub fn advance(&mut self) -> std::result::Result<usize, BoundaryError> {
        if self.index + 1 >= self.paths.len() {
            return Err(BoundaryError::Last);
        }
        self.index += 1;
        Ok(self.index)
    }

    pub fn retreat(&mut self) -> std::result::Result<usize, BoundaryError> {
        if self.index == 0 {
            return Err(BoundaryError::First);
        }
        self.index -= 1;
        Ok(self.index)
    }

    pub(crate) fn seek(&mut self, index: usize) {
        self.index = index.min(self.paths.len() - 1);
    }
}

/// `*.jpg` files directly inside `dir`, natural-sorted.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let is_jpg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jpg"));
        if is_jpg && path.is_file() {
            paths.push(path);
        }
    }
    sort_naturally(&mut paths);
    Ok(paths)
}

pub fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
}

/// Compare strings treating runs of ASCII digits as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a_rest, mut b_rest) = (a, b);
    loop {
        match (a_rest.is_empty(), b_rest.is_empty()) {
            (true, true) => return a.cmp(b),
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        let (a_chunk, a_tail) = split_chunk(a_rest);
        let (b_chunk, b_tail) = split_chunk(b_rest);
        let is_num = |s: &str| s.as_bytes()[0].is_ascii_digit();
        let ord = if is_num(a_chunk) && is_num(b_chunk) {
            let a_num = a_chunk.trim_start_matches('0');
            let b_num = b_chunk.trim_start_matches('0');
            a_num
                .len()
                .cmp(&b_num.len())
                .then_with(|| a_num.cmp(b_num))
        } else {
            a_chunk.cmp(b_chunk)
        };
        if ord != Ordering::Equal {
            return ord;
        }
        a_rest = a_tail;
        b_rest = b_tail;
    }
}

/// Leading run of either digits or non-digits.
fn split_chunk(s: &str) -> (&str, &str) {
    let digit = s.as_bytes()[0].is_ascii_digit();
    let end = s
        .bytes()
        .position(|b| b.is_ascii_digit() != digit)
        .unwrap_or(s.len());
    s.split_at(end)
}
