//! Generated pack directories: statistics, structure checks and ZIP export

use glob::glob;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::metadata::PackMetadata;
use crate::models::AnimationType;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid pack structure:\n{}", .0.iter().map(|p| format!("  - {}", p)).collect::<Vec<_>>().join("\n"))]
    InvalidStructure(Vec<String>),
}

/// Every file under `pack_dir`, sorted.
pub fn discover_files(pack_dir: &Path) -> Result<Vec<PathBuf>, PackError> {
    let base = glob::Pattern::escape(&pack_dir.to_string_lossy());
    let pattern = format!("{}/**/*", base);
    let paths = glob(&pattern).map_err(|e| PackError::InvalidPattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("error reading path: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// File counts and sizes for a pack on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackSummary {
    pub total_files: usize,
    pub total_size_bytes: u64,
    /// Creature directories (all variants of a creature share one)
    pub num_creatures: usize,
    pub num_frames: usize,
    pub num_sprite_sheets: usize,
}

impl PackSummary {
    /// Walk `pack_dir` and tally its contents. A missing directory is empty.
    pub fn collect(pack_dir: &Path) -> Result<Self, PackError> {
        let mut summary = Self::default();
        if !pack_dir.exists() {
            return Ok(summary);
        }

        for path in discover_files(pack_dir)? {
            summary.total_files += 1;
            summary.total_size_bytes += fs::metadata(&path)?.len();

            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            let parent = path.parent().and_then(|p| p.file_name()).map(|n| n.to_string_lossy());
            if name.starts_with("frame_") {
                summary.num_frames += 1;
            } else if parent.as_deref() == Some("sprite_sheets") {
                summary.num_sprite_sheets += 1;
            }
        }

        let creatures_dir = pack_dir.join("creatures");
        if creatures_dir.is_dir() {
            for entry in fs::read_dir(&creatures_dir)? {
                if entry?.file_type()?.is_dir() {
                    summary.num_creatures += 1;
                }
            }
        }

        Ok(summary)
    }

    pub fn total_size_mb(&self) -> f64 {
        self.total_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl fmt::Display for PackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Files:     {}", self.total_files)?;
        writeln!(f, "Total Size:      {:.2} MB", self.total_size_mb())?;
        writeln!(f, "Creatures:       {}", self.num_creatures)?;
        writeln!(f, "Frames:          {}", self.num_frames)?;
        write!(f, "Sprite Sheets:   {}", self.num_sprite_sheets)
    }
}

/// Check a pack has the expected layout. Returns the problems found.
///
/// Only the first creature directory (by name) is inspected in detail.
pub fn validate_pack_structure(pack_dir: &Path) -> Vec<String> {
    let mut problems = Vec::new();

    for required in ["creatures", "metadata.json", "README.txt"] {
        if !pack_dir.join(required).exists() {
            problems.push(format!("missing required path: {}", pack_dir.join(required).display()));
        }
    }

    let mut creature_dirs: Vec<PathBuf> = fs::read_dir(pack_dir.join("creatures"))
        .map(|entries| {
            entries.filter_map(Result::ok).map(|e| e.path()).filter(|p| p.is_dir()).collect()
        })
        .unwrap_or_default();
    creature_dirs.sort();

    match creature_dirs.first() {
        None => problems.push("no creature directories found".to_string()),
        Some(first) => {
            let subdirs = AnimationType::ALL.iter().map(|a| a.as_str()).chain(["sprite_sheets"]);
            for subdir in subdirs {
                if !first.join(subdir).is_dir() {
                    problems.push(format!("missing required subdirectory: {}", first.join(subdir).display()));
                }
            }
        }
    }

    problems
}

/// Archive file stem: `pixel_creatures[_<pack_id>]_<theme>_<W>x<H>`.
///
/// The theme is lowercased with spaces turned into underscores.
pub fn pack_filename(theme_name: &str, resolution: [u32; 2], pack_id: Option<&str>) -> String {
    let mut parts = vec!["pixel_creatures".to_string()];
    if let Some(id) = pack_id.filter(|id| !id.is_empty()) {
        parts.push(id.to_string());
    }
    parts.push(theme_name.trim().to_lowercase().replace(' ', "_"));
    parts.push(format!("{}x{}", resolution[0], resolution[1]));
    parts.join("_")
}

/// `<parent>/<pack dir name>.zip`, next to the pack directory.
pub fn default_archive_path(pack_dir: &Path) -> PathBuf {
    let name = pack_dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    pack_dir.with_file_name(format!("{}.zip", name))
}

/// Entry name for `path`: relative to `base`, `/`-separated.
fn archive_name(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Write every file of the pack into a deflated ZIP archive.
///
/// Entries are named relative to the pack's parent directory, so the archive
/// unpacks into a single `<pack>/` directory. Without `output_path` the
/// archive goes next to the pack (see [`default_archive_path`]).
pub fn create_pack_archive(pack_dir: &Path, output_path: Option<&Path>) -> Result<PathBuf, PackError> {
    let output = output_path.map(Path::to_path_buf).unwrap_or_else(|| default_archive_path(pack_dir));
    let base = pack_dir.parent().unwrap_or_else(|| Path::new(""));
    log::info!("Creating archive: {}", output.display());

    let files = discover_files(pack_dir)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(&output)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in &files {
        let name = archive_name(base, path);
        zip.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
        log::debug!("Added to archive: {}", name);
    }
    zip.finish()?;

    log::info!("Archive created: {} ({} files)", output.display(), files.len());
    Ok(output)
}

/// Delete the pack directory, e.g. once it has been archived.
pub fn cleanup_pack_dir(pack_dir: &Path) -> Result<(), PackError> {
    if pack_dir.is_dir() {
        log::info!("Removing pack directory: {}", pack_dir.display());
        fs::remove_dir_all(pack_dir)?;
    }
    Ok(())
}

/// What [`export_pack`] should do after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub create_archive: bool,
    /// Remove the pack directory once archived (ignored without an archive)
    pub cleanup: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { create_archive: true, cleanup: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub pack_dir: PathBuf,
    pub archive_path: Option<PathBuf>,
    /// Taken before any cleanup
    pub summary: PackSummary,
}

/// Validate a generated pack, collect its statistics and optionally archive it
/// into `output_dir` under [`pack_filename`].
pub fn export_pack(
    pack_dir: &Path,
    output_dir: &Path,
    pack: &PackMetadata,
    options: ExportOptions,
) -> Result<ExportReport, PackError> {
    let problems = validate_pack_structure(pack_dir);
    if !problems.is_empty() {
        return Err(PackError::InvalidStructure(problems));
    }

    let summary = PackSummary::collect(pack_dir)?;
    log::info!(
        "Pack statistics: {} files, {:.2} MB, {} frames, {} sheets",
        summary.total_files,
        summary.total_size_mb(),
        summary.num_frames,
        summary.num_sprite_sheets
    );

    let mut archive_path = None;
    if options.create_archive {
        let stem = pack_filename(&pack.theme_name, pack.resolution, Some(&pack.pack_id));
        let path = output_dir.join(format!("{}.zip", stem));
        archive_path = Some(create_pack_archive(pack_dir, Some(&path))?);
        if options.cleanup {
            cleanup_pack_dir(pack_dir)?;
        }
    } else if options.cleanup {
        log::warn!("Keeping {}: nothing was archived", pack_dir.display());
    }

    Ok(ExportReport { pack_dir: pack_dir.to_path_buf(), archive_path, summary })
}
