//! afskit CLI - Command-line tool for AFS archives.
//!
//! This is the main entry point for the afskit command-line application.

mod naming;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use afskit::prelude::*;

use crate::naming::{unpacked_name, IndexPattern};

/// afskit - AFS archive packing and unpacking tool
#[derive(Parser)]
#[command(name = "afskit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Archive to unpack, or directory to pack
    path: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Unpack an archive into a directory of `{index}_{name}` files
    Unpack {
        /// Path to the AFS archive
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (defaults to the archive path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack a directory of `{index}_{name}` files into an archive
    Pack {
        /// Directory to pack
        #[arg(short, long)]
        input: PathBuf,

        /// Output archive (defaults to `<input>.afs`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// List the contents of an archive
    List {
        /// Path to the AFS archive
        #[arg(short, long)]
        input: PathBuf,

        /// Show offsets, lengths and archive times
        #[arg(short, long)]
        detailed: bool,

        /// Print the listing as JSON
        #[arg(long, conflicts_with = "detailed")]
        json: bool,
    },

    /// Extract a single file by index without reading the rest of the archive
    Extract {
        /// Path to the AFS archive
        #[arg(short, long)]
        input: PathBuf,

        /// Index of the file to extract
        #[arg(short = 'n', long)]
        index: usize,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Settings for writing archives.
#[derive(Debug, Clone, clap::Args)]
struct WriteArgs {
    /// Section alignment in bytes (0 disables padding)
    #[arg(long, env = "AFSKIT_ALIGNMENT", default_value_t = Layout::DEFAULT_ALIGNMENT)]
    alignment: u64,

    /// Which sections to write
    #[arg(long, env = "AFSKIT_MODE", value_enum, default_value_t = ModeArg::WithMetadata)]
    mode: ModeArg,
}

impl Default for WriteArgs {
    fn default() -> Self {
        Self {
            alignment: Layout::DEFAULT_ALIGNMENT,
            mode: ModeArg::WithMetadata,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    WithMetadata,
    NoMetadata,
    HeaderOnly,
}

impl From<ModeArg> for CreationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::WithMetadata => CreationMode::WithMetadata,
            ModeArg::NoMetadata => CreationMode::NoMetadata,
            ModeArg::HeaderOnly => CreationMode::HeaderOnly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match (cli.command, cli.path) {
        (Some(Commands::Unpack { input, output }), _) => {
            cmd_unpack(&input, output.as_deref())?;
        }
        (Some(Commands::Pack { input, output, write }), _) => {
            cmd_pack(&input, output.as_deref(), &write)?;
        }
        (Some(Commands::List { input, detailed, json }), _) => {
            cmd_list(&input, detailed, json)?;
        }
        (Some(Commands::Extract { input, index, output }), _) => {
            cmd_extract(&input, index, &output)?;
        }
        (None, Some(path)) => {
            if path.is_dir() {
                cmd_pack(&path, None, &WriteArgs::default())?;
            } else {
                cmd_unpack(&path, None)?;
            }
        }
        (None, None) => bail!("nothing to do: pass an archive or directory, or a subcommand"),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn cmd_unpack(input: &Path, output: Option<&Path>) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(""));

    info!("Opening AFS archive: {}", input.display());
    let mapped = MappedArchive::open(input).context("Failed to open AFS archive")?;
    let viewer = mapped.viewer()?;

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let start = Instant::now();
    let written = unpack_into(&viewer, &output)?;
    info!(
        "Unpacked {} files to {} in {:?}",
        written,
        output.display(),
        start.elapsed()
    );

    Ok(())
}

/// Write every file of `viewer` into `output`, in parallel.
fn unpack_into(viewer: &AfsViewer<'_>, output: &Path) -> Result<usize> {
    let pb = progress_bar(viewer.file_count())?;

    (0..viewer.file_count())
        .into_par_iter()
        .try_for_each(|index| -> Result<()> {
            let name = unpacked_name(index, &viewer.file_name(index));
            let data = viewer
                .file_data(index)
                .with_context(|| format!("Failed to read file {index}"))?;

            let path = output.join(&name);
            fs::write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
            debug!(index, bytes = data.len(), "wrote {}", name);

            pb.inc(1);
            Ok(())
        })?;

    pb.finish_with_message("Done");
    Ok(viewer.file_count())
}

fn cmd_pack(input: &Path, output: Option<&Path>, write: &WriteArgs) -> Result<()> {
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        // components() drops a trailing separator: "voice/" packs to "voice.afs"
        let mut path = OsString::from(input.components().as_path().as_os_str());
        path.push(".afs");
        PathBuf::from(path)
    });

    info!("Packing directory: {}", input.display());
    let start = Instant::now();
    let archive = collect_directory(input)?;

    let layout = archive.layout(write.alignment, write.mode.into());
    info!(
        "Writing {} files ({} bytes) to {}",
        archive.len(),
        layout.total_size(),
        output.display()
    );

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    archive
        .write_to(&mut writer, write.alignment, write.mode.into())
        .context("Failed to write AFS archive")?;
    writer.flush()?;

    info!("Packed in {:?}", start.elapsed());
    Ok(())
}

/// Read a directory of `{index}_{name}` files into an archive ordered by index.
fn collect_directory(dir: &Path) -> Result<AfsArchive> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let pattern = IndexPattern::new()?;
    let mut indexed = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        match pattern.parse(&file_name) {
            Some(Ok((index, name))) => {
                indexed.push((index, name.to_string(), entry.path().to_path_buf()))
            }
            Some(Err(err)) => warn!("Skipping {}: index prefix out of range ({})", file_name, err),
            None => warn!("Skipping {}: no index prefix", file_name),
        }
    }

    // Stable sort: equal indices keep directory order.
    indexed.sort_by_key(|(index, _, _)| *index);

    let pb = progress_bar(indexed.len())?;
    let mut archive = AfsArchive::new();
    for (_, name, path) in indexed {
        let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mut file = AfsFile::new(name, data)
            .with_context(|| format!("Cannot pack {}", path.display()))?;
        file.stamp_now()?;
        archive.push(file);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(archive)
}

fn cmd_list(input: &Path, detailed: bool, json: bool) -> Result<()> {
    let mapped = MappedArchive::open(input).context("Failed to open AFS archive")?;
    let viewer = mapped.viewer()?;

    if json {
        let infos: Vec<FileInfo> = viewer.file_infos().collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for info in viewer.file_infos() {
        if detailed {
            let time = info
                .archive_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>6} {:>12} {:>12} {:>19} {}",
                info.index, info.offset, info.length, time, info.name
            );
        } else {
            println!("{}", info.name);
        }
    }

    println!(
        "\nTotal: {} files{}",
        viewer.file_count(),
        if viewer.metadata().is_present() {
            ""
        } else {
            " (no metadata)"
        }
    );

    Ok(())
}

fn cmd_extract(input: &Path, index: usize, output: &Path) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let mut reader = SeekReader::new(BufReader::new(file)).context("Failed to read AFS header")?;

    let data = reader
        .read(index)
        .with_context(|| format!("Failed to extract file {index}"))?;
    fs::write(output, &data).with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Extracted {} bytes to {}", data.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_then_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("voice");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("10_last.adx"), b"last").unwrap();
        fs::write(source.join("2_second.adx"), b"second").unwrap();
        fs::write(source.join("0_"), b"unnamed").unwrap();
        fs::write(source.join("notes.txt"), b"ignored").unwrap();
        fs::write(source.join("99999999999999999999_huge.adx"), b"ignored").unwrap();

        let archive = collect_directory(&source).unwrap();
        let names: Vec<_> = archive.files().iter().map(AfsFile::name).collect();
        assert_eq!(names, ["", "second.adx", "last.adx"]);
        assert!(archive.files().iter().all(|f| f.archive_time().is_some()));

        let bytes = archive.serialize(2048, CreationMode::WithMetadata);
        let viewer = AfsViewer::parse(&bytes).unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        assert_eq!(unpack_into(&viewer, &out).unwrap(), 3);
        assert_eq!(fs::read(out.join("0_")).unwrap(), b"unnamed");
        assert_eq!(fs::read(out.join("1_second.adx")).unwrap(), b"second");
        assert_eq!(fs::read(out.join("2_last.adx")).unwrap(), b"last");
    }

    #[test]
    fn test_pack_rejects_long_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(format!("0_{}", "x".repeat(33))), b"").unwrap();

        assert!(collect_directory(dir.path()).is_err());
    }

    #[test]
    fn test_mode_mapping() {
        assert_eq!(CreationMode::from(ModeArg::HeaderOnly), CreationMode::HeaderOnly);
        assert_eq!(CreationMode::from(WriteArgs::default().mode), CreationMode::default());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
