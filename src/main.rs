use clap::{Args, Parser, Subcommand};
use quire::{DirectoryArchive, Studio, StudioConfig, StudioError, ZipArchiveCodec};
use quire_core::classify::font_format_for;
use quire_traits::ArchiveCodec;
use quire_types::ImageFormat;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Packs, unpacks and previews paged HTML documents.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Settings {
    /// JSON settings file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSS page size, e.g. "A4" or "Letter landscape"
    #[arg(long, global = true)]
    page_size: Option<String>,

    /// CSS page margin
    #[arg(long, global = true)]
    page_margin: Option<String>,

    /// Deflate level, 0-9
    #[arg(long, global = true)]
    level: Option<u8>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack an unpacked project directory into an archive
    Pack {
        dir: PathBuf,
        /// Output archive; defaults to <prefix>-<millis>.zip
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract an archive into a directory
    Unpack { archive: PathBuf, dir: PathBuf },
    /// Write the self-contained preview document of an archive
    Preview {
        archive: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the fonts and images an archive carries
    Inspect { archive: PathBuf },
    /// Add font and image files to an archive
    Add {
        archive: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Settings {
    fn load(&self) -> Result<StudioConfig, StudioError> {
        let mut config = match &self.config {
            Some(path) => StudioConfig::from_file(path)?,
            None => StudioConfig::default(),
        };
        if let Some(size) = &self.page_size {
            config.page_size = size.clone();
        }
        if let Some(margin) = &self.page_margin {
            config.page_margin = margin.clone();
        }
        if let Some(level) = self.level {
            config.compression_level = level;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StudioError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("quire=info")).init();

    let cli = Cli::parse();
    let config = cli.settings.load()?;
    let mut studio = Studio::builder().with_config(config).build()?;

    match cli.command {
        Command::Pack { dir, output } => {
            let mut project = DirectoryArchive::new(&dir);
            let report = studio.import_reader(&mut project).await;
            if !report.failures.is_empty() {
                log::warn!("{} entries could not be read", report.failures.len());
            }
            let archive = studio.export()?;
            let target = output.unwrap_or_else(|| PathBuf::from(&archive.file_name));
            write_output(&target, &archive.bytes)?;
            println!("Packed {} into {}", dir.display(), target.display());
        }
        Command::Unpack { archive, dir } => {
            let mut reader = ZipArchiveCodec::new().open(fs::read(&archive)?)?;
            let written = DirectoryArchive::new(&dir).extract(reader.as_mut())?;
            println!("Extracted {} files into {}", written, dir.display());
        }
        Command::Preview { archive, output } => {
            studio.import(fs::read(&archive)?).await?;
            write_output(&output, studio.assemble().as_bytes())?;
            println!("Wrote preview to {}", output.display());
        }
        Command::Inspect { archive } => {
            let report = studio.import(fs::read(&archive)?).await?;
            let registry = studio.registry();
            let summary = json!({
                "import": report,
                "fonts": registry.family_summaries(),
                "images": registry.image_summaries(),
                "collidingImageNames": registry.colliding_filenames(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Add { archive, files, output } => {
            studio.import(fs::read(&archive)?).await?;
            let (images, fonts) = read_files(&files)?;
            let images = studio.upload_images(images);
            let fonts = studio.upload_fonts(fonts);
            let packed = studio.export()?;
            let target = output.unwrap_or(archive);
            write_output(&target, &packed.bytes)?;
            println!(
                "Added {} image(s) and {} font file(s), skipped {}; wrote {}",
                images.accepted,
                fonts.accepted,
                images.skipped + fonts.skipped,
                target.display()
            );
        }
    }
    Ok(())
}

type NamedFiles = Vec<(String, Vec<u8>)>;

/// Reads files and splits them into images and everything else.
fn read_files(paths: &[PathBuf]) -> Result<(NamedFiles, NamedFiles), StudioError> {
    let mut images = Vec::new();
    let mut others = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StudioError::Config(format!("'{}' has no usable file name", path.display())))?
            .to_string();
        let bytes = fs::read(path)?;
        if ImageFormat::from_filename(&name).is_some() {
            images.push((name, bytes));
        } else {
            if font_format_for(&name).is_none() {
                log::debug!("'{}' is neither an image nor a font", name);
            }
            others.push((name, bytes));
        }
    }
    Ok((images, others))
}

/// Writes through a temporary file in the target directory so a failed
/// write never leaves a truncated output behind.
#[cfg(feature = "native")]
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), StudioError> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path).map_err(|e| StudioError::Io(e.error))?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), StudioError> {
    fs::write(path, bytes)?;
    Ok(())
}
