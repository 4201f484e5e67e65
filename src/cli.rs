use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-stamp",
    about = "Size-aware image watermark stamping with an embedded asset catalog",
    long_about = "img-stamp composites a translucent watermark into the bottom-right corner of images. \
                  The stamp size is chosen from the image dimensions (32px to 256px), assets are \
                  compiled into the binary, and output is always lossless PNG. Supports single files, \
                  parallel batch runs, and store change events with the xformed_ naming convention.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    img-stamp stamp photo.jpg stamped.png\n  \
    img-stamp batch \"./images/*.jpg\" ./stamped -r\n  \
    img-stamp event ./store --kind created --key photo.jpg\n  \
    img-stamp info photo.png\n  \
    img-stamp assets"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventKind {
    /// An object was created or overwritten
    Created,
    /// An object was removed
    Removed,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Watermark a single image file",
        long_about = "Decode one image, composite the size-matched stamp into its bottom-right \
                      corner, and write the result as PNG. Input format is detected from the \
                      file contents (JPEG, PNG, WebP, GIF, BMP, TIFF)."
    )]
    Stamp {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path (always PNG content)")]
        output: PathBuf,

        #[arg(
            short = 's',
            long,
            help = "Fixed stamp size in pixels (16, 32, 64, 128, 256)",
            long_help = "Skip size selection and use this stamp size. \
                         Must be one of the packaged sizes: 16, 32, 64, 128, 256."
        )]
        size: Option<u32>,

        #[arg(
            short = 'O',
            long,
            help = "Recompress the output PNG with oxipng",
            long_help = "Run the encoded PNG through oxipng before writing. \
                         Lossless, slower, smaller artifacts."
        )]
        optimize: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)",
            long_help = "Number of threads for parallel pixel work. \
                         If not specified, uses number of CPU cores."
        )]
        threads: Option<usize>,
    },

    #[command(
        about = "Watermark multiple images in parallel",
        long_about = "Process multiple images in parallel with batch operations. \
                      Supports directory traversal, glob patterns, and recursive processing. \
                      Each output keeps the source file name behind an xformed_ prefix; files \
                      already carrying the prefix are skipped."
    )]
    Batch {
        #[arg(
            help = "Input directory, file pattern, or glob",
            long_help = "Input can be a directory path, file pattern, or glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(
            short = 's',
            long,
            help = "Fixed stamp size in pixels (16, 32, 64, 128, 256)",
            long_help = "Skip per-image size selection and use this stamp size for every file."
        )]
        size: Option<u32>,

        #[arg(
            short = 'O',
            long,
            help = "Recompress each output PNG with oxipng"
        )]
        optimize: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)",
            long_help = "Number of threads for parallel batch processing."
        )]
        threads: Option<usize>,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively process all subdirectories when input is a directory."
        )]
        recursive: bool,
    },

    #[command(
        about = "Apply one store change event to a directory-backed store",
        long_about = "Replay a storage change notification against a store rooted at the given \
                      directory. A created event watermarks the object and writes it under the \
                      xformed_ prefixed key; a removed event deletes the prefixed artifact. \
                      Objects whose key already carries the prefix are skipped."
    )]
    Event {
        #[arg(help = "Store root directory")]
        root: PathBuf,

        #[arg(short = 'k', long, value_enum, help = "Event kind (created, removed)")]
        kind: EventKind,

        #[arg(long, help = "Object key the event refers to")]
        key: String,

        #[arg(
            short = 'O',
            long,
            help = "Recompress the stored PNG with oxipng"
        )]
        optimize: bool,
    },

    #[command(
        about = "Display image information and the stamp selection for it",
        long_about = "Analyze an image file and display its dimensions, format, and file size, \
                      plus the stamp size the selector would pick and where the stamp would land."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },

    #[command(
        about = "List the stamp assets packaged into this binary",
        long_about = "Print every stamp size compiled into the binary along with its encoded \
                      byte size, and mark the default fallback entry."
    )]
    Assets,
}
