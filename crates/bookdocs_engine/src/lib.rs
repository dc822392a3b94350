//! Bookdocs engine: the filesystem side of the documentation maintenance tools.
mod assets;
mod convert;
mod decode;
mod frontmatter;
mod persist;
mod pipeline;
mod rewrite;
mod scaffold;

pub use assets::{migrate_images, rewrite_image_links, AssetError, AssetSettings, MigrationReport};
pub use convert::{Converter, Html2MdConverter};
pub use decode::{decode_source, DecodeError, DecodedSource};
pub use frontmatter::{build_chapter_document, normalize_headings, DEFAULT_DESCRIPTION};
pub use persist::{ensure_output_dir, write_document, AtomicFileWriter, PersistError, WriteOutcome};
pub use pipeline::{
    convert_all, run_conversion, ChapterPipeline, ConversionSummary, ConvertSettings, FailedFile,
    FileOutcome, PipelineError,
};
pub use rewrite::{PatternRewriter, RewrittenHtml};
pub use scaffold::{scaffold, Placeholder, ScaffoldError, ScaffoldReport, SITE_PLACEHOLDERS};
