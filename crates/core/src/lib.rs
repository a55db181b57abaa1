pub mod archive;
pub mod batch;
pub mod codec;
pub mod config;
pub mod intake;
pub mod output;
pub mod session;
pub mod testing;

pub use archive::{ArchiveEntry, ArchiveError, ArchivePackager, ZipPackager};
pub use batch::{BatchConverter, BatchError, BatchProgress, BatchSummary, CancelToken};
pub use codec::{Codec, CodecError, FailureKind, ImageFormat, RasterSurface, WebpCodec};
pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
};
pub use intake::{FileId, FileItem, FileState, FileStatus, IntakeReport, SourceFile};
pub use output::{
    format_savings, format_size, DirectorySink, Download, DownloadSink, OutputError,
    OutputManager,
};
pub use session::{Session, SessionError, SessionStats, SharedSession};
