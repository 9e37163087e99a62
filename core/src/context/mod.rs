mod analysis_session;
mod interner;
mod settings;

pub use analysis_session::{AnalysisSession, CancelFlag};
pub use interner::{IStr, empty_istr, intern, resolve};
pub use settings::{APP_NAME, AnalyzerSettings, default_definitions_dir};
