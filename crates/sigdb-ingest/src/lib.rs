pub mod normalize;
pub mod parse;
pub mod types;

pub use normalize::{build_channel_patch, normalize_signal, normalize_signals};
pub use types::{AnalysisResult, ChannelInfo, RawSignal};
