//! Voice-note decoding and conversion.

mod convert;

pub use convert::{convert_to_wav, decode_audio_payload, ffmpeg_available, install_hint};
