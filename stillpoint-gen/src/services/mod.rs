//! Services for stillpoint-gen
//!
//! External-service clients and the generation pipeline that chains
//! them: script generation → speech synthesis → mixing → publication.

pub mod media_store;
pub mod pipeline;
pub mod script_generator;
pub mod speech_synthesizer;
pub mod track_mixer;

pub use media_store::MediaStore;
pub use pipeline::{mark_generation_failed, GenerationPipeline};
pub use script_generator::{GeminiScriptClient, ScriptGenerator};
pub use speech_synthesizer::{GoogleTtsClient, SpeechSynthesizer};
pub use track_mixer::TrackMixer;
