//! Domain models for stillpoint-gen

mod meditation;

pub use meditation::{
    CreateMeditationRequest, Meditation, MeditationExpertise, MeditationStatus, MeditationStyle,
    NegativeEmotion, PositiveEmotion, USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
