pub mod evaluation;
pub mod transcription;

pub use evaluation::{ClaudeClient, Evaluation, EvaluationError, EvaluationScores, Evaluator};
pub use transcription::{Transcriber, TranscriptionError, WhisperClient};
