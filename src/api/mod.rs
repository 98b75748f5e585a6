pub mod synthesis;

pub use synthesis::SynthesisClient;
