pub mod openai;

pub use openai::OpenAIClient;
