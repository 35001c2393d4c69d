/// Text preparation ahead of speech synthesis
pub mod ssml;

pub use ssml::markdown_to_ssml;
