// Resume ranking: fixed prompt → model call → lenient reply parsing.
// All model calls go through the `LanguageModel` trait.

pub mod parser;
pub mod pipeline;
pub mod prompts;
