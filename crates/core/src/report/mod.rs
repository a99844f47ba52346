pub mod assemble;
pub mod market;
pub mod prompts;
pub mod translate;

pub const SOURCES_HEADER: &str = "## 📚 Sources";
