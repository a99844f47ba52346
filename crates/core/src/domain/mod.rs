pub mod assets;
pub mod brief;
pub mod language;
pub mod market;
pub mod news;
