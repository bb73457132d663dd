//! Text-templating adapters.

mod tera;

pub use self::tera::TeraRenderer;
