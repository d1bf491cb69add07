pub mod error;
pub mod feature_flags;

pub mod analysis;
pub mod case;
pub mod document;
pub mod history;
pub mod record;

pub use error::*;
pub use feature_flags::*;

pub use analysis::*;
pub use case::*;
pub use document::*;
pub use history::*;
pub use record::*;
