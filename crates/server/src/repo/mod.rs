pub mod ai_analysis;
pub mod case;
pub mod case_history;
pub mod document;
