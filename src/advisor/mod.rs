pub mod tasks;
pub mod llm;
pub mod pipeline;
pub mod decision;
