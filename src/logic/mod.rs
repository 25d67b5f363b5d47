pub mod evaluator;
pub mod input;
pub mod knowledge_base;
pub mod report;
pub mod validation;

pub use evaluator::FertilityEvaluator;
pub use knowledge_base::KnowledgeBase;
