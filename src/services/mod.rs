pub mod completeness_engine;
pub mod context_assembler;
pub mod conversation_service;
pub mod extraction_service;
pub mod guided_mode;
pub mod priority_calculator;
pub mod profile_store;
pub mod question_bank;
pub mod signal_store;

pub use completeness_engine::CompletenessEngine;
pub use context_assembler::ContextAssembler;
pub use conversation_service::{CompletedTurn, ConversationService, PreparedTurn};
pub use extraction_service::ExtractionService;
pub use guided_mode::{detect_diversion, is_diversion, DiversionCue, GuidedModeController, GuidedModeStore};
pub use priority_calculator::PriorityCalculator;
pub use profile_store::ProfileStore;
pub use question_bank::{QuestionBank, QUESTIONS};
pub use signal_store::{ResetReport, SignalStore};
