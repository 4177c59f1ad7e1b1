pub mod chat_service;
pub mod divination_usecase;
pub mod prompt_template;
pub mod reading_response;
pub mod records_service;

pub use chat_service::{CHAT_FALLBACK_REPLY, ChatSession, chat_context};
pub use divination_usecase::{DivinationUseCase, ReadingOutcome, ReadingSource};
pub use prompt_template::{PromptInput, render_reading_prompt};
pub use reading_response::{ReadingResponse, Scores};
pub use records_service::{EffectivePrompt, PromptSource, RecordsService};
