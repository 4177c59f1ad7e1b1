use anyhow::Result;
use async_trait::async_trait;

/// Storage for the administrator-edited reading template.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Returns the stored template, or `None` when none has been saved.
    async fn load_system_prompt(&self) -> Result<Option<String>>;

    async fn save_system_prompt(&self, prompt: &str) -> Result<()>;

    /// Removes the stored template so the built-in default applies again.
    async fn reset_system_prompt(&self) -> Result<()>;
}
