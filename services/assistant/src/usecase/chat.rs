use crate::domain::repository::GenerationService;
use crate::domain::types::ChatTurn;
use crate::error::AssistantError;

pub struct AskInput {
    pub history: Vec<ChatTurn>,
}

#[derive(Debug)]
pub struct AskOutput {
    pub reply: String,
}

/// Free-form conversation with the assistant, no credential side effects.
pub struct AskAssistantUseCase<G>
where
    G: GenerationService,
{
    pub generator: G,
}

impl<G> AskAssistantUseCase<G>
where
    G: GenerationService,
{
    pub async fn execute(&self, input: AskInput) -> Result<AskOutput, AssistantError> {
        let reply = self.generator.chat(&input.history).await?;
        Ok(AskOutput { reply })
    }
}
