use edutec_assistant::domain::types::{ChatRole, ChatTurn};
use edutec_assistant::error::AssistantError;
use edutec_assistant::usecase::chat::{AskAssistantUseCase, AskInput};

use crate::helpers::{STUB_SECRET, StubGenerator};

fn turn(role: ChatRole, text: &str) -> ChatTurn {
    ChatTurn {
        role,
        text: text.to_owned(),
    }
}

#[tokio::test]
async fn should_relay_the_conversation_to_the_generator() {
    let uc = AskAssistantUseCase {
        generator: StubGenerator::returning(STUB_SECRET),
    };

    let out = uc
        .execute(AskInput {
            history: vec![
                turn(ChatRole::User, "hola"),
                turn(ChatRole::Model, "¡Hola! ¿En qué puedo ayudarte?"),
                turn(ChatRole::User, "what can you do?"),
            ],
        })
        .await
        .unwrap();

    assert_eq!(out.reply, "echo: what can you do?");
}

#[tokio::test]
async fn should_surface_generator_outages() {
    let uc = AskAssistantUseCase {
        generator: StubGenerator::unavailable(),
    };

    let result = uc
        .execute(AskInput {
            history: vec![turn(ChatRole::User, "hola")],
        })
        .await;

    assert!(
        matches!(result, Err(AssistantError::GenerationUnavailable)),
        "expected GenerationUnavailable, got {result:?}"
    );
}
