use edutec_assistant::error::AssistantError;
use edutec_assistant::usecase::issue::hash_secret;
use edutec_assistant::usecase::login::{LoginInput, LoginUseCase};

use crate::helpers::{MockAttempts, MockDirectory, RecordingMailer, account, test_domains};

fn ana_with_password(password: &str) -> edutec_assistant::domain::types::Account {
    let mut ana = account("ana@alu.inst.edu");
    ana.password_hash = hash_secret(password).unwrap();
    ana
}

#[tokio::test]
async fn should_sign_in_and_clear_the_counter() {
    let ana = ana_with_password("Correct-Horse9");
    let attempts = MockAttempts::empty();
    let mailer = RecordingMailer::new();

    let uc = LoginUseCase {
        accounts: MockDirectory::new(vec![ana.clone()]),
        attempts: attempts.clone(),
        mailer: mailer.clone(),
        domains: test_domains(),
    };

    // A stale failure from earlier should not survive a good sign-in.
    attempts
        .counts
        .lock()
        .unwrap()
        .insert(ana.email.clone(), 1);

    let out = uc
        .execute(LoginInput {
            email: ana.email.clone(),
            password: "Correct-Horse9".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.account.email, ana.email);
    assert!(attempts.handle().lock().unwrap().is_empty());

    let sent = mailer.handle().lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("New sign-in"));
}

#[tokio::test]
async fn should_count_a_failed_attempt_below_the_alert_threshold() {
    let ana = ana_with_password("Correct-Horse9");
    let attempts = MockAttempts::empty();
    let mailer = RecordingMailer::new();

    let uc = LoginUseCase {
        accounts: MockDirectory::new(vec![ana.clone()]),
        attempts: attempts.clone(),
        mailer: mailer.clone(),
        domains: test_domains(),
    };

    let result = uc
        .execute(LoginInput {
            email: ana.email.clone(),
            password: "wrong".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AssistantError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert_eq!(attempts.handle().lock().unwrap()[&ana.email], 1);
    assert!(mailer.handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_alert_the_owner_after_repeated_failures() {
    let ana = ana_with_password("Correct-Horse9");
    let attempts = MockAttempts::empty();
    let mailer = RecordingMailer::new();

    let uc = LoginUseCase {
        accounts: MockDirectory::new(vec![ana.clone()]),
        attempts: attempts.clone(),
        mailer: mailer.clone(),
        domains: test_domains(),
    };

    for _ in 0..3 {
        let result = uc
            .execute(LoginInput {
                email: ana.email.clone(),
                password: "wrong".to_owned(),
            })
            .await;
        assert!(matches!(result, Err(AssistantError::InvalidCredentials)));
    }

    let sent = mailer.handle().lock().unwrap().clone();
    assert_eq!(sent.len(), 1, "exactly one alert for the burst");
    assert_eq!(sent[0].to, ana.email);
    assert!(sent[0].subject.contains("Security alert"));
    // The counter restarts so the next burst can alert again.
    assert!(attempts.handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_non_institutional_sign_in() {
    let attempts = MockAttempts::empty();
    let uc = LoginUseCase {
        accounts: MockDirectory::empty(),
        attempts: attempts.clone(),
        mailer: RecordingMailer::new(),
        domains: test_domains(),
    };

    let result = uc
        .execute(LoginInput {
            email: "parent@gmail.com".to_owned(),
            password: "whatever".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AssistantError::NonInstitutionalEmail)),
        "expected NonInstitutionalEmail, got {result:?}"
    );
    assert!(attempts.handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_count_unknown_addresses_without_alerting() {
    let attempts = MockAttempts::empty();
    let mailer = RecordingMailer::new();

    let uc = LoginUseCase {
        accounts: MockDirectory::empty(),
        attempts: attempts.clone(),
        mailer: mailer.clone(),
        domains: test_domains(),
    };

    for _ in 0..3 {
        let result = uc
            .execute(LoginInput {
                email: "ghost@alu.inst.edu".to_owned(),
                password: "wrong".to_owned(),
            })
            .await;
        assert!(matches!(result, Err(AssistantError::InvalidCredentials)));
    }

    assert_eq!(attempts.handle().lock().unwrap()["ghost@alu.inst.edu"], 3);
    assert!(
        mailer.handle().lock().unwrap().is_empty(),
        "no owner, no alert"
    );
}

#[tokio::test]
async fn should_sign_in_even_when_the_notice_mail_fails() {
    let ana = ana_with_password("Correct-Horse9");
    let uc = LoginUseCase {
        accounts: MockDirectory::new(vec![ana.clone()]),
        attempts: MockAttempts::empty(),
        mailer: RecordingMailer::failing(),
        domains: test_domains(),
    };

    let out = uc
        .execute(LoginInput {
            email: ana.email.clone(),
            password: "Correct-Horse9".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.account.email, ana.email);
}
