use crate::domain::repository::{AccountDirectory, LoginAttemptCache, Mailer};
use crate::domain::types::{Account, InstitutionalDomains, LOGIN_ALERT_THRESHOLD, OutgoingMail};
use crate::error::AssistantError;
use crate::usecase::issue::verify_secret;

fn signin_mail(account: &Account) -> OutgoingMail {
    OutgoingMail {
        to: account.email.clone(),
        subject: "New sign-in to your EduTecHub account".to_owned(),
        text: format!(
            "Hi {}! Your EduTecHub account was just signed in to. \
             If this wasn't you, please reset your password right away.",
            account.full_name
        ),
        html: None,
    }
}

fn alert_mail(account: &Account, count: u64) -> OutgoingMail {
    OutgoingMail {
        to: account.email.clone(),
        subject: "Security alert: repeated failed sign-in attempts".to_owned(),
        text: format!(
            "Hi {}! There have been {} failed sign-in attempts on your EduTecHub \
             account within the last 15 minutes. If this wasn't you, please reset \
             your password right away.",
            account.full_name, count
        ),
        html: None,
    }
}

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: Account,
}

pub struct LoginUseCase<D, A, M>
where
    D: AccountDirectory,
    A: LoginAttemptCache,
    M: Mailer,
{
    pub accounts: D,
    pub attempts: A,
    pub mailer: M,
    pub domains: InstitutionalDomains,
}

impl<D, A, M> LoginUseCase<D, A, M>
where
    D: AccountDirectory,
    A: LoginAttemptCache,
    M: Mailer,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AssistantError> {
        // 1. Only institutional addresses may sign in
        let email = input.email.trim().to_lowercase();
        if !self.domains.is_institutional(&email) {
            return Err(AssistantError::NonInstitutionalEmail);
        }

        // 2. Find + verify. Unknown address and wrong password give the same
        //    401, and both feed the failure counter.
        let account = self.accounts.find_by_email(&email).await?;
        let account = match account {
            Some(account) if verify_secret(&input.password, &account.password_hash) => account,
            other => {
                self.note_failure(&email, other.as_ref()).await?;
                return Err(AssistantError::InvalidCredentials);
            }
        };

        // 3. Success clears the counter; the notice mail is best effort
        self.attempts.clear(&email).await?;
        if let Err(e) = self.mailer.send(&signin_mail(&account)).await {
            tracing::warn!(error = %e, "failed to send sign-in notice");
        }
        Ok(LoginOutput { account })
    }

    async fn note_failure(
        &self,
        email: &str,
        account: Option<&Account>,
    ) -> Result<(), AssistantError> {
        let count = self.attempts.record_failure(email).await?;
        // No owner to warn for addresses without an account.
        let Some(account) = account else { return Ok(()) };
        if count >= LOGIN_ALERT_THRESHOLD {
            if let Err(e) = self.mailer.send(&alert_mail(account, count)).await {
                tracing::warn!(error = %e, "failed to send sign-in alert");
            }
            self.attempts.clear(email).await?;
        }
        Ok(())
    }
}
