use crate::domain::notification::OutgoingMail;
use crate::ports::mailer::{Mailer as MailerTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Delivery failure produced by the mock mailer
#[derive(Debug, Error)]
#[error("Mock delivery rejected for {0}")]
pub struct DeliveryRejected(pub String);

/// Scripted failure for a single recipient
#[derive(Debug, Clone, Copy)]
enum FailurePlan {
    Always,
    Times(usize),
}

/// Mock implementation of Mailer
///
/// Records every send attempt and every delivered mail.
/// Failures can be scripted per recipient address.
#[derive(Default)]
pub struct Mailer {
    attempts: Mutex<Vec<OutgoingMail>>,
    delivered: Mutex<Vec<OutgoingMail>>,
    failures: Mutex<HashMap<String, FailurePlan>>,
}

impl Mailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every mail addressed to `recipient`
    pub fn fail_always(&self, recipient: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(recipient.to_string(), FailurePlan::Always);
    }

    /// Reject the next `times` mails addressed to `recipient`
    pub fn fail_times(&self, recipient: &str, times: usize) {
        self.failures
            .lock()
            .unwrap()
            .insert(recipient.to_string(), FailurePlan::Times(times));
    }

    /// All send attempts, including rejected ones
    pub fn attempts(&self) -> Vec<OutgoingMail> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempts_to(&self, recipient: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|mail| mail.to.iter().any(|to| to == recipient))
            .count()
    }

    /// Mails that were accepted
    pub fn delivered(&self) -> Vec<OutgoingMail> {
        self.delivered.lock().unwrap().clone()
    }

    fn should_reject(&self, recipient: &str) -> bool {
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(recipient) {
            Some(FailurePlan::Always) => true,
            Some(FailurePlan::Times(remaining)) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl MailerTrait for Mailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        self.attempts.lock().unwrap().push(mail.clone());

        if let Some(rejected) = mail.to.iter().find(|to| self.should_reject(to)) {
            return Err(Box::new(DeliveryRejected(rejected.clone())));
        }

        self.delivered.lock().unwrap().push(mail.clone());
        Ok(())
    }
}
