//! Guided chat
//!
//! A scripted quiz that ends in a contact form and a lead-capture inquiry.
//! [`quiz::transition`] decides what happens; [`ChatSession`] owns the
//! step, the transcript and the contact form, and applies the effects in
//! order, sleeping for the simulated typing delay before each delayed bot
//! reply. Because effects are awaited before the next input is taken, a
//! bot reply always lands directly after the user entry that caused it.
//!
//! The chat never reads or writes the cart.

pub mod quiz;
pub mod transcript;

pub use quiz::{ChatContactForm, ChatEffect, ChatInput, ChatStep, QuizAnswer, ReplyTiming};
pub use transcript::{Speaker, Transcript, TranscriptEntry};

use crate::checkout::FormField;
use crate::config::ChatConfig;
use crate::dispatch::{self, Destination, Dispatcher};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by quiz transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("'{option}' is not an option at {step}")]
    InvalidOption { step: ChatStep, option: String },

    #[error("There are no options to choose at {0}")]
    NoOptions(ChatStep),

    #[error("The contact form is not open at {0}")]
    FormNotOpen(ChatStep),

    #[error("Please fill in the {0} field")]
    MissingField(FormField),
}

/// Answers given during the quiz
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    pub concern: Option<&'static str>,
    pub frequency: Option<&'static str>,
}

/// Delays applied by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTiming {
    pub typing: Duration,
    pub close: Duration,
}

impl From<&ChatConfig> for ChatTiming {
    fn from(config: &ChatConfig) -> Self {
        Self {
            typing: Duration::from_millis(config.typing_delay_ms),
            close: Duration::from_millis(config.close_delay_ms),
        }
    }
}

type EntryListener = Box<dyn Fn(&TranscriptEntry) + Send + Sync>;

/// Live guided-chat session
pub struct ChatSession {
    step: ChatStep,
    transcript: Transcript,
    form: ChatContactForm,
    answers: QuizAnswers,
    open: bool,
    timing: ChatTiming,
    base_url: String,
    phone: String,
    dispatcher: Arc<dyn Dispatcher>,
    listener: Option<EntryListener>,
}

impl ChatSession {
    /// Create a session whose transcript starts with the welcome message
    pub fn new(
        config: &ChatConfig,
        base_url: impl Into<String>,
        phone: impl Into<String>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        let mut transcript = Transcript::with_capacity(config.transcript_capacity);
        transcript.push(Speaker::Bot, quiz::WELCOME);
        Self {
            step: ChatStep::Idle,
            transcript,
            form: ChatContactForm::default(),
            answers: QuizAnswers::default(),
            open: false,
            timing: ChatTiming::from(config),
            base_url: base_url.into(),
            phone: phone.into(),
            dispatcher,
            listener: None,
        }
    }

    /// Call `listener` for every entry appended from now on
    pub fn with_listener(
        mut self,
        listener: impl Fn(&TranscriptEntry) + Send + Sync + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn step(&self) -> ChatStep {
        self.step
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &ChatContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ChatContactForm {
        &mut self.form
    }

    /// Chat launcher pressed
    pub async fn start(&mut self) -> Result<(), ChatError> {
        let (next, effects) = quiz::transition(self.step, ChatInput::Start, self.destination())?;
        self.advance(next, effects).await;
        Ok(())
    }

    /// Option button pressed
    pub async fn choose(&mut self, option: &str) -> Result<(), ChatError> {
        let (next, effects) =
            quiz::transition(self.step, ChatInput::Choose(option), self.destination())?;
        self.advance(next, effects).await;
        Ok(())
    }

    /// Contact form submitted
    pub async fn submit_contact(&mut self) -> Result<(), ChatError> {
        let form = self.form.clone();
        let (next, effects) =
            quiz::transition(self.step, ChatInput::SubmitContact(&form), self.destination())?;
        self.advance(next, effects).await;
        Ok(())
    }

    fn destination(&self) -> Destination<'_> {
        Destination {
            base_url: &self.base_url,
            phone: &self.phone,
        }
    }

    async fn advance(&mut self, next: ChatStep, effects: Vec<ChatEffect>) {
        if next != self.step {
            tracing::debug!(from = %self.step, to = %next, "Chat step changed");
        }
        self.step = next;
        for effect in effects {
            self.apply(effect).await;
        }
    }

    async fn apply(&mut self, effect: ChatEffect) {
        match effect {
            ChatEffect::OpenPanel => self.open = true,
            ChatEffect::UserSays(text) => self.append(Speaker::User, text),
            ChatEffect::BotSays { text, timing } => {
                if timing == ReplyTiming::Typing {
                    tokio::time::sleep(self.timing.typing).await;
                }
                self.append(Speaker::Bot, text);
            }
            ChatEffect::Record(answer) => match answer {
                QuizAnswer::Concern(c) => self.answers.concern = Some(c),
                QuizAnswer::Frequency(f) => self.answers.frequency = Some(f),
            },
            ChatEffect::Dispatch(link) => {
                tracing::info!(
                    concern = self.answers.concern.unwrap_or("-"),
                    frequency = self.answers.frequency.unwrap_or("-"),
                    "Sending chat inquiry"
                );
                dispatch::send(self.dispatcher.as_ref(), &link, 0, 0);
            }
            ChatEffect::ClosePanel => {
                tokio::time::sleep(self.timing.close).await;
                self.open = false;
            }
        }
    }

    fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.transcript.push(speaker, text);
        if let (Some(listener), Some(entry)) = (&self.listener, self.transcript.last()) {
            listener(entry);
        }
    }
}
