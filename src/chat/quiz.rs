//! Guided-chat quiz sequencer
//!
//! | Step | Waiting for | Next |
//! |------|-------------|------|
//! | 0 Idle | start | 1 |
//! | 1 Intro | "Let's go!" | 2 |
//! | 2 Concern | one of four concerns | 3 |
//! | 3 Frequency | one of three frequencies | 4 |
//! | 4 OrderPrompt | "Yes, please" / "Just browsing" | 5 / 0 |
//! | 5 ContactForm | name, phone, address | dispatch |

use super::ChatError;
use crate::checkout::FormField;
use crate::dispatch::{Destination, DispatchLink, MessageKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const WELCOME: &str = "Namaste! Welcome to Suchi's Eco Pure. 🌿";
pub const QUIZ_INTRO: &str =
    "I can help you find the perfect hair care routine. Ready for a quick 3-question quiz?";
pub const ASK_CONCERN: &str = "Got it. What's your main hair concern?";
pub const ASK_FREQUENCY: &str = "Understood. And how often do you oil your hair?";
pub const ASK_ORDER: &str =
    "Thanks! Our Infused Organic Hair Oil is perfect for that. Would you like to place an order now?";
pub const ASK_DETAILS: &str =
    "Great! Please fill in your details below so I can prepare your order.";
pub const BROWSING: &str = "No problem! Feel free to browse our website. 🌿";
pub const HANDOFF: &str = "Thank you! Opening WhatsApp to finalize your order...";

pub const START_OPTION: &str = "Let's go!";
pub const CONCERN_OPTIONS: &[&str] = &["Hair Fall", "Dryness/Frizz", "Grey Hair", "Dandruff"];
pub const FREQUENCY_OPTIONS: &[&str] = &["Daily", "Weekly", "Rarely"];
pub const ORDER_YES: &str = "Yes, please";
pub const ORDER_NO: &str = "Just browsing";

/// Quiz progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChatStep {
    #[default]
    Idle,
    Intro,
    Concern,
    Frequency,
    OrderPrompt,
    ContactForm,
}

impl ChatStep {
    /// Numeric progress marker, 0 through 5
    pub fn as_number(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Intro => 1,
            Self::Concern => 2,
            Self::Frequency => 3,
            Self::OrderPrompt => 4,
            Self::ContactForm => 5,
        }
    }

    /// Option buttons shown at this step
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Intro => &[START_OPTION],
            Self::Concern => CONCERN_OPTIONS,
            Self::Frequency => FREQUENCY_OPTIONS,
            Self::OrderPrompt => &[ORDER_YES, ORDER_NO],
            Self::Idle | Self::ContactForm => &[],
        }
    }

    /// Resolve typed input to one of this step's options
    ///
    /// Accepts the option text (case-insensitive) or its 1-based position.
    pub fn resolve_option(self, input: &str) -> Option<&'static str> {
        let options = self.options();
        let input = input.trim();
        if let Ok(n) = input.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| options.get(i)).copied();
        }
        options
            .iter()
            .find(|opt| opt.eq_ignore_ascii_case(input))
            .copied()
    }
}

impl fmt::Display for ChatStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.as_number())
    }
}

/// Contact details collected at the end of the quiz; all required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContactForm {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl ChatContactForm {
    /// Set a contact field; the chat form has no email, so `Email` is ignored
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Phone => self.phone = value,
            FormField::Address => self.address = value,
            FormField::Email => {}
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
            FormField::Email => "",
        }
    }

    pub fn missing_field(&self) -> Option<FormField> {
        [
            (FormField::Name, &self.name),
            (FormField::Phone, &self.phone),
            (FormField::Address, &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Render the lead-capture inquiry
pub fn render_inquiry_message(form: &ChatContactForm) -> String {
    format!(
        "*New Order Inquiry via Chatbot* 🤖\n\
         \n\
         *Customer:* {}\n\
         *Phone:* {}\n\
         *Address:* {}\n\
         \n\
         *Context:* They completed the hair quiz and are interested in buying.",
        form.name, form.phone, form.address
    )
}

/// When a bot reply should appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTiming {
    Immediate,
    /// After the simulated typing delay
    Typing,
}

/// A quiz answer worth remembering for the session profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAnswer {
    Concern(&'static str),
    Frequency(&'static str),
}

/// Input to the quiz
#[derive(Debug, Clone, Copy)]
pub enum ChatInput<'a> {
    /// Chat launcher pressed
    Start,
    /// Option button pressed
    Choose(&'a str),
    /// Contact form submitted
    SubmitContact(&'a ChatContactForm),
}

/// Side effect requested by a quiz transition, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    OpenPanel,
    UserSays(String),
    BotSays { text: &'static str, timing: ReplyTiming },
    Record(QuizAnswer),
    Dispatch(DispatchLink),
    /// Close the panel after the configured close delay
    ClosePanel,
}

fn bot_typing(text: &'static str) -> ChatEffect {
    ChatEffect::BotSays {
        text,
        timing: ReplyTiming::Typing,
    }
}

/// Compute the next quiz step for `input`
///
/// # Errors
///
/// - `ChatError::InvalidOption` when the choice is not offered at this step
/// - `ChatError::NoOptions` when choosing at a step without option buttons
/// - `ChatError::FormNotOpen` when submitting before step 5
/// - `ChatError::MissingField` when a contact field is blank
///
/// On error the caller keeps its step and its transcript unchanged.
pub fn transition(
    step: ChatStep,
    input: ChatInput<'_>,
    destination: Destination<'_>,
) -> Result<(ChatStep, Vec<ChatEffect>), ChatError> {
    match input {
        ChatInput::Start => match step {
            ChatStep::Idle => Ok((
                ChatStep::Intro,
                vec![
                    ChatEffect::OpenPanel,
                    ChatEffect::BotSays {
                        text: QUIZ_INTRO,
                        timing: ReplyTiming::Immediate,
                    },
                ],
            )),
            _ => Ok((step, vec![ChatEffect::OpenPanel])),
        },
        ChatInput::Choose(raw) => {
            if step.options().is_empty() {
                return Err(ChatError::NoOptions(step));
            }
            let option = step
                .resolve_option(raw)
                .ok_or_else(|| ChatError::InvalidOption {
                    step,
                    option: raw.to_string(),
                })?;
            let said = ChatEffect::UserSays(option.to_string());

            let (next, mut tail) = match step {
                ChatStep::Intro => (ChatStep::Concern, vec![bot_typing(ASK_CONCERN)]),
                ChatStep::Concern => (
                    ChatStep::Frequency,
                    vec![
                        ChatEffect::Record(QuizAnswer::Concern(option)),
                        bot_typing(ASK_FREQUENCY),
                    ],
                ),
                ChatStep::Frequency => (
                    ChatStep::OrderPrompt,
                    vec![
                        ChatEffect::Record(QuizAnswer::Frequency(option)),
                        bot_typing(ASK_ORDER),
                    ],
                ),
                ChatStep::OrderPrompt if option == ORDER_YES => {
                    (ChatStep::ContactForm, vec![bot_typing(ASK_DETAILS)])
                }
                ChatStep::OrderPrompt => (ChatStep::Idle, vec![bot_typing(BROWSING)]),
                ChatStep::Idle | ChatStep::ContactForm => {
                    return Err(ChatError::NoOptions(step));
                }
            };

            let mut effects = vec![said];
            effects.append(&mut tail);
            Ok((next, effects))
        }
        ChatInput::SubmitContact(form) => {
            if step != ChatStep::ContactForm {
                return Err(ChatError::FormNotOpen(step));
            }
            if let Some(field) = form.missing_field() {
                return Err(ChatError::MissingField(field));
            }
            let link = destination.link(MessageKind::Inquiry, render_inquiry_message(form));
            Ok((
                step,
                vec![
                    ChatEffect::Dispatch(link),
                    ChatEffect::BotSays {
                        text: HANDOFF,
                        timing: ReplyTiming::Immediate,
                    },
                    ChatEffect::ClosePanel,
                ],
            ))
        }
    }
}
