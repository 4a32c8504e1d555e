//! Checkout flow
//!
//! The checkout modal is a small state machine:
//!
//! - `Closed`: modal not shown
//! - `Collecting`: modal open, form fields editable
//! - `Dispatched`: order message handed off, cart and form cleared
//!
//! [`transition`] is pure: it returns the next state and the effects the
//! storefront session must apply, in order. Location autofill lives in
//! [`autofill_location`] because it is the flow's only asynchronous step.

pub mod form;
pub mod message;

pub use form::{CheckoutForm, FormField};
pub use message::render_order_message;

use crate::cart::LineItem;
use crate::dispatch::{Destination, DispatchLink, MessageKind};
use crate::geolocation::{append_location, GeolocationError, GeolocationProvider};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by checkout transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required form field is blank; no message was built
    #[error("Please fill in the {0} field")]
    MissingField(FormField),

    /// Checkout was opened or submitted without anything in the cart
    #[error("Your cart is empty.")]
    EmptyCart,

    /// Input that is only valid while the form is open
    #[error("Checkout form is not open")]
    NotCollecting,
}

/// State of the checkout modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Closed,
    Collecting,
    Dispatched,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Collecting => write!(f, "collecting"),
            Self::Dispatched => write!(f, "dispatched"),
        }
    }
}

/// Input to the checkout state machine
#[derive(Debug, Clone, Copy)]
pub enum CheckoutInput<'a> {
    /// "Proceed to Buy" from the cart view
    Open,
    /// Close the modal without submitting
    Dismiss,
    /// Submit the form against the current cart contents
    Submit {
        form: &'a CheckoutForm,
        items: &'a [LineItem],
    },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEffect {
    CloseCart,
    Dispatch(DispatchLink),
    ClearCart,
    ResetForm,
}

/// Compute the next checkout state for `input`
///
/// # Errors
///
/// - `CheckoutError::EmptyCart` when opening or submitting with no items
/// - `CheckoutError::NotCollecting` when submitting or dismissing a closed modal
/// - `CheckoutError::MissingField` when a required field is blank
///
/// On error the caller keeps its current state.
pub fn transition(
    state: CheckoutState,
    input: CheckoutInput<'_>,
    cart_len: usize,
    destination: Destination<'_>,
) -> Result<(CheckoutState, Vec<CheckoutEffect>), CheckoutError> {
    match (state, input) {
        (CheckoutState::Collecting, CheckoutInput::Open) => Ok((state, Vec::new())),
        (_, CheckoutInput::Open) => {
            if cart_len == 0 {
                return Err(CheckoutError::EmptyCart);
            }
            Ok((CheckoutState::Collecting, vec![CheckoutEffect::CloseCart]))
        }
        (CheckoutState::Collecting, CheckoutInput::Dismiss) => {
            Ok((CheckoutState::Closed, Vec::new()))
        }
        (CheckoutState::Collecting, CheckoutInput::Submit { form, items }) => {
            if items.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            if let Some(field) = form.missing_field() {
                return Err(CheckoutError::MissingField(field));
            }
            let text = render_order_message(items, form);
            let link = destination.link(MessageKind::Order, text);
            Ok((
                CheckoutState::Dispatched,
                vec![
                    CheckoutEffect::Dispatch(link),
                    CheckoutEffect::ClearCart,
                    CheckoutEffect::ResetForm,
                ],
            ))
        }
        (_, CheckoutInput::Dismiss) | (_, CheckoutInput::Submit { .. }) => {
            Err(CheckoutError::NotCollecting)
        }
    }
}

/// Autofill progress flag shown next to the "Use Current Location" button
///
/// Clones share the flag, so a handle taken before a lookup reads `true`
/// while that lookup is still awaiting the provider.
#[derive(Debug, Default, Clone)]
pub struct LocationStatus {
    loading: Arc<AtomicBool>,
}

impl LocationStatus {
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::SeqCst);
        LoadingGuard(&self.loading)
    }
}

/// Clears the loading flag when the lookup ends, including when the
/// lookup future is dropped mid-request
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Append the device location to `form.address`
///
/// The loading flag is raised for the duration of the single request and
/// cleared afterwards on every path. On failure the address is left exactly
/// as it was and the returned error carries the alert text.
pub async fn autofill_location(
    form: &mut CheckoutForm,
    status: &LocationStatus,
    provider: &dyn GeolocationProvider,
) -> Result<(), GeolocationError> {
    let result = {
        let _loading = status.begin();
        provider.current_position().await
    };

    let coords = result?;
    form.address = append_location(&form.address, coords);
    tracing::info!(
        latitude = coords.latitude,
        longitude = coords.longitude,
        "Address autofilled from location"
    );
    Ok(())
}
