//! Storefront session
//!
//! One shopping session: the selected variant and gallery image, the cart,
//! the checkout modal and its form, and the head metadata for the product
//! view. Checkout decisions come from [`checkout::transition`]; this type
//! applies the resulting effects in order and owns the single shared state
//! they touch.

use crate::cart::{Cart, LineItemId};
use crate::catalog::{Selection, Variant, PRODUCT};
use crate::checkout::{
    self, autofill_location, CheckoutEffect, CheckoutForm, CheckoutInput, CheckoutState,
    FormField, LocationStatus,
};
use crate::config::Config;
use crate::dispatch::{self, Destination, Dispatcher, Receipt};
use crate::error::{Result, StorefrontError};
use crate::geolocation::{GeolocationError, GeolocationProvider};
use crate::metadata::{Document, HeadDescriptor, HeadScope};
use std::sync::{Arc, Mutex};

pub struct Storefront {
    selection: Selection,
    cart: Cart,
    cart_open: bool,
    checkout: CheckoutState,
    form: CheckoutForm,
    location: LocationStatus,
    head: HeadScope,
    page_url: String,
    base_url: String,
    dispatcher: Arc<dyn Dispatcher>,
    geolocation: Arc<dyn GeolocationProvider>,
}

impl Storefront {
    /// Open the product view and mount its head metadata into `document`
    pub fn new(
        config: &Config,
        document: Arc<Mutex<Document>>,
        dispatcher: Arc<dyn Dispatcher>,
        geolocation: Arc<dyn GeolocationProvider>,
    ) -> Self {
        let selection = Selection::default();
        let page_url = config.storefront.page_url.clone();
        let head = HeadScope::mount(
            document,
            &HeadDescriptor::for_variant(selection.variant(), &page_url),
        );

        Self {
            selection,
            cart: Cart::new(),
            cart_open: false,
            checkout: CheckoutState::default(),
            form: CheckoutForm::default(),
            location: LocationStatus::default(),
            head,
            page_url,
            base_url: config.dispatch.base_url.clone(),
            dispatcher,
            geolocation,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout
    }

    pub fn is_checkout_open(&self) -> bool {
        self.checkout == CheckoutState::Collecting
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn is_location_loading(&self) -> bool {
        self.location.is_loading()
    }

    /// Shared handle on the autofill flag, readable while `locate` runs
    pub fn location_status(&self) -> LocationStatus {
        self.location.clone()
    }

    pub fn head(&self) -> &HeadScope {
        &self.head
    }

    /// Select a variant and re-emit the head metadata for its price
    pub fn select_variant(&mut self, size: &str) -> Result<&'static Variant> {
        let previous = self.selection.variant();
        let variant = self.selection.select_variant(size)?;
        if variant != previous {
            self.head
                .replace(&HeadDescriptor::for_variant(variant, &self.page_url));
            tracing::debug!(size = variant.size, price = variant.price, "Variant selected");
        }
        Ok(variant)
    }

    pub fn select_image(&mut self, index: usize) -> Result<()> {
        self.selection.select_image(index)
    }

    pub fn next_image(&mut self) -> usize {
        self.selection.next_image()
    }

    pub fn previous_image(&mut self) -> usize {
        self.selection.previous_image()
    }

    /// Add the selected variant to the cart and show the cart
    pub fn add_to_cart(&mut self) -> LineItemId {
        let id = self.cart.add(self.selection.variant(), &PRODUCT);
        self.cart_open = true;
        id
    }

    pub fn remove_from_cart(&mut self, id: LineItemId) -> bool {
        self.cart.remove(id)
    }

    pub fn open_cart(&mut self) {
        self.cart_open = true;
    }

    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }

    /// "Proceed to Buy"
    pub fn open_checkout(&mut self) -> Result<()> {
        self.step(CheckoutInput::Open)?;
        Ok(())
    }

    /// Close the checkout modal, keeping what was typed
    pub fn dismiss_checkout(&mut self) -> Result<()> {
        self.step(CheckoutInput::Dismiss)?;
        Ok(())
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// "Use Current Location": append the device position to the address
    pub async fn locate(&mut self) -> std::result::Result<(), GeolocationError> {
        autofill_location(&mut self.form, &self.location, self.geolocation.as_ref()).await
    }

    /// Submit the order; returns the receipt of the dispatched message
    pub fn submit(&mut self) -> Result<Option<Receipt>> {
        let form = self.form.clone();
        let items = self.cart.items().to_vec();
        self.step(CheckoutInput::Submit {
            form: &form,
            items: &items,
        })
    }

    fn step(&mut self, input: CheckoutInput<'_>) -> Result<Option<Receipt>> {
        let destination = Destination {
            base_url: &self.base_url,
            phone: PRODUCT.contact,
        };
        let (next, effects) =
            checkout::transition(self.checkout, input, self.cart.len(), destination)
                .map_err(StorefrontError::from)?;
        if next != self.checkout {
            tracing::debug!(from = %self.checkout, to = %next, "Checkout state changed");
        }
        self.checkout = next;

        let mut receipt = None;
        for effect in effects {
            match effect {
                CheckoutEffect::CloseCart => self.cart_open = false,
                CheckoutEffect::Dispatch(link) => {
                    receipt = Some(dispatch::send(
                        self.dispatcher.as_ref(),
                        &link,
                        self.cart.len(),
                        self.cart.total(),
                    ));
                }
                CheckoutEffect::ClearCart => self.cart.clear(),
                CheckoutEffect::ResetForm => self.form.reset(),
            }
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutError;
    use crate::dispatch::{decoded_text, RecordingDispatcher};
    use crate::geolocation::{Coordinates, FixedLocation, Unsupported};

    fn storefront(
        dispatcher: Arc<RecordingDispatcher>,
        geolocation: Arc<dyn GeolocationProvider>,
    ) -> (Storefront, Arc<Mutex<Document>>) {
        let document = Document::shared();
        let shop = Storefront::new(&Config::default(), document.clone(), dispatcher, geolocation);
        (shop, document)
    }

    fn fill(shop: &mut Storefront) {
        shop.set_field(FormField::Name, "Asha");
        shop.set_field(FormField::Phone, "9876543210");
        shop.set_field(FormField::Address, "Jubilee Hills");
    }

    #[test]
    fn test_new_mounts_default_head() {
        let (shop, document) = storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        assert_eq!(shop.selection().variant().size, "250 ml");
        assert_eq!(document.lock().unwrap().len(), 4);
        assert!(shop.head().render_html().contains("\"price\":450"));
    }

    #[test]
    fn test_variant_change_reemits_head() {
        let (mut shop, document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        shop.select_variant("500 ml").unwrap();
        let html = document.lock().unwrap().render_html();
        assert!(html.contains("\"price\":750"));
        assert!(!html.contains("\"price\":450"));
        assert_eq!(document.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_variant_keeps_selection() {
        let (mut shop, _document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        let err = shop.select_variant("1 litre").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorefrontError>(),
            Some(StorefrontError::UnknownVariant(_))
        ));
        assert_eq!(shop.selection().variant().size, "250 ml");
    }

    #[test]
    fn test_drop_releases_head() {
        let (shop, document) = storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        drop(shop);
        assert!(document.lock().unwrap().is_empty());
    }

    #[test]
    fn test_add_to_cart_opens_cart() {
        let (mut shop, _document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        shop.select_variant("100 ml").unwrap();
        shop.add_to_cart();
        assert!(shop.is_cart_open());
        assert_eq!(shop.cart().total(), 250);
    }

    #[test]
    fn test_open_checkout_closes_cart() {
        let (mut shop, _document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        shop.add_to_cart();
        shop.open_checkout().unwrap();
        assert!(!shop.is_cart_open());
        assert!(shop.is_checkout_open());
    }

    #[test]
    fn test_open_checkout_with_empty_cart() {
        let (mut shop, _document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        let err = shop.open_checkout().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorefrontError>(),
            Some(StorefrontError::Checkout(CheckoutError::EmptyCart))
        ));
        assert_eq!(shop.checkout_state(), CheckoutState::Closed);
    }

    #[tokio::test]
    async fn test_submit_dispatches_clears_and_resets() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let (mut shop, _document) = storefront(dispatcher.clone(), Arc::new(Unsupported));
        shop.add_to_cart();
        shop.select_variant("500 ml").unwrap();
        shop.add_to_cart();
        shop.open_checkout().unwrap();
        fill(&mut shop);

        let receipt = shop.submit().unwrap().unwrap();

        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.total, 1200);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.form(), &CheckoutForm::default());
        assert_eq!(shop.checkout_state(), CheckoutState::Dispatched);

        let link = dispatcher.last().unwrap();
        let text = decoded_text(&link.url).unwrap();
        assert!(text.contains("*Total Amount: ₹1200*"));
        assert!(text.contains("Email: N/A"));
    }

    #[tokio::test]
    async fn test_submit_missing_field_keeps_everything() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let (mut shop, _document) = storefront(dispatcher.clone(), Arc::new(Unsupported));
        shop.add_to_cart();
        shop.open_checkout().unwrap();
        shop.set_field(FormField::Name, "Asha");

        assert!(shop.submit().is_err());
        assert_eq!(shop.cart().len(), 1);
        assert_eq!(shop.form().name, "Asha");
        assert!(shop.is_checkout_open());
        assert!(dispatcher.links().is_empty());
    }

    #[tokio::test]
    async fn test_locate_appends_to_address() {
        let provider = Arc::new(FixedLocation::new(Coordinates::new(17.385, 78.4867)));
        let (mut shop, _document) = storefront(Arc::new(RecordingDispatcher::new()), provider);
        shop.set_field(FormField::Address, "Road No. 36");
        shop.locate().await.unwrap();
        assert!(shop.form().address.starts_with("Road No. 36\n📍 My Location: "));
        assert!(!shop.is_location_loading());
    }

    #[tokio::test]
    async fn test_dismiss_keeps_form() {
        let (mut shop, _document) =
            storefront(Arc::new(RecordingDispatcher::new()), Arc::new(Unsupported));
        shop.add_to_cart();
        shop.open_checkout().unwrap();
        fill(&mut shop);
        shop.dismiss_checkout().unwrap();
        assert_eq!(shop.checkout_state(), CheckoutState::Closed);
        assert_eq!(shop.form().name, "Asha");
        assert_eq!(shop.cart().len(), 1);
    }
}
