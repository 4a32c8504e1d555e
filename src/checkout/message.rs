//! Order message template

use super::form::CheckoutForm;
use crate::cart::LineItem;

/// Render the order message for `items` and `form`
///
/// # Examples
///
/// ```
/// use ecopure::cart::Cart;
/// use ecopure::catalog::PRODUCT;
/// use ecopure::checkout::{render_order_message, CheckoutForm};
///
/// let mut cart = Cart::new();
/// cart.add(&PRODUCT.variants[1], &PRODUCT);
/// let form = CheckoutForm {
///     name: "Asha".into(),
///     phone: "9876543210".into(),
///     email: String::new(),
///     address: "Hyderabad".into(),
/// };
///
/// let text = render_order_message(cart.items(), &form);
/// assert!(text.contains("Email: N/A"));
/// assert!(text.contains("*Total Amount: ₹450*"));
/// ```
pub fn render_order_message(items: &[LineItem], form: &CheckoutForm) -> String {
    let items_list = items
        .iter()
        .map(LineItem::summary_line)
        .collect::<Vec<_>>()
        .join("\n");
    let total: u64 = items.iter().map(|item| u64::from(item.price)).sum();

    format!(
        "*New Order Request* 🛒\n\
         \n\
         *Customer Details:*\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n\
         Address: {address}\n\
         \n\
         *Order Summary:*\n\
         {items_list}\n\
         \n\
         *Total Amount: ₹{total}*\n\
         \n\
         Please confirm my order.",
        name = form.name,
        phone = form.phone,
        email = form.email_or_na(),
        address = form.address,
        items_list = items_list,
        total = total,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::PRODUCT;

    #[test]
    fn test_order_message_layout() {
        let mut cart = Cart::new();
        cart.add(PRODUCT.variant("100 ml").unwrap(), &PRODUCT);
        cart.add(PRODUCT.variant("500 ml").unwrap(), &PRODUCT);
        let form = CheckoutForm {
            name: "Ravi".into(),
            phone: "9000000000".into(),
            email: "ravi@example.com".into(),
            address: "Line 1\nLine 2".into(),
        };

        let expected = "*New Order Request* 🛒\n\
\n\
*Customer Details:*\n\
Name: Ravi\n\
Phone: 9000000000\n\
Email: ravi@example.com\n\
Address: Line 1\nLine 2\n\
\n\
*Order Summary:*\n\
- SUCHI’S ECO PURE Infused Organic Hair Oil (100 ml): ₹250\n\
- SUCHI’S ECO PURE Infused Organic Hair Oil (500 ml): ₹750\n\
\n\
*Total Amount: ₹1000*\n\
\n\
Please confirm my order.";
        assert_eq!(render_order_message(cart.items(), &form), expected);
    }
}
