/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes four top-level command modules:

- `shop`     — Interactive storefront: gallery, cart and checkout
- `chat`     — Interactive guided chat quiz
- `catalog`  — Product, variants, testimonials and FAQ
- `metadata` — Head metadata for the product page

The handlers only drive the library components: the storefront session,
the chat session, the catalog and the metadata builder.
*/

use crate::catalog::{ImageSource, IMAGES, PRODUCT};
use crate::config::Config;
use crate::error::{Result, StorefrontError};
use colored::Colorize;
use std::path::Path;

// Special commands parser for the interactive sessions
pub mod special_commands;

/// Reference to display for gallery position `index`
///
/// A gallery file that cannot be found locally counts as a failed load and
/// is replaced by its positional fallback.
fn displayed_image(index: usize) -> Option<&'static str> {
    let mut source = ImageSource::gallery(index)?;
    if !Path::new(source.current()).exists() {
        source.mark_failed();
    }
    Some(source.current())
}

fn rupees(amount: impl std::fmt::Display) -> String {
    format!("₹{}", amount)
}

// Shop command handler
pub mod shop {
    //! Interactive storefront handler.
    //!
    //! Builds a [`Storefront`] session from configuration and runs a
    //! readline loop that maps each shop command onto a session operation.

    use super::*;
    use crate::cart::LineItemId;
    use crate::commands::special_commands::{parse_shop_command, print_shop_help, ShopCommand};
    use crate::dispatch::create_dispatcher;
    use crate::geolocation::create_provider;
    use crate::metadata::Document;
    use crate::storefront::Storefront;
    use prettytable::{cell, row, Table};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive shop
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed), with CLI overrides applied
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::commands::shop;
    /// use ecopure::config::Config;
    ///
    /// // In application code:
    /// // shop::run_shop(Config::default()).await?;
    /// ```
    pub async fn run_shop(config: Config) -> Result<()> {
        tracing::info!(
            dispatch = %config.dispatch.mode,
            "Starting interactive shop"
        );

        let dispatcher = create_dispatcher(config.dispatch.mode);
        let geolocation = create_provider(&config.geolocation);
        let document = Document::shared();
        let mut shop = Storefront::new(&config, document, dispatcher, geolocation);

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner();
        print_sizes(&shop);

        loop {
            let prompt = format_prompt(&shop);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_shop_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e);
                            continue;
                        }
                    };

                    if command == ShopCommand::Exit {
                        break;
                    }
                    if let Err(e) = handle_command(&mut shop, command).await {
                        eprintln!("{} {}\n", "Error:".red(), e);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Thank you for visiting {}!", PRODUCT.brand);
        Ok(())
    }

    /// Apply one parsed command to the session
    pub async fn handle_command(shop: &mut Storefront, command: ShopCommand) -> Result<()> {
        match command {
            ShopCommand::Sizes => print_sizes(shop),
            ShopCommand::SelectSize(size) => {
                let variant = shop.select_variant(&size)?;
                println!(
                    "Selected {} at {}\n",
                    variant.size.bold(),
                    rupees(variant.price).green()
                );
            }
            ShopCommand::Add => {
                let id = shop.add_to_cart();
                println!("Added to cart as item {}.", id);
                print_cart(shop);
            }
            ShopCommand::ShowCart => {
                shop.open_cart();
                print_cart(shop);
            }
            ShopCommand::CloseCart => shop.close_cart(),
            ShopCommand::Remove(id) => {
                if shop.remove_from_cart(LineItemId::from(id)) {
                    println!("Removed item {}.", id);
                } else {
                    println!("No item {} in your cart.", id);
                }
                print_cart(shop);
            }
            ShopCommand::Checkout => {
                shop.open_checkout()?;
                println!("\n{}", "Complete Your Order".bold());
                println!("Fill in your details with /set, then /submit.");
                print_form(shop);
            }
            ShopCommand::Set { field, value } => {
                shop.set_field(field, value);
            }
            ShopCommand::Locate => {
                println!("Fetching location...");
                match shop.locate().await {
                    Ok(()) => print_form(shop),
                    Err(e) => println!("{}\n", e.to_string().yellow()),
                }
            }
            ShopCommand::Submit => {
                if let Some(receipt) = shop.submit()? {
                    println!(
                        "{} Order reference {}.\n",
                        "Order sent to WhatsApp.".green(),
                        receipt.reference
                    );
                }
            }
            ShopCommand::Cancel => shop.dismiss_checkout()?,
            ShopCommand::Gallery => print_gallery(shop),
            ShopCommand::Image(index) => {
                shop.select_image(index)?;
                print_active_image(shop);
            }
            ShopCommand::Next => {
                shop.next_image();
                print_active_image(shop);
            }
            ShopCommand::Prev => {
                shop.previous_image();
                print_active_image(shop);
            }
            ShopCommand::Status => print_status(shop),
            ShopCommand::Help => print_shop_help(),
            ShopCommand::Exit | ShopCommand::None => {}
        }
        Ok(())
    }

    fn format_prompt(shop: &Storefront) -> String {
        let tag = if shop.is_checkout_open() {
            "[CHECKOUT]".yellow().to_string()
        } else {
            format!("[{}]", shop.selection().variant().size).green().to_string()
        };
        format!("{} cart:{} >> ", tag, shop.cart().len())
    }

    fn print_welcome_banner() {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Suchi's Eco Pure - Welcome!                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("{}", PRODUCT.name.bold());
        println!("{}\n", PRODUCT.description);
        println!("Ingredients: {}", PRODUCT.ingredients.join(", "));
        println!("{}\n", PRODUCT.tags.join(" · ").green());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_sizes(shop: &Storefront) {
        let selected = shop.selection().variant();
        let mut table = Table::new();
        table.add_row(row!["Size", "Price", ""]);
        for variant in PRODUCT.variants {
            let marker = if variant == selected { "selected" } else { "" };
            table.add_row(row![variant.size, rupees(variant.price), marker]);
        }
        println!();
        table.printstd();
        println!();
    }

    fn print_cart(shop: &Storefront) {
        let cart = shop.cart();
        println!("\n{}", "Your Cart".bold());
        if cart.is_empty() {
            println!("Your cart is empty.\n");
            return;
        }

        let image = ImageSource::cart_item(PRODUCT.cart_image());
        let mut table = Table::new();
        table.add_row(row!["Id", "Item", "Size", "Price"]);
        for item in cart.items() {
            table.add_row(row![item.id, item.name, item.size, rupees(item.price)]);
        }
        table.add_row(row!["", "Total", "", rupees(cart.total())]);
        table.printstd();
        println!("Image: {}", image.current());
        println!("Type /checkout to proceed to buy.\n");
    }

    fn print_form(shop: &Storefront) {
        let form = shop.form();
        let show = |value: &str| {
            if value.is_empty() {
                "-".dimmed().to_string()
            } else {
                value.to_string()
            }
        };
        println!("Full Name *        {}", show(&form.name));
        println!("Phone Number *     {}", show(&form.phone));
        println!("Email (Optional)   {}", show(&form.email));
        println!("Delivery Address * {}", show(&form.address));
        println!("Total: {}\n", rupees(shop.cart().total()).green());
    }

    fn print_gallery(shop: &Storefront) {
        let active = shop.selection().active_image();
        let mut table = Table::new();
        table.add_row(row!["#", "Image", "Source", ""]);
        for (index, image) in IMAGES.iter().enumerate() {
            let marker = if index == active { "showing" } else { "" };
            table.add_row(row![
                index + 1,
                image.alt,
                displayed_image(index).unwrap_or(image.src),
                marker
            ]);
        }
        table.printstd();
        println!();
    }

    fn print_active_image(shop: &Storefront) {
        let index = shop.selection().active_image();
        if let (Some(image), Some(src)) = (IMAGES.get(index), displayed_image(index)) {
            println!("[{}/{}] {} - {}\n", index + 1, IMAGES.len(), image.alt, src);
        }
    }

    fn print_status(shop: &Storefront) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Storefront Status                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        let variant = shop.selection().variant();
        println!("Selected Size:   {} ({})", variant.size, rupees(variant.price));
        println!(
            "Cart:            {} item(s), {} ({})",
            shop.cart().len(),
            rupees(shop.cart().total()),
            if shop.is_cart_open() { "open" } else { "closed" }
        );
        println!("Checkout:        {}", shop.checkout_state());
        println!(
            "Location:        {}",
            if shop.is_location_loading() {
                "fetching"
            } else {
                "idle"
            }
        );
        println!("Contact:         {}", PRODUCT.display_contact);
        println!();
    }
}

// Chat command handler
pub mod chat {
    //! Guided chat handler.
    //!
    //! Opens a [`ChatSession`], prints transcript entries as they are
    //! appended and lists the options for each step.

    use super::*;
    use crate::chat::{ChatSession, ChatStep, Speaker, TranscriptEntry};
    use crate::checkout::FormField;
    use crate::commands::special_commands::{parse_chat_command, print_chat_help, ChatCommand};
    use crate::dispatch::create_dispatcher;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the guided chat
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::commands::chat;
    /// use ecopure::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default()).await?;
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!(dispatch = %config.dispatch.mode, "Starting guided chat");

        let dispatcher = create_dispatcher(config.dispatch.mode);
        let mut session = ChatSession::new(
            &config.chat,
            config.dispatch.base_url.clone(),
            PRODUCT.contact,
            dispatcher,
        )
        .with_listener(print_entry);

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner();
        if let Some(welcome) = session.transcript().last() {
            print_entry(welcome);
        }

        session.start().await.map_err(StorefrontError::from)?;
        print_options(session.step());

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let command = match parse_chat_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e);
                            continue;
                        }
                    };

                    let outcome = match command {
                        ChatCommand::None => continue,
                        ChatCommand::Exit => break,
                        ChatCommand::Help => {
                            print_chat_help();
                            Ok(())
                        }
                        ChatCommand::Transcript => {
                            print_transcript(&session);
                            Ok(())
                        }
                        ChatCommand::Start => session.start().await,
                        ChatCommand::Choose(option) => session.choose(&option).await,
                        ChatCommand::Form => {
                            if session.step() == ChatStep::ContactForm
                                && !fill_form(&mut rl, &mut session)?
                            {
                                continue;
                            }
                            session.submit_contact().await
                        }
                    };

                    match outcome {
                        Ok(()) => {
                            if !session.is_open() {
                                println!("{}", "Chat closed.".dimmed());
                                break;
                            }
                            print_options(session.step());
                        }
                        Err(e) => eprintln!("{} {}\n", "Error:".red(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Prompt for each contact field; returns false if input ended early
    fn fill_form(rl: &mut DefaultEditor, session: &mut ChatSession) -> Result<bool> {
        let fields = [
            ("Your Name", FormField::Name),
            ("Phone Number", FormField::Phone),
            ("Delivery Address", FormField::Address),
        ];
        for (label, field) in fields {
            let current = session.form().get(field).to_string();
            let value = match rl.readline_with_initial(&format!("{}: ", label), (current.as_str(), "")) {
                Ok(value) => value.trim().to_string(),
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
                Err(e) => return Err(e.into()),
            };
            session.form_mut().set(field, value);
        }
        Ok(true)
    }

    fn print_entry(entry: &TranscriptEntry) {
        match entry.speaker {
            Speaker::Bot => println!("{} {}", "bot>".green().bold(), entry.text),
            Speaker::User => println!("{} {}", "you>".cyan(), entry.text),
        }
    }

    fn print_options(step: ChatStep) {
        if step == ChatStep::ContactForm {
            println!("Type /form to enter your details.\n");
            return;
        }
        if step == ChatStep::Idle {
            println!("Type /start to take the quiz again, or 'exit' to leave.\n");
            return;
        }
        for (i, option) in step.options().iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        println!();
    }

    fn print_transcript(session: &ChatSession) {
        println!();
        for entry in session.transcript().iter() {
            println!("{:>4}: {}", entry.speaker, entry.text);
        }
        println!();
    }

    fn print_welcome_banner() {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║            Suchi's Eco Pure Assistant - Online               ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Pick an option by number or by its text. Type '/help' for commands.\n");
    }
}

// Catalog command handler
pub mod catalog {
    //! Prints the product page content as tables or JSON.

    use super::*;
    use crate::catalog::{Faq, GalleryImage, Product, Testimonial, FAQS, TESTIMONIALS};
    use prettytable::{cell, row, Table};
    use serde::Serialize;

    #[derive(Serialize)]
    struct CatalogView<'a> {
        product: &'a Product,
        price_range: String,
        images: &'a [GalleryImage],
        testimonials: &'a [Testimonial],
        faqs: &'a [Faq],
    }

    /// Render the catalog as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Serialization` if serialization fails
    pub fn catalog_json() -> Result<String> {
        let view = CatalogView {
            product: &PRODUCT,
            price_range: PRODUCT.price_range(),
            images: IMAGES,
            testimonials: TESTIMONIALS,
            faqs: FAQS,
        };
        serde_json::to_string_pretty(&view)
            .map_err(|e| StorefrontError::Serialization(e).into())
    }

    /// Print the catalog
    pub fn show_catalog(json: bool) -> Result<()> {
        if json {
            println!("{}", catalog_json()?);
            return Ok(());
        }

        println!("\n{}", PRODUCT.name.bold());
        println!("{}\n", PRODUCT.description);
        println!("Price: {}", PRODUCT.price_range().green());
        println!("Ingredients: {}\n", PRODUCT.ingredients.join(", "));

        let mut variants = Table::new();
        variants.add_row(row!["Size", "Price"]);
        for variant in PRODUCT.variants {
            variants.add_row(row![variant.size, rupees(variant.price)]);
        }
        variants.printstd();

        println!("\n{}", "Why choose Suchi's Eco Pure?".bold());
        for benefit in PRODUCT.benefits {
            println!("  {} - {}", benefit.title.bold(), benefit.desc);
        }

        println!("\n{}", "Loved by our customers".bold());
        for testimonial in TESTIMONIALS {
            println!(
                "  {} \"{}\" - {}",
                "★".repeat(testimonial.rating as usize).yellow(),
                testimonial.text,
                testimonial.name
            );
        }

        println!("\n{}", "Frequently Asked Questions".bold());
        let mut faqs = Table::new();
        faqs.add_row(row!["Question", "Answer"]);
        for faq in FAQS {
            faqs.add_row(row![faq.question, faq.answer]);
        }
        faqs.printstd();

        println!(
            "\nOrder on WhatsApp: {}  |  Find us: {}\n",
            PRODUCT.display_contact, PRODUCT.map_link
        );
        Ok(())
    }
}

// Metadata command handler
pub mod metadata {
    //! Prints the head metadata for one variant.

    use super::*;
    use crate::metadata::{Document, HeadDescriptor, HeadScope};

    /// Render the page head for `size` (or the default variant)
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UnknownVariant` when `size` matches no variant
    pub fn render_head(config: &Config, size: Option<&str>) -> Result<String> {
        let variant = match size {
            Some(size) => PRODUCT
                .variant(size)
                .ok_or_else(|| StorefrontError::UnknownVariant(size.to_string()))?,
            None => PRODUCT.default_variant(),
        };
        let descriptor = HeadDescriptor::for_variant(variant, &config.storefront.page_url);
        let scope = HeadScope::mount(Document::shared(), &descriptor);
        Ok(scope.render_html())
    }

    pub fn show_metadata(config: &Config, size: Option<&str>) -> Result<()> {
        println!("{}", render_head(config, size)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::special_commands::ShopCommand;
    use crate::dispatch::{decoded_text, RecordingDispatcher};
    use crate::test_utils::{assert_error_contains, test_storefront};
    use std::sync::Arc;

    #[test]
    fn test_displayed_image_falls_back_when_missing() {
        let src = displayed_image(1).unwrap();
        assert_eq!(src, crate::catalog::fallback_for(1));
        assert!(displayed_image(IMAGES.len()).is_none());
    }

    #[test]
    fn test_catalog_json_lists_variants_and_faqs() {
        let json: serde_json::Value =
            serde_json::from_str(&catalog::catalog_json().unwrap()).unwrap();
        assert_eq!(json["product"]["variants"].as_array().unwrap().len(), 3);
        assert_eq!(json["price_range"], "₹250 - ₹750");
        assert!(json["faqs"][0]["q"].is_string());
    }

    #[test]
    fn test_render_head_for_size() {
        let html = metadata::render_head(&Config::default(), Some("100 ml")).unwrap();
        assert!(html.contains("\"price\":250"));
        assert!(html.contains("<meta name=\"keywords\""));
    }

    #[test]
    fn test_render_head_unknown_size() {
        assert!(metadata::render_head(&Config::default(), Some("2 l")).is_err());
    }

    #[tokio::test]
    async fn test_shop_commands_drive_checkout() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let mut shop = test_storefront(dispatcher.clone());

        let script = [
            ShopCommand::SelectSize("500 ml".to_string()),
            ShopCommand::Add,
            ShopCommand::Checkout,
            ShopCommand::Set {
                field: crate::checkout::FormField::Name,
                value: "Ravi".to_string(),
            },
            ShopCommand::Set {
                field: crate::checkout::FormField::Phone,
                value: "9000000001".to_string(),
            },
            ShopCommand::Set {
                field: crate::checkout::FormField::Address,
                value: "Madhapur".to_string(),
            },
            ShopCommand::Submit,
        ];
        for command in script {
            shop::handle_command(&mut shop, command).await.unwrap();
        }

        assert!(shop.cart().is_empty());
        let text = decoded_text(&dispatcher.last().unwrap().url).unwrap();
        assert!(text.contains("(500 ml): ₹750"));
    }

    #[tokio::test]
    async fn test_shop_locate_failure_is_not_an_error() {
        let mut shop = test_storefront(Arc::new(RecordingDispatcher::new()));
        shop::handle_command(&mut shop, ShopCommand::Locate)
            .await
            .unwrap();
        assert!(shop.form().address.is_empty());
    }

    #[tokio::test]
    async fn test_shop_submit_without_checkout_fails() {
        let mut shop = test_storefront(Arc::new(RecordingDispatcher::new()));
        assert_error_contains(
            shop::handle_command(&mut shop, ShopCommand::Submit).await,
            "not open",
        );
    }
}
