//! Product catalog and selection state
//!
//! The storefront sells exactly one product. Everything the page shows about
//! it (variants, gallery, benefits, testimonials, FAQs, business contact) is
//! compile-time data defined here. [`Selection`] is the only mutable state:
//! the chosen variant and the active gallery image.

use crate::error::{Result, StorefrontError};
use serde::Serialize;

/// A purchasable size/price combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Size label, e.g. "250 ml"
    pub size: &'static str,
    /// Price in whole rupees
    pub price: u32,
}

/// A product benefit shown in the benefits grid
#[derive(Debug, Clone, Serialize)]
pub struct Benefit {
    pub title: &'static str,
    pub desc: &'static str,
}

/// A gallery image reference
#[derive(Debug, Clone, Serialize)]
pub struct GalleryImage {
    pub id: u32,
    pub src: &'static str,
    pub alt: &'static str,
}

/// A customer testimonial
#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    pub text: &'static str,
    pub rating: u8,
}

/// A frequently asked question
#[derive(Debug, Clone, Serialize)]
pub struct Faq {
    #[serde(rename = "q")]
    pub question: &'static str,
    #[serde(rename = "a")]
    pub answer: &'static str,
}

/// Static description of the single product and its business
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub name: &'static str,
    pub brand: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub benefits: &'static [Benefit],
    pub variants: &'static [Variant],
    /// Business phone in international digits-only form
    pub contact: &'static str,
    /// Phone number as shown to customers
    pub display_contact: &'static str,
    pub map_link: &'static str,
}

pub const PRODUCT: Product = Product {
    name: "SUCHI’S ECO PURE Infused Organic Hair Oil",
    brand: "Suchi's Eco Pure",
    description: "Enriched with nature's finest ingredients, our organic hair oil is a blend of tradition and purity. Designed to combat hair fall, promote growth, and restore natural shine without harmful chemicals.",
    tags: &["100% Natural", "Paraben Free", "Cruelty Free", "No Mineral Oil"],
    ingredients: &[
        "Amla",
        "Onion",
        "Curry Leaves",
        "Almond",
        "Hibiscus",
        "Sesame",
        "Fenugreek",
    ],
    benefits: &[
        Benefit {
            title: "Premature Greying",
            desc: "Helps prevent premature greying with nutrient-rich herbs.",
        },
        Benefit {
            title: "Control Hair Fall",
            desc: "Strengthens roots to significantly reduce hair fall and dandruff.",
        },
        Benefit {
            title: "Boosts Growth",
            desc: "Promotes thicker, healthier hair growth naturally.",
        },
        Benefit {
            title: "Deep Nourishment",
            desc: "Penetrates deep into the scalp to nourish from within.",
        },
    ],
    variants: &[
        Variant {
            size: "100 ml",
            price: 250,
        },
        Variant {
            size: "250 ml",
            price: 450,
        },
        Variant {
            size: "500 ml",
            price: 750,
        },
    ],
    contact: "918317581308",
    display_contact: "8317581308",
    map_link: "https://maps.app.goo.gl/6i3aF37GjFSBubTRA?g_st=ac",
};

pub const IMAGES: &[GalleryImage] = &[
    GalleryImage {
        id: 1,
        src: "1000262838.jpg",
        alt: "Main Bottle View",
    },
    GalleryImage {
        id: 2,
        src: "1000262836.jpg",
        alt: "Ingredients Detail",
    },
    GalleryImage {
        id: 3,
        src: "1000262837.jpg",
        alt: "Texture View",
    },
];

pub const FALLBACK_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1528740561666-dc24705f08a7?auto=format&fit=crop&q=80&w=800",
    "https://images.unsplash.com/photo-1608248597279-f99d160bfbc8?auto=format&fit=crop&q=80&w=800",
    "https://images.unsplash.com/photo-1540555700478-4be289fbecef?auto=format&fit=crop&q=80&w=800",
];

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Priya S.",
        text: "I've tried so many oils, but this one is different. My hair feels so soft and the hair fall has actually stopped!",
        rating: 5,
    },
    Testimonial {
        name: "Rahul M.",
        text: "The smell is very earthy and natural. Loved the packaging and the results are visible in 3 weeks.",
        rating: 5,
    },
    Testimonial {
        name: "Ananya K.",
        text: "Authentic homemade feel. Highly recommend for anyone struggling with dry scalp.",
        rating: 4,
    },
];

pub const FAQS: &[Faq] = &[
    Faq {
        question: "Is this oil suitable for all hair types?",
        answer: "Yes, our organic blend is designed to be lightweight and nourishing for all hair textures, from straight to curly.",
    },
    Faq {
        question: "How often should I apply it?",
        answer: "For best results, apply 2-3 times a week. Massage into the scalp and leave it on for at least an hour before washing.",
    },
    Faq {
        question: "Is it safe for chemically treated hair?",
        answer: "Absolutely. Since it is 100% natural and paraben-free, it is safe and actually helps repair damage.",
    },
];

impl Product {
    /// Look up a variant by its size label (case-insensitive, whitespace-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::catalog::PRODUCT;
    ///
    /// assert_eq!(PRODUCT.variant("250ml").unwrap().price, 450);
    /// assert!(PRODUCT.variant("1 l").is_none());
    /// ```
    pub fn variant(&self, size: &str) -> Option<&'static Variant> {
        let wanted = normalize_size(size);
        let variants: &'static [Variant] = self.variants;
        variants
            .iter()
            .find(|v| normalize_size(v.size) == wanted)
    }

    /// The variant selected when the page first loads
    pub fn default_variant(&self) -> &'static Variant {
        let variants: &'static [Variant] = self.variants;
        &variants[1]
    }

    /// Price span across all variants, formatted for display
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::catalog::PRODUCT;
    ///
    /// assert_eq!(PRODUCT.price_range(), "₹250 - ₹750");
    /// ```
    pub fn price_range(&self) -> String {
        let min = self.variants.iter().map(|v| v.price).min().unwrap_or(0);
        let max = self.variants.iter().map(|v| v.price).max().unwrap_or(0);
        format!("₹{} - ₹{}", min, max)
    }

    /// Image reference copied into every cart line item
    pub fn cart_image(&self) -> &'static str {
        IMAGES[0].src
    }
}

fn normalize_size(size: &str) -> String {
    size.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Fallback for a gallery position, or the first fallback if none exists
pub fn fallback_for(index: usize) -> &'static str {
    FALLBACK_IMAGES
        .get(index)
        .copied()
        .unwrap_or(FALLBACK_IMAGES[0])
}

/// An image slot that swaps to its fallback once after a load failure
///
/// The original reference is never retried after the swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    primary: &'static str,
    fallback: &'static str,
    failed: bool,
}

impl ImageSource {
    /// Image slot for gallery position `index`
    pub fn gallery(index: usize) -> Option<Self> {
        IMAGES.get(index).map(|img| Self {
            primary: img.src,
            fallback: fallback_for(index),
            failed: false,
        })
    }

    /// Image slot for a cart line item, which always falls back to the first fallback
    pub fn cart_item(src: &'static str) -> Self {
        Self {
            primary: src,
            fallback: FALLBACK_IMAGES[0],
            failed: false,
        }
    }

    /// Record that the current reference failed to load
    pub fn mark_failed(&mut self) {
        if !self.failed {
            tracing::debug!(primary = self.primary, fallback = self.fallback, "Image failed, using fallback");
        }
        self.failed = true;
    }

    /// Reference that should be displayed now
    pub fn current(&self) -> &'static str {
        if self.failed {
            self.fallback
        } else {
            self.primary
        }
    }
}

/// The currently selected variant and gallery image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    variant: &'static Variant,
    active_image: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            variant: PRODUCT.default_variant(),
            active_image: 0,
        }
    }
}

impl Selection {
    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    pub fn active_image(&self) -> usize {
        self.active_image
    }

    /// Select a variant by size label
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UnknownVariant` and leaves the selection
    /// unchanged when the label matches no variant.
    pub fn select_variant(&mut self, size: &str) -> Result<&'static Variant> {
        let variant = PRODUCT
            .variant(size)
            .ok_or_else(|| StorefrontError::UnknownVariant(size.to_string()))?;
        self.variant = variant;
        Ok(variant)
    }

    /// Show the gallery image at `index`
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::ImageOutOfRange` when the index is past the gallery.
    pub fn select_image(&mut self, index: usize) -> Result<()> {
        if index >= IMAGES.len() {
            return Err(StorefrontError::ImageOutOfRange {
                index,
                len: IMAGES.len(),
            }
            .into());
        }
        self.active_image = index;
        Ok(())
    }

    pub fn next_image(&mut self) -> usize {
        self.active_image = (self.active_image + 1) % IMAGES.len();
        self.active_image
    }

    pub fn previous_image(&mut self) -> usize {
        self.active_image = (self.active_image + IMAGES.len() - 1) % IMAGES.len();
        self.active_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_250ml() {
        let selection = Selection::default();
        assert_eq!(selection.variant().size, "250 ml");
        assert_eq!(selection.variant().price, 450);
        assert_eq!(selection.active_image(), 0);
    }

    #[test]
    fn test_select_variant_by_label() {
        let mut selection = Selection::default();
        let v = selection.select_variant("500 ML").unwrap();
        assert_eq!(v.price, 750);
        assert_eq!(selection.variant().size, "500 ml");
    }

    #[test]
    fn test_select_unknown_variant_keeps_selection() {
        let mut selection = Selection::default();
        assert!(selection.select_variant("1 litre").is_err());
        assert_eq!(selection.variant().size, "250 ml");
    }

    #[test]
    fn test_select_image_out_of_range() {
        let mut selection = Selection::default();
        selection.select_image(2).unwrap();
        assert!(selection.select_image(3).is_err());
        assert_eq!(selection.active_image(), 2);
    }

    #[test]
    fn test_gallery_navigation_wraps() {
        let mut selection = Selection::default();
        assert_eq!(selection.previous_image(), IMAGES.len() - 1);
        assert_eq!(selection.next_image(), 0);
        assert_eq!(selection.next_image(), 1);
    }

    #[test]
    fn test_fallback_is_positional_then_first() {
        assert_eq!(fallback_for(1), FALLBACK_IMAGES[1]);
        assert_eq!(fallback_for(9), FALLBACK_IMAGES[0]);
    }

    #[test]
    fn test_image_source_swaps_once() {
        let mut img = ImageSource::gallery(2).unwrap();
        assert_eq!(img.current(), "1000262837.jpg");
        img.mark_failed();
        assert_eq!(img.current(), FALLBACK_IMAGES[2]);
        img.mark_failed();
        assert_eq!(img.current(), FALLBACK_IMAGES[2]);
    }

    #[test]
    fn test_cart_item_image_falls_back_to_first() {
        let mut img = ImageSource::cart_item(PRODUCT.cart_image());
        img.mark_failed();
        assert_eq!(img.current(), FALLBACK_IMAGES[0]);
    }

    #[test]
    fn test_price_range() {
        assert_eq!(PRODUCT.price_range(), "₹250 - ₹750");
    }
}
