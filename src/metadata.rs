//! Head metadata
//!
//! Search and agent-facing metadata for the product page: two `<meta>` tags
//! and two JSON-LD blocks. The set depends on the selected variant because
//! the product offer carries its price.
//!
//! A [`HeadScope`] owns the nodes it installed into a shared [`Document`].
//! Replacing the descriptor swaps them under one lock, and dropping the
//! scope removes exactly those nodes, leaving anything else in the head
//! untouched.

use crate::catalog::{Product, Variant, IMAGES, PRODUCT};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};

pub const META_DESCRIPTION: &str = "Buy Suchi's Eco Pure Organic Hair Oil. 100% natural, homemade ayurvedic remedy for hair fall, premature greying, and dandruff. Freshly prepared with Amla, Onion, and Hibiscus.";

pub const META_KEYWORDS: &str = "Organic hair oil India, Ayurvedic hair oil for hair fall, Homemade hair growth oil, Stop hair fall naturally, Paraben free hair oil, Best oil for grey hair, Herbal hair oil Hyderabad";

const PRICE_VALID_UNTIL: &str = "2025-12-31";
const RATING_VALUE: &str = "4.8";
const REVIEW_COUNT: &str = "124";

/// One element in the document head
#[derive(Debug, Clone, PartialEq)]
pub enum HeadNode {
    Meta { name: &'static str, content: String },
    JsonLd(Value),
}

impl HeadNode {
    /// Render as a single HTML tag
    pub fn to_html(&self) -> String {
        match self {
            Self::Meta { name, content } => format!(
                "<meta name=\"{}\" content=\"{}\">",
                escape_attribute(name),
                escape_attribute(content)
            ),
            // `</` inside a script body would end the element early
            Self::JsonLd(value) => format!(
                "<script type=\"application/ld+json\">{}</script>",
                value.to_string().replace("</", "<\\/")
            ),
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// The full set of head nodes for one variant selection
#[derive(Debug, Clone, PartialEq)]
pub struct HeadDescriptor {
    pub nodes: Vec<HeadNode>,
}

impl HeadDescriptor {
    /// Build the descriptor for the product with `variant` selected
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::catalog::PRODUCT;
    /// use ecopure::metadata::HeadDescriptor;
    ///
    /// let variant = PRODUCT.variant("500 ml").unwrap();
    /// let head = HeadDescriptor::for_variant(variant, "https://shop.example/");
    /// assert_eq!(head.nodes.len(), 4);
    /// assert_eq!(head.product_schema().unwrap()["offers"]["price"], 750);
    /// ```
    pub fn for_variant(variant: &Variant, page_url: &str) -> Self {
        Self::for_product(&PRODUCT, variant, page_url)
    }

    pub fn for_product(product: &Product, variant: &Variant, page_url: &str) -> Self {
        let images: Vec<&str> = IMAGES.iter().map(|img| img.src).collect();

        let product_schema = json!({
            "@context": "https://schema.org/",
            "@type": "Product",
            "name": product.name,
            "image": images,
            "description": product.description,
            "brand": {
                "@type": "Brand",
                "name": product.brand,
            },
            "offers": {
                "@type": "Offer",
                "url": page_url,
                "priceCurrency": "INR",
                "price": variant.price,
                "priceValidUntil": PRICE_VALID_UNTIL,
                "availability": "https://schema.org/InStock",
                "itemCondition": "https://schema.org/NewCondition",
            },
            "aggregateRating": {
                "@type": "AggregateRating",
                "ratingValue": RATING_VALUE,
                "reviewCount": REVIEW_COUNT,
            },
        });

        let business_schema = json!({
            "@context": "https://schema.org",
            "@type": "HealthAndBeautyBusiness",
            "name": product.brand,
            "image": images.first().copied().unwrap_or_default(),
            "telephone": product.contact,
            "priceRange": product.price_range(),
            "address": {
                "@type": "PostalAddress",
                "addressLocality": "Hyderabad",
                "addressCountry": "IN",
            },
            "url": page_url,
        });

        Self {
            nodes: vec![
                HeadNode::Meta {
                    name: "description",
                    content: META_DESCRIPTION.to_string(),
                },
                HeadNode::Meta {
                    name: "keywords",
                    content: META_KEYWORDS.to_string(),
                },
                HeadNode::JsonLd(product_schema),
                HeadNode::JsonLd(business_schema),
            ],
        }
    }

    /// The Product JSON-LD block, if present
    pub fn product_schema(&self) -> Option<&Value> {
        self.schema_of_type("Product")
    }

    /// The business JSON-LD block, if present
    pub fn business_schema(&self) -> Option<&Value> {
        self.schema_of_type("HealthAndBeautyBusiness")
    }

    fn schema_of_type(&self, kind: &str) -> Option<&Value> {
        self.nodes.iter().find_map(|node| match node {
            HeadNode::JsonLd(value) if value["@type"] == kind => Some(value),
            _ => None,
        })
    }

    pub fn render_html(&self) -> String {
        render_nodes(self.nodes.iter())
    }
}

fn render_nodes<'a>(nodes: impl Iterator<Item = &'a HeadNode>) -> String {
    nodes.map(HeadNode::to_html).collect::<Vec<_>>().join("\n")
}

/// Handle for a node installed in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u64);

/// The page head: an ordered list of installed nodes
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<(NodeId, HeadNode)>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a new document for sharing with scopes
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn insert(&mut self, node: HeadNode) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push((id, node));
        id
    }

    /// Remove a node; returns false when it is not installed
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|(node_id, _)| *node_id != id);
        self.nodes.len() != before
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|(node_id, _)| *node_id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HeadNode> {
        self.nodes.iter().map(|(_, node)| node)
    }

    pub fn render_html(&self) -> String {
        render_nodes(self.nodes())
    }
}

fn lock(document: &Mutex<Document>) -> MutexGuard<'_, Document> {
    // A panic while holding the lock cannot leave the node list half-edited
    document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Nodes installed on behalf of the product view
///
/// Removal happens on drop, so every exit path of the owning view releases
/// its head nodes.
#[derive(Debug)]
pub struct HeadScope {
    document: Arc<Mutex<Document>>,
    installed: Vec<NodeId>,
}

impl HeadScope {
    /// Install `descriptor` into `document`
    pub fn mount(document: Arc<Mutex<Document>>, descriptor: &HeadDescriptor) -> Self {
        let installed = {
            let mut doc = lock(&document);
            descriptor
                .nodes
                .iter()
                .map(|node| doc.insert(node.clone()))
                .collect()
        };
        tracing::debug!(nodes = descriptor.nodes.len(), "Head metadata mounted");
        Self {
            document,
            installed,
        }
    }

    /// Swap the installed nodes for `descriptor` under a single lock
    pub fn replace(&mut self, descriptor: &HeadDescriptor) {
        let mut doc = lock(&self.document);
        for id in self.installed.drain(..) {
            doc.remove(id);
        }
        self.installed = descriptor
            .nodes
            .iter()
            .map(|node| doc.insert(node.clone()))
            .collect();
        tracing::debug!(nodes = self.installed.len(), "Head metadata replaced");
    }

    pub fn installed(&self) -> &[NodeId] {
        &self.installed
    }

    /// Render the whole document head as it currently stands
    pub fn render_html(&self) -> String {
        lock(&self.document).render_html()
    }
}

impl Drop for HeadScope {
    fn drop(&mut self) {
        let mut doc = lock(&self.document);
        for id in self.installed.drain(..) {
            doc.remove(id);
        }
    }
}
