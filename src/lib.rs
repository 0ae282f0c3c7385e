use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

/// Presentation and bounds defaults shared by the widget pages.
pub mod defaults {
    /// Miles per meter, for rendering store distances.
    pub const MILES_PER_METER: f64 = 0.000_621_371;
    /// On-hand quantity assumed when the search service omits the field.
    pub const ON_HAND_FALLBACK: u32 = 1;
}

// Compiled once; a completed phone number is always DDD-DDD-DDDD.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").unwrap());

/// The 51 jurisdictions accepted by the checkout form: the fifty states plus
/// the District of Columbia.
pub const US_JURISDICTIONS: [&str; 51] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "District of Columbia",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

pub fn is_known_jurisdiction(name: &str) -> bool {
    US_JURISDICTIONS.contains(&name)
}

/// Geographic coordinates attached to a store offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One store's offer of a product, as returned by the search service.
///
/// Immutable once ranked; the order session owns the selected copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    /// Unique per store and product.
    pub id: String,
    pub vendor: Option<String>,
    pub product_name: Option<String>,
    pub unit_price: Option<f64>,
    pub upc: Option<String>,
    pub store_name: Option<String>,
    pub on_hand_quantity: Option<u32>,
    pub category: Option<String>,
    pub geo: Option<GeoPoint>,
    /// Meters from the requester; absent when the requester could not be
    /// geolocated.
    pub distance_meters: Option<f64>,
}

impl ProductCandidate {
    /// Upper bound for the quantity selector. An absent or zero on-hand
    /// count sells as exactly one unit.
    pub fn max_quantity(&self) -> u32 {
        self.on_hand_quantity
            .map_or(defaults::ON_HAND_FALLBACK, |q| q.max(1))
    }

    /// Unit price, with unpriced offers totalling zero.
    pub fn price(&self) -> f64 {
        self.unit_price.unwrap_or(0.0)
    }
}

/// Order raw hits nearest first. Candidates with no resolved distance sort
/// after every candidate with one; input order is preserved among unknowns
/// and exact ties.
pub fn rank_candidates(mut hits: Vec<ProductCandidate>) -> Vec<ProductCandidate> {
    hits.sort_by(|a, b| match (a.distance_meters, b.distance_meters) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    hits
}

/// Render a distance in miles with one decimal place.
pub fn format_distance_miles(meters: f64) -> String {
    format!("{:.1}", meters * defaults::MILES_PER_METER)
}

/// Render a currency amount as dollars and cents.
pub fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Progressively format a phone number as its digits accumulate:
/// `"123"` stays `"123"`, `"123456"` becomes `"123-456"`, ten or more
/// digits become `"123-456-7890"`. Non-digits are stripped, digits past
/// the tenth are dropped.
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        7..=9 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..10]),
    }
}

/// Whether a formatted phone number is complete (`DDD-DDD-DDDD`).
pub fn is_complete_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Clamp a requested quantity into `[1, max(1, on_hand)]`.
pub fn clamp_quantity(quantity: u32, max_quantity: u32) -> u32 {
    quantity.clamp(1, max_quantity.max(1))
}

/// Contact details captured by the checkout form. Email is the only
/// optional field; the rest must survive [`ContactForm::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Normalized to `DDD-DDD-DDDD`.
    pub phone: String,
    /// One of [`US_JURISDICTIONS`].
    pub state: String,
}

/// Why a contact form was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingField(&'static str),
    InvalidPhone,
    UnknownJurisdiction(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingField(field) => write!(f, "{} is required", field),
            FormError::InvalidPhone => {
                write!(f, "Phone number must match XXX-XXX-XXXX")
            }
            FormError::UnknownJurisdiction(name) => {
                write!(f, "Unrecognized state: {}", name)
            }
        }
    }
}

impl std::error::Error for FormError {}

impl ContactForm {
    /// All required fields present, phone complete, state recognized.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.first_name.trim().is_empty() {
            return Err(FormError::MissingField("First name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(FormError::MissingField("Last name"));
        }
        if !is_complete_phone(&self.phone) {
            return Err(FormError::InvalidPhone);
        }
        if !is_known_jurisdiction(&self.state) {
            return Err(FormError::UnknownJurisdiction(self.state.clone()));
        }
        Ok(())
    }
}

/// The single in-progress order shared by every page of the widget.
///
/// Pages receive a reducer handle to this session through context; no page
/// owns it, and multiple widget instances never collide.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSession {
    pub selected_product: Option<ProductCandidate>,
    pub quantity: u32,
    pub contact: Option<ContactForm>,
    pub last_query: String,
    pub last_results: Vec<ProductCandidate>,
}

impl Default for OrderSession {
    fn default() -> Self {
        Self {
            selected_product: None,
            quantity: 1,
            contact: None,
            last_query: String::new(),
            last_results: Vec::new(),
        }
    }
}

/// Mutations applied to the order session. Each dispatch is atomic: a
/// reader observes either the previous session or the fully updated one.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Replace the selection. Quantity and contact are untouched; the
    /// checkout page clamps quantity separately.
    SetProduct(ProductCandidate),
    /// The store trusts the caller here; bounds live at the UI edge.
    SetQuantity(u32),
    /// Wholesale replacement, never a partial-field merge.
    SetContact(ContactForm),
    /// Query and results always travel together so a reader never pairs a
    /// query with stale results.
    SetSearchContext {
        query: String,
        results: Vec<ProductCandidate>,
    },
    /// Clear the order but keep the search context for the next visit.
    ResetOrder,
    /// Full restart, search context included.
    ResetAll,
}

impl Reducible for OrderSession {
    type Action = OrderAction;

    fn reduce(self: Rc<Self>, action: OrderAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            OrderAction::SetProduct(candidate) => next.selected_product = Some(candidate),
            OrderAction::SetQuantity(quantity) => next.quantity = quantity,
            OrderAction::SetContact(contact) => next.contact = Some(contact),
            OrderAction::SetSearchContext { query, results } => {
                next.last_query = query;
                next.last_results = results;
            }
            OrderAction::ResetOrder => {
                next.selected_product = None;
                next.quantity = 1;
                next.contact = None;
            }
            OrderAction::ResetAll => next = OrderSession::default(),
        }
        Rc::new(next)
    }
}

impl OrderSession {
    /// Review and confirmation are only reachable with both a selection
    /// and validated contact details on hand.
    pub fn review_ready(&self) -> bool {
        self.selected_product.is_some() && self.contact.is_some()
    }

    /// Order total for the current selection and quantity.
    pub fn total(&self) -> f64 {
        self.selected_product
            .as_ref()
            .map_or(0.0, |product| product.price() * f64::from(self.quantity))
    }
}

/// Everything the confirmation page shows, handed over once at the
/// review-to-confirmation transition. Deliberately not kept in the
/// session: a reload loses it and the visitor starts over.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRecord {
    pub product: ProductCandidate,
    pub quantity: u32,
    pub contact: ContactForm,
    pub order_id: String,
}

impl ConfirmationRecord {
    pub fn total(&self) -> f64 {
        self.product.price() * f64::from(self.quantity)
    }
}

/// Six random decimal digits, generated when an order is confirmed.
pub fn generate_order_id() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000u32).to_string()
}

pub mod embed;
pub mod search;

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, distance_meters: Option<f64>) -> ProductCandidate {
        ProductCandidate {
            id: id.to_string(),
            vendor: None,
            product_name: None,
            unit_price: None,
            upc: None,
            store_name: None,
            on_hand_quantity: None,
            category: None,
            geo: None,
            distance_meters,
        }
    }

    fn contact() -> ContactForm {
        ContactForm {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: String::new(),
            phone: "123-456-7890".to_string(),
            state: "Texas".to_string(),
        }
    }

    #[test]
    fn ranking_sorts_known_distances_ascending() {
        let ranked = rank_candidates(vec![
            candidate("far", Some(2_000.0)),
            candidate("near", Some(500.0)),
            candidate("mid", Some(900.0)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["near", "mid", "far"]);
    }

    #[test]
    fn ranking_puts_unknown_distances_last_in_input_order() {
        let ranked = rank_candidates(vec![
            candidate("u1", None),
            candidate("near", Some(500.0)),
            candidate("u2", None),
            candidate("far", Some(1_500.0)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["near", "far", "u1", "u2"]);
    }

    #[test]
    fn ranking_is_stable_for_tied_distances() {
        let ranked = rank_candidates(vec![
            candidate("a", Some(700.0)),
            candidate("b", Some(700.0)),
            candidate("c", Some(700.0)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn ranking_empty_input_yields_empty_output() {
        assert!(rank_candidates(Vec::new()).is_empty());
    }

    #[test]
    fn distance_formats_as_miles_with_one_decimal() {
        assert_eq!(format_distance_miles(1_609.344), "1.0");
        assert_eq!(format_distance_miles(500.0), "0.3");
    }

    #[test]
    fn phone_formats_progressively() {
        assert_eq!(format_phone("1234567890"), "123-456-7890");
        assert_eq!(format_phone("123456"), "123-456");
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn phone_strips_noise_and_extra_digits() {
        assert_eq!(format_phone("(123) 456-7890"), "123-456-7890");
        assert_eq!(format_phone("123456789012"), "123-456-7890");
    }

    #[test]
    fn complete_phone_requires_full_shape() {
        assert!(is_complete_phone("123-456-7890"));
        assert!(!is_complete_phone("123-456"));
        assert!(!is_complete_phone("1234567890"));
    }

    #[test]
    fn quantity_clamps_into_stock_bounds() {
        assert_eq!(clamp_quantity(0, 5), 1);
        assert_eq!(clamp_quantity(3, 5), 3);
        assert_eq!(clamp_quantity(7, 5), 5);
        // Zero on-hand still sells as a single unit.
        assert_eq!(clamp_quantity(3, 0), 1);
    }

    #[test]
    fn max_quantity_defaults_absent_stock_to_one() {
        let mut c = candidate("x", None);
        assert_eq!(c.max_quantity(), 1);
        c.on_hand_quantity = Some(0);
        assert_eq!(c.max_quantity(), 1);
        c.on_hand_quantity = Some(4);
        assert_eq!(c.max_quantity(), 4);
    }

    #[test]
    fn jurisdiction_list_is_complete() {
        assert_eq!(US_JURISDICTIONS.len(), 51);
        assert!(is_known_jurisdiction("Texas"));
        assert!(is_known_jurisdiction("District of Columbia"));
        assert!(!is_known_jurisdiction("Ontario"));
        assert!(!is_known_jurisdiction(""));
    }

    #[test]
    fn contact_validation_accepts_empty_email() {
        assert_eq!(contact().validate(), Ok(()));
    }

    #[test]
    fn contact_validation_rejects_bad_fields() {
        let mut c = contact();
        c.first_name = "  ".to_string();
        assert_eq!(c.validate(), Err(FormError::MissingField("First name")));

        let mut c = contact();
        c.phone = "123-456".to_string();
        assert_eq!(c.validate(), Err(FormError::InvalidPhone));

        let mut c = contact();
        c.state = "Atlantis".to_string();
        assert_eq!(
            c.validate(),
            Err(FormError::UnknownJurisdiction("Atlantis".to_string()))
        );
    }

    #[test]
    fn set_product_leaves_quantity_and_contact_alone() {
        let session = Rc::new(OrderSession {
            quantity: 3,
            contact: Some(contact()),
            ..OrderSession::default()
        });
        let session = session.reduce(OrderAction::SetProduct(candidate("p1", None)));
        assert_eq!(session.quantity, 3);
        assert!(session.contact.is_some());
        assert_eq!(session.selected_product.as_ref().unwrap().id, "p1");
    }

    #[test]
    fn search_context_replaces_query_and_results_together() {
        let session = Rc::new(OrderSession::default());
        let session = session.reduce(OrderAction::SetSearchContext {
            query: "042100005264".to_string(),
            results: vec![candidate("a", Some(10.0))],
        });
        assert_eq!(session.last_query, "042100005264");
        assert_eq!(session.last_results.len(), 1);

        let session = session.reduce(OrderAction::SetSearchContext {
            query: String::new(),
            results: Vec::new(),
        });
        assert!(session.last_query.is_empty());
        assert!(session.last_results.is_empty());
    }

    #[test]
    fn reset_order_keeps_search_context_and_is_idempotent() {
        let session = Rc::new(OrderSession {
            selected_product: Some(candidate("p1", None)),
            quantity: 4,
            contact: Some(contact()),
            last_query: "012345678905".to_string(),
            last_results: vec![candidate("p1", Some(500.0))],
        });
        let once = session.reduce(OrderAction::ResetOrder);
        assert!(once.selected_product.is_none());
        assert!(once.contact.is_none());
        assert_eq!(once.quantity, 1);
        assert_eq!(once.last_query, "012345678905");
        assert_eq!(once.last_results.len(), 1);

        let twice = once.clone().reduce(OrderAction::ResetOrder);
        assert_eq!(*twice, *once);
    }

    #[test]
    fn reset_all_clears_the_search_context_too() {
        let session = Rc::new(OrderSession {
            selected_product: Some(candidate("p1", None)),
            last_query: "012345678905".to_string(),
            ..OrderSession::default()
        });
        let session = session.reduce(OrderAction::ResetAll);
        assert_eq!(*session, OrderSession::default());
    }

    #[test]
    fn quantity_invariant_holds_after_page_edge_clamp() {
        let product = ProductCandidate {
            on_hand_quantity: Some(3),
            ..candidate("p1", None)
        };
        let max = product.max_quantity();
        let session = Rc::new(OrderSession::default());
        let session = session.reduce(OrderAction::SetProduct(product));
        for requested in [0, 1, 3, 9] {
            let session = session
                .clone()
                .reduce(OrderAction::SetQuantity(clamp_quantity(requested, max)));
            assert!(session.quantity >= 1 && session.quantity <= max);
        }
    }

    #[test]
    fn order_ids_are_six_decimal_digits() {
        for _ in 0..100 {
            let id = generate_order_id();
            assert_eq!(id.len(), 6);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
            assert!(!id.starts_with('0'));
        }
    }

    /// Walks the full happy path at the session level: search, select,
    /// set quantity, submit contact, review, confirm, reset.
    #[test]
    fn full_order_cycle_preserves_the_search_context() {
        let near = ProductCandidate {
            unit_price: Some(12.50),
            on_hand_quantity: Some(3),
            ..candidate("store-a", Some(500.0))
        };
        let unplaced = candidate("store-b", None);

        let ranked = rank_candidates(vec![unplaced, near.clone()]);
        assert_eq!(ranked[0].id, "store-a");
        assert_eq!(ranked[1].id, "store-b");

        let session = Rc::new(OrderSession::default());
        let session = session.reduce(OrderAction::SetSearchContext {
            query: "012345678905".to_string(),
            results: ranked,
        });
        let session = session.reduce(OrderAction::SetProduct(near.clone()));
        let session = session.reduce(OrderAction::SetQuantity(clamp_quantity(
            2,
            near.max_quantity(),
        )));
        assert!(!session.review_ready());

        let session = session.reduce(OrderAction::SetContact(contact()));
        assert!(session.review_ready());
        assert_eq!(session.total(), 25.0);

        let record = ConfirmationRecord {
            product: session.selected_product.clone().unwrap(),
            quantity: session.quantity,
            contact: session.contact.clone().unwrap(),
            order_id: generate_order_id(),
        };
        assert_eq!(record.order_id.len(), 6);
        assert_eq!(record.total(), 25.0);

        let session = session.reduce(OrderAction::ResetOrder);
        assert!(session.selected_product.is_none());
        assert!(session.contact.is_none());
        assert_eq!(session.last_query, "012345678905");
        assert_eq!(session.last_results.len(), 2);
    }
}
