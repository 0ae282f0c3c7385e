//! The four workflow pages: Search, Checkout, Review, Confirmation.
//!
//! Transitions are all-or-nothing. Review and Confirmation verify their
//! preconditions before rendering anything and bounce back to Search when
//! the session cannot support them.

use crate::components::{CandidateTable, CartSummary, ProductBanner};
use crate::config;
use crate::hooks::{use_validated_field, FieldValidator, ValidatedField};
use crate::utils;
use crate::{OrderStore, Route};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use upcart::search::SearchClient;
use upcart::{
    clamp_quantity, format_phone, format_usd, generate_order_id, rank_candidates,
    ConfirmationRecord, ContactForm, OrderAction, ProductCandidate, US_JURISDICTIONS,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

// ─── Search ──────────────────────────────────────────────────────────────────

/// Mirrors the active UPC search into the `upc` query parameter so a shared
/// or bookmarked link reproduces the same search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    upc: Option<String>,
}

#[function_component(SearchPage)]
pub fn search_page() -> Html {
    let store = use_context::<OrderStore>().expect("order store context is always provided");
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let location = use_location();

    let query_upc = location
        .as_ref()
        .and_then(|l| l.query::<SearchQuery>().ok())
        .and_then(|q| q.upc)
        .filter(|upc| !upc.is_empty());

    let initial_term = query_upc
        .clone()
        .unwrap_or_else(|| store.last_query.clone());
    let search_term = use_state(move || initial_term);
    let loading = use_state(|| false);
    // Request token: a response only lands if it is still the latest search.
    let generation = use_mut_ref(|| 0u32);

    let run_search = {
        let store = store.clone();
        let loading = loading.clone();
        let generation = generation.clone();
        Callback::from(move |upc: String| {
            let trimmed = upc.trim().to_string();
            if trimmed.is_empty() {
                store.dispatch(OrderAction::SetSearchContext {
                    query: String::new(),
                    results: Vec::new(),
                });
                return;
            }
            let token = {
                let mut current = generation.borrow_mut();
                *current += 1;
                *current
            };
            loading.set(true);

            let store = store.clone();
            let loading = loading.clone();
            let generation = generation.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let client = SearchClient::new(config::SEARCH_ENDPOINT, config::SEARCH_HITS_PER_PAGE);
                let outcome = client.search(&trimmed).await;
                if *generation.borrow() != token {
                    debug!("search: discarding superseded response for {trimmed:?}");
                    return;
                }
                let ranked = match outcome {
                    Ok(hits) => rank_candidates(hits),
                    Err(err) => {
                        warn!("search: {err}");
                        Vec::new()
                    }
                };
                store.dispatch(OrderAction::SetSearchContext {
                    query: trimmed,
                    results: ranked,
                });
                loading.set(false);
            });
        })
    };

    // Reproduce a shared ?upc= link, or mirror the restored session search
    // back into the URL when the session has a query but no results yet.
    {
        let run_search = run_search.clone();
        let search_term = search_term.clone();
        let navigator = navigator.clone();
        let stored_query = store.last_query.clone();
        let have_results = !store.last_results.is_empty();
        use_effect_with(query_upc, move |param| {
            if let Some(upc) = param.clone() {
                search_term.set(upc.clone());
                run_search.emit(upc);
            } else if !stored_query.is_empty() && !have_results {
                search_term.set(stored_query.clone());
                let _ = navigator.push_with_query(
                    &Route::Search,
                    &SearchQuery {
                        upc: Some(stored_query),
                    },
                );
            }
            || ()
        });
    }

    let oninput = {
        let search_term = search_term.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search_term.set(input.value());
        })
    };

    let onsubmit = {
        let search_term = search_term.clone();
        let navigator = navigator.clone();
        let run_search = run_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let trimmed = search_term.trim().to_string();
            if trimmed.is_empty() {
                return;
            }
            let _ = navigator.push_with_query(
                &Route::Search,
                &SearchQuery {
                    upc: Some(trimmed.clone()),
                },
            );
            run_search.emit(trimmed);
        })
    };

    let onclear = {
        let search_term = search_term.clone();
        let navigator = navigator.clone();
        let store = store.clone();
        Callback::from(move |_: MouseEvent| {
            search_term.set(String::new());
            navigator.push(&Route::Search);
            store.dispatch(OrderAction::SetSearchContext {
                query: String::new(),
                results: Vec::new(),
            });
        })
    };

    let on_select = {
        let navigator = navigator.clone();
        Callback::from(move |candidate: ProductCandidate| {
            let id = candidate.id.clone();
            navigator.push_with_state(&Route::Checkout { id }, candidate);
        })
    };

    let results = store.last_results.clone();
    let banner = results.first().cloned();
    let empty_label = if *loading {
        "Searching..."
    } else if !search_term.is_empty() {
        "No results found"
    } else {
        "Enter a UPC to search"
    };

    html! {
        <div class="search-page">
            <form class="search-form" {onsubmit}>
                <input
                    type="text"
                    value={(*search_term).clone()}
                    {oninput}
                    placeholder="Enter UPC..."
                />
                <button type="submit" disabled={*loading}>
                    { if *loading { "Searching..." } else { "Search" } }
                </button>
                if !search_term.is_empty() {
                    <button type="button" class="btn-clear" onclick={onclear} title="Clear search">
                        { "Clear" }
                    </button>
                }
            </form>
            if let Some(candidate) = banner {
                <ProductBanner {candidate} />
            }
            if results.is_empty() {
                <div class="empty-results">{ empty_label }</div>
            } else {
                <CandidateTable {results} {on_select} />
            }
        </div>
    }
}

// ─── Checkout ────────────────────────────────────────────────────────────────

#[derive(Properties, PartialEq)]
pub struct CheckoutProps {
    pub id: String,
}

/// Resolves the candidate being bought: the navigation payload wins on first
/// entry and is persisted to the session immediately; the session covers
/// re-entry (back from review). Neither available means there is nothing to
/// buy, so the visitor goes back to Search.
#[function_component(CheckoutPage)]
pub fn checkout_page(props: &CheckoutProps) -> Html {
    let store = use_context::<OrderStore>().expect("order store context is always provided");
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let location = use_location();

    let payload: Option<Rc<ProductCandidate>> =
        location.as_ref().and_then(|l| l.state::<ProductCandidate>());

    {
        let store = store.clone();
        use_effect_with(payload.clone(), move |payload| {
            if let Some(candidate) = payload {
                store.dispatch(OrderAction::SetProduct((**candidate).clone()));
            }
            || ()
        });
    }

    let product = payload
        .map(|candidate| (*candidate).clone())
        .or_else(|| store.selected_product.clone());

    {
        let navigator = navigator.clone();
        let missing = product.is_none();
        use_effect_with(missing, move |&missing| {
            if missing {
                navigator.push(&Route::Search);
            }
            || ()
        });
    }

    match product {
        Some(product) => {
            debug!("checkout: entering for candidate {}", props.id);
            html! { <CheckoutForm {product} /> }
        }
        None => Html::default(),
    }
}

fn labeled_input(
    id: &'static str,
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    field: &ValidatedField,
    oninput: Callback<InputEvent>,
) -> Html {
    html! {
        <div class="form-group">
            <label for={id}>{ label }</label>
            <input
                type={input_type}
                id={id}
                value={(*field.text).clone()}
                class={field.class()}
                {placeholder}
                {oninput}
            />
            if let Some(error) = &*field.error {
                <div class="input-error">{ error }</div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CheckoutFormProps {
    product: ProductCandidate,
}

#[function_component(CheckoutForm)]
fn checkout_form(props: &CheckoutFormProps) -> Html {
    let store = use_context::<OrderStore>().expect("order store context is always provided");
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let product = props.product.clone();
    let max_quantity = product.max_quantity();

    // The selector bounds quantity to the on-hand stock; a stale stored
    // value (a previous product with deeper stock) is clamped on entry.
    {
        let store = store.clone();
        let stored = store.quantity;
        use_effect_with((stored, max_quantity), move |&(stored, max)| {
            let clamped = clamp_quantity(stored, max);
            if clamped != stored {
                store.dispatch(OrderAction::SetQuantity(clamped));
            }
            || ()
        });
    }
    let quantity = clamp_quantity(store.quantity, max_quantity);

    let stored_contact = store.contact.clone();
    let first_name = use_validated_field(
        stored_contact
            .as_ref()
            .map(|c| c.first_name.clone())
            .unwrap_or_default(),
        Rc::new(|input: &str| utils::validate_required(input, "First name")) as FieldValidator,
    );
    let last_name = use_validated_field(
        stored_contact
            .as_ref()
            .map(|c| c.last_name.clone())
            .unwrap_or_default(),
        Rc::new(|input: &str| utils::validate_required(input, "Last name")) as FieldValidator,
    );
    let email = use_validated_field(
        stored_contact
            .as_ref()
            .map(|c| c.email.clone())
            .unwrap_or_default(),
        Rc::new(utils::validate_email) as FieldValidator,
    );
    let phone = use_validated_field(
        stored_contact
            .as_ref()
            .map(|c| c.phone.clone())
            .unwrap_or_default(),
        Rc::new(utils::validate_phone) as FieldValidator,
    );
    let state_choice = use_state(|| {
        stored_contact
            .as_ref()
            .map(|c| c.state.clone())
            .unwrap_or_default()
    });
    let state_error = use_state(|| None::<String>);

    // Phone reformats on every keystroke instead of echoing raw input.
    let phone_oninput = {
        let text = phone.text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(format_phone(&input.value()));
        })
    };

    let state_onchange = {
        let state_choice = state_choice.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            state_choice.set(select.value());
        })
    };

    let on_quantity_change = {
        let store = store.clone();
        Callback::from(move |value: u32| {
            store.dispatch(OrderAction::SetQuantity(clamp_quantity(value, max_quantity)));
        })
    };

    let onback = {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| navigator.push(&Route::Search))
    };

    let onsubmit = {
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let email = email.clone();
        let phone = phone.clone();
        let state_choice = state_choice.clone();
        let state_error = state_error.clone();
        let store = store.clone();
        let navigator = navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let first = first_name.commit();
            let last = last_name.commit();
            let email = email.commit();
            let phone = phone.commit();
            let state = match utils::validate_jurisdiction(&state_choice) {
                Ok(value) => {
                    state_error.set(None);
                    Some(value)
                }
                Err(message) => {
                    state_error.set(Some(message));
                    None
                }
            };
            // Every field must pass or the transition does not happen.
            let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(state)) =
                (first, last, email, phone, state)
            else {
                return;
            };
            store.dispatch(OrderAction::SetContact(ContactForm {
                first_name,
                last_name,
                email,
                phone,
                state,
            }));
            navigator.push(&Route::Review);
        })
    };

    html! {
        <div class="checkout-page">
            <button class="btn-back" onclick={onback}>{ "Back to Search" }</button>
            <div class="checkout-layout">
                <div class="customer-form">
                    <h1>{ "Customer Information" }</h1>
                    <form {onsubmit}>
                        <div class="form-row">
                            { labeled_input(
                                "firstName",
                                "First name",
                                "text",
                                "Enter your first name",
                                &first_name,
                                first_name.oninput.clone(),
                            ) }
                            { labeled_input(
                                "lastName",
                                "Last name",
                                "text",
                                "Enter your last name",
                                &last_name,
                                last_name.oninput.clone(),
                            ) }
                        </div>
                        { labeled_input(
                            "email",
                            "Email",
                            "email",
                            "Enter your email address",
                            &email,
                            email.oninput.clone(),
                        ) }
                        { labeled_input(
                            "phone",
                            "Cell Phone",
                            "tel",
                            "XXX-XXX-XXXX",
                            &phone,
                            phone_oninput,
                        ) }
                        <p class="field-hint">{ "Format: XXX-XXX-XXXX" }</p>
                        <div class="form-group">
                            <label for="state">{ "Select the state on your license" }</label>
                            <select
                                id="state"
                                class={if state_error.is_some() { "invalid" } else { "" }}
                                onchange={state_onchange}
                            >
                                <option value="" selected={state_choice.is_empty()}>
                                    { "Choose..." }
                                </option>
                                { US_JURISDICTIONS.iter().map(|name| {
                                    html! {
                                        <option
                                            value={*name}
                                            selected={*name == state_choice.as_str()}
                                        >
                                            { *name }
                                        </option>
                                    }
                                }).collect::<Html>() }
                            </select>
                            if let Some(error) = &*state_error {
                                <div class="input-error">{ error }</div>
                            }
                        </div>
                        <button type="submit" class="btn-primary">{ "Review Order" }</button>
                    </form>
                </div>
                <CartSummary product={product.clone()} {quantity} {on_quantity_change} />
            </div>
        </div>
    }
}

// ─── Review ──────────────────────────────────────────────────────────────────

/// Review is reachable only through in-page navigation, so a direct link or
/// reload arrives without session data. The guard redirects rather than
/// rendering a partial order.
#[function_component(ReviewPage)]
pub fn review_page() -> Html {
    let store = use_context::<OrderStore>().expect("order store context is always provided");
    let navigator = use_navigator().expect("pages are rendered inside the router");

    let ready = store.review_ready();
    {
        let navigator = navigator.clone();
        use_effect_with(ready, move |&ready| {
            if !ready {
                navigator.push(&Route::Search);
            }
            || ()
        });
    }

    match (store.selected_product.clone(), store.contact.clone()) {
        (Some(product), Some(contact)) => html! {
            <ReviewDetails {product} {contact} quantity={store.quantity} />
        },
        _ => Html::default(),
    }
}

#[derive(Properties, PartialEq)]
struct ReviewDetailsProps {
    product: ProductCandidate,
    contact: ContactForm,
    quantity: u32,
}

#[function_component(ReviewDetails)]
fn review_details(props: &ReviewDetailsProps) -> Html {
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let total = props.product.price() * f64::from(props.quantity);

    let onback = {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| navigator.back())
    };

    // Confirming hands the record to the confirmation page directly; the
    // session is reset there, not here.
    let onconfirm = {
        let navigator = navigator.clone();
        let product = props.product.clone();
        let contact = props.contact.clone();
        let quantity = props.quantity;
        Callback::from(move |_: MouseEvent| {
            let record = ConfirmationRecord {
                product: product.clone(),
                quantity,
                contact: contact.clone(),
                order_id: generate_order_id(),
            };
            navigator.push_with_state(&Route::Confirmation, record);
        })
    };

    html! {
        <div class="review-page">
            <button class="btn-back" onclick={onback}>{ "Back to Checkout" }</button>
            <div class="review-card">
                <h1>{ "Review Your Order" }</h1>
                <section class="review-section">
                    <h2>{ "Product Details" }</h2>
                    <h3>{ props.product.product_name.as_deref().unwrap_or("N/A") }</h3>
                    <dl class="detail-grid">
                        <dt>{ "Store" }</dt>
                        <dd>{ props.product.store_name.as_deref().unwrap_or("N/A") }</dd>
                        <dt>{ "Quantity" }</dt>
                        <dd>{ props.quantity }</dd>
                        <dt>{ "Price" }</dt>
                        <dd>{ format!("{} each", format_usd(props.product.price())) }</dd>
                    </dl>
                    <div class="subtotal-line">
                        <span>{ "Subtotal" }</span>
                        <span>{ format_usd(total) }</span>
                    </div>
                </section>
                <section class="review-section">
                    <h2>{ "Customer Details" }</h2>
                    <p>{ format!("{} {}", props.contact.first_name, props.contact.last_name) }</p>
                    <p>{
                        if props.contact.email.is_empty() {
                            "No email provided".to_string()
                        } else {
                            props.contact.email.clone()
                        }
                    }</p>
                    <p>{ &props.contact.phone }</p>
                    <p>{ &props.contact.state }</p>
                </section>
                <section class="review-section">
                    <h2>{ "Order Summary" }</h2>
                    <div class="summary-line">
                        <span>{ "Subtotal" }</span>
                        <span>{ format_usd(total) }</span>
                    </div>
                    <div class="summary-line">
                        <span>{ "Shipping" }</span>
                        <span>{ "Free" }</span>
                    </div>
                    <div class="summary-line summary-total">
                        <span>{ "Total (USD)" }</span>
                        <span>{ format_usd(total) }</span>
                    </div>
                </section>
                <button class="btn-primary" onclick={onconfirm}>{ "Confirm Order" }</button>
            </div>
        </div>
    }
}

// ─── Confirmation ────────────────────────────────────────────────────────────

/// Terminal page of the cycle. The record arrives once via navigation state;
/// a reload loses it and the visitor starts over at Search.
#[function_component(ConfirmationPage)]
pub fn confirmation_page() -> Html {
    let store = use_context::<OrderStore>().expect("order store context is always provided");
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let location = use_location();

    let record: Option<Rc<ConfirmationRecord>> =
        location.as_ref().and_then(|l| l.state::<ConfirmationRecord>());

    // The session resets exactly once when the confirmation lands; the
    // search context survives so the visitor can shop again immediately.
    {
        let store = store.clone();
        let navigator = navigator.clone();
        let have_record = record.is_some();
        use_effect_with(have_record, move |&have_record| {
            if have_record {
                store.dispatch(OrderAction::ResetOrder);
            } else {
                navigator.push(&Route::Search);
            }
            || ()
        });
    }

    match record {
        Some(record) => html! { <ConfirmationDetails record={(*record).clone()} /> },
        None => Html::default(),
    }
}

#[derive(Properties, PartialEq)]
struct ConfirmationDetailsProps {
    record: ConfirmationRecord,
}

#[function_component(ConfirmationDetails)]
fn confirmation_details(props: &ConfirmationDetailsProps) -> Html {
    let navigator = use_navigator().expect("pages are rendered inside the router");
    let record = &props.record;

    let oncontinue = {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| navigator.push(&Route::Search))
    };

    html! {
        <div class="confirmation-page">
            <h1>{ format!("Order Confirmation #{}", record.order_id) }</h1>
            <p class="confirmation-note">
                { "Your order is processing. You will be notified when the items are ready for pickup." }
            </p>
            <section class="confirmation-section">
                <h2>{ "Order Details" }</h2>
                <p>{ format!("Product: {}", record.product.product_name.as_deref().unwrap_or("N/A")) }</p>
                <p>{ format!("Quantity: {}", record.quantity) }</p>
                <p>{ format!("Price: {} each", format_usd(record.product.price())) }</p>
                <p>{ format!("Total: {}", format_usd(record.total())) }</p>
            </section>
            <section class="confirmation-section">
                <h2>{ "Customer Details" }</h2>
                <p>{ format!("Name: {} {}", record.contact.first_name, record.contact.last_name) }</p>
                if !record.contact.email.is_empty() {
                    <p>{ format!("Email: {}", record.contact.email) }</p>
                }
                <p>{ format!("Phone: {}", record.contact.phone) }</p>
                <p>{ format!("State: {}", record.contact.state) }</p>
            </section>
            <section class="confirmation-section">
                <p>{ format!("Pickup at: {}", record.product.store_name.as_deref().unwrap_or("N/A")) }</p>
            </section>
            <button class="btn-primary" onclick={oncontinue}>{ "Continue Shopping" }</button>
        </div>
    }
}
