//! Stateless view components shared by the widget pages.

use upcart::{format_distance_miles, format_usd, ProductCandidate};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

fn distance_label(candidate: &ProductCandidate) -> String {
    match candidate.distance_meters {
        Some(meters) => format!("{} miles", format_distance_miles(meters)),
        None => "Distance unavailable".to_string(),
    }
}

/// Summary banner for the product matched by the current search.
#[derive(Properties, PartialEq)]
pub struct ProductBannerProps {
    pub candidate: ProductCandidate,
}

#[function_component(ProductBanner)]
pub fn product_banner(props: &ProductBannerProps) -> Html {
    let candidate = &props.candidate;
    html! {
        <div class="product-banner">
            <h2>{ candidate.product_name.as_deref().unwrap_or("Product Name Not Available") }</h2>
            <div class="product-banner-meta">
                <span>{ format!("Category: {}", candidate.category.as_deref().unwrap_or("N/A")) }</span>
                <span>{ format!("Brand: {}", candidate.vendor.as_deref().unwrap_or("N/A")) }</span>
            </div>
        </div>
    }
}

/// Ranked store offers with a checkout action per row.
#[derive(Properties, PartialEq)]
pub struct CandidateTableProps {
    pub results: Vec<ProductCandidate>,
    pub on_select: Callback<ProductCandidate>,
}

#[function_component(CandidateTable)]
pub fn candidate_table(props: &CandidateTableProps) -> Html {
    html! {
        <table class="store-table">
            <thead>
                <tr>
                    <th>{ "Store Name" }</th>
                    <th>{ "Distance" }</th>
                    <th>{ "Actions" }</th>
                </tr>
            </thead>
            <tbody>
                { props.results.iter().map(|candidate| {
                    let on_select = props.on_select.clone();
                    let chosen = candidate.clone();
                    let onclick = Callback::from(move |_: MouseEvent| on_select.emit(chosen.clone()));
                    html! {
                        <tr key={candidate.id.clone()}>
                            <td>
                                <div class="store-cell">
                                    <span class="store-name">{ candidate.store_name.as_deref().unwrap_or("N/A") }</span>
                                    <span class="store-id">{ &candidate.id }</span>
                                </div>
                            </td>
                            <td>{ distance_label(candidate) }</td>
                            <td>
                                <button class="btn-checkout" {onclick}>{ "Checkout" }</button>
                            </td>
                        </tr>
                    }
                }).collect::<Html>() }
            </tbody>
        </table>
    }
}

/// Cart panel shown beside the checkout form: one line item, a quantity
/// selector bounded by the on-hand stock, and the running total.
#[derive(Properties, PartialEq)]
pub struct CartSummaryProps {
    pub product: ProductCandidate,
    pub quantity: u32,
    pub on_quantity_change: Callback<u32>,
}

#[function_component(CartSummary)]
pub fn cart_summary(props: &CartSummaryProps) -> Html {
    let max_quantity = props.product.max_quantity();
    let onchange = {
        let on_quantity_change = props.on_quantity_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(value) = select.value().parse::<u32>() {
                on_quantity_change.emit(value);
            }
        })
    };
    let total = props.product.price() * f64::from(props.quantity);

    html! {
        <div class="cart-summary">
            <div class="cart-header">
                <h2>{ "Your cart" }</h2>
                <span class="cart-count">{ 1 }</span>
            </div>
            <div class="cart-line">
                <div>
                    <h3>{ props.product.product_name.as_deref().unwrap_or("N/A") }</h3>
                    <p class="cart-store">
                        { format!("Store: {}", props.product.store_name.as_deref().unwrap_or("N/A")) }
                    </p>
                    <label for="quantity">{ "Quantity" }</label>
                    <select id="quantity" {onchange}>
                        { (1..=max_quantity).map(|n| {
                            html! {
                                <option value={n.to_string()} selected={n == props.quantity}>
                                    { n }
                                </option>
                            }
                        }).collect::<Html>() }
                    </select>
                </div>
                <span class="cart-price">{ format_usd(props.product.price()) }</span>
            </div>
            <div class="cart-total">
                <span>{ "Total (USD)" }</span>
                <span>{ format_usd(total) }</span>
            </div>
        </div>
    }
}
