//! Main module for the Upcart storefront widget using Yew.
//! Wires the page router, the shared order session, and the embed bridge.

use gloo_events::EventListener;
use gloo_utils::window;
use upcart::{embed, OrderSession};
use wasm_bindgen::JsCast;
use web_sys::MessageEvent;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod config;
mod hooks;
mod pages;
mod utils;

use pages::{CheckoutPage, ConfirmationPage, ReviewPage, SearchPage};

/// Reducer handle to the shared order session, provided to every page
/// through context.
pub type OrderStore = UseReducerHandle<OrderSession>;

/// The four-page order workflow, forward-only on the happy path.
#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Search,
    #[at("/checkout/:id")]
    Checkout { id: String },
    #[at("/review")]
    Review,
    #[at("/confirmation")]
    Confirmation,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Search => html! { <SearchPage /> },
        Route::Checkout { id } => html! { <CheckoutPage {id} /> },
        Route::Review => html! { <ReviewPage /> },
        Route::Confirmation => html! { <ConfirmationPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Search} /> },
    }
}

/// Scrolls the widget (and the hosting page) back to the top whenever the
/// route changes.
#[function_component(ScrollToTop)]
fn scroll_to_top() -> Html {
    let path = use_location()
        .map(|location| location.path().to_owned())
        .unwrap_or_default();
    use_effect_with(path, |path| {
        embed::scroll_to_top(path);
        || ()
    });
    Html::default()
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_reducer(OrderSession::default);

    // One bridge listener for the lifetime of the widget.
    use_effect_with((), |_| {
        let listener = EventListener::new(&window(), "message", |event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            let self_origin = window().location().origin().unwrap_or_default();
            embed::handle_inbound(event, config::ALLOWED_EMBED_ORIGINS, &self_origin);
        });
        move || drop(listener)
    });

    html! {
        <ContextProvider<OrderStore> context={session}>
            <BrowserRouter>
                <ScrollToTop />
                <main class="widget-shell">
                    <Switch<Route> render={switch} />
                </main>
            </BrowserRouter>
        </ContextProvider<OrderStore>>
    }
}

/// Entry point: panic hook, console logging, then the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize console logging");
    yew::Renderer::<App>::new().render();
}
