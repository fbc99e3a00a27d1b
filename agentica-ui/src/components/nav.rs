//! Navigation Component
//!
//! Header navigation bar. Links depend on whether a session is active.

use leptos::*;
use leptos_router::*;

use agentica::routes::{nav_items, NavItem};

use crate::state::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let user = state.user;
    let navigate = use_navigate();

    let on_logout = Callback::new(move |_: ()| {
        let next = state.logout();
        navigate(next.path(), Default::default());
    });

    view! {
        <nav class="bg-white shadow-md">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="text-2xl font-extrabold text-blue-600">
                        "Agentica"
                    </A>

                    <div class="flex items-center space-x-2">
                        {move || {
                            user.get().map(|u| view! {
                                <span class="px-3 text-gray-700 font-medium">{u.username}</span>
                            })
                        }}

                        {move || {
                            nav_items(user.with(Option::is_some))
                                .into_iter()
                                .map(|item| match item {
                                    NavItem::Link { route, label } => view! {
                                        <NavLink href=route.path() label=label />
                                    }
                                    .into_view(),
                                    NavItem::Logout => view! {
                                        <button
                                            class="px-3 py-2 rounded-md text-gray-700 hover:text-blue-600"
                                            on:click=move |_| on_logout.call(())
                                        >
                                            "Logout"
                                        </button>
                                    }
                                    .into_view(),
                                })
                                .collect_view()
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-3 py-2 rounded-md text-gray-700 hover:text-blue-600"
            active_class="text-blue-600 font-semibold"
        >
            {label}
        </A>
    }
}
