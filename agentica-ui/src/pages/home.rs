//! Home Page

use leptos::*;
use leptos_router::*;

use agentica::Route;

use crate::state::GlobalState;

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let user = state.user;

    view! {
        <section class="container mx-auto px-4 py-24 text-center space-y-6">
            <h1 class="text-5xl font-extrabold text-gray-900">
                "Welcome to " <span class="text-blue-600">"Agentica"</span>
            </h1>
            <p class="text-lg text-gray-700 max-w-xl mx-auto">
                "Upload your documents, let Agentica index them, then ask questions about \
                 them in plain language."
            </p>

            <div class="flex justify-center gap-4">
                {move || {
                    if user.with(Option::is_some) {
                        view! {
                            <A
                                href=Route::Dashboard.path()
                                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-md font-medium"
                            >
                                "Go to Dashboard"
                            </A>
                        }
                        .into_view()
                    } else {
                        view! {
                            <A
                                href=Route::Register.path()
                                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-md font-medium"
                            >
                                "Sign Up"
                            </A>
                            <A
                                href=Route::Login.path()
                                class="px-6 py-3 border border-blue-600 hover:bg-blue-50 text-blue-600 rounded-md font-medium"
                            >
                                "Log In"
                            </A>
                        }
                        .into_view()
                    }
                }}
            </div>
        </section>
    }
}
