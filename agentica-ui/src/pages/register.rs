//! Register Page

use leptos::*;
use leptos_router::*;

use agentica::form::FormState;
use agentica::model::RegisterRequest;
use agentica::Route;

use super::page_scope;
use crate::api::Api;
use crate::components::InlineLoading;
use crate::state::GlobalState;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let api = Api::new(state.clone());
    let scope = page_scope();

    let (username, set_username) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let form = create_rw_signal(FormState::Idle);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if !form.try_update(FormState::begin).unwrap_or(false) {
            return;
        }

        let request = RegisterRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let (api, state, ticket) = (api.clone(), state.clone(), scope.ticket());

        spawn_local(async move {
            let outcome = match api.register(&request).await {
                Ok(credentials) => state.login(&credentials),
                Err(e) => Err(e),
            };
            ticket.apply(|| form.update(|f| f.finish(&outcome)));
        });
    };

    view! {
        <div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow p-8">
            <h1 class="text-2xl font-bold mb-6">"Create an Account"</h1>

            {move || {
                form.with(|f| f.error().map(|e| e.to_string())).map(|message| view! {
                    <div class="mb-4 p-3 bg-red-100 text-red-700 rounded">{message}</div>
                })
            }}

            <form on:submit=on_submit class="space-y-4">
                <input
                    type="text"
                    placeholder="Username"
                    required
                    class="w-full border border-gray-300 rounded-md px-3 py-2"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <input
                    type="email"
                    placeholder="Email"
                    required
                    class="w-full border border-gray-300 rounded-md px-3 py-2"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    required
                    class="w-full border border-gray-300 rounded-md px-3 py-2"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="w-full py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-md disabled:opacity-50"
                    disabled=move || form.with(FormState::is_pending)
                >
                    {move || if form.with(FormState::is_pending) {
                        view! { <InlineLoading /> " Registering..." }.into_view()
                    } else {
                        "Register".into_view()
                    }}
                </button>
            </form>

            <p class="mt-4 text-sm text-gray-600">
                "Already have an account? "
                <A href=Route::Login.path() class="text-blue-600 hover:underline">"Log in"</A>
            </p>
        </div>
    }
}
