//! Chat Page
//!
//! Private chat over the user's own documents.

use leptos::*;

use agentica::chat::{ChatKind, ChatLog, HISTORY_ERROR};

use super::page_scope;
use crate::api::Api;
use crate::components::ChatWindow;
use crate::state::GlobalState;

#[component]
pub fn ChatPage() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let api = Api::new(state);
    let scope = page_scope();

    let log = create_rw_signal(ChatLog::new(ChatKind::Private));
    let history_error = create_rw_signal(None::<String>);

    // Load conversation history
    {
        let (api, ticket) = (api.clone(), scope.ticket());
        spawn_local(async move {
            match api.private_history().await {
                Ok(history) => {
                    ticket.apply(|| {
                        log.update(|l| l.load_history(&history));
                        history_error.set(None);
                    });
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Failed to load chat history: {}", e).into());
                    ticket.apply(|| history_error.set(Some(HISTORY_ERROR.to_string())));
                }
            }
        });
    }

    let on_send = Callback::new(move |input: String| {
        let Some(text) = log.try_update(|l| l.begin_send(&input)).flatten() else {
            return;
        };

        let (api, ticket) = (api.clone(), scope.ticket());
        spawn_local(async move {
            let outcome = api.send_private(&text).await;
            ticket.apply(|| log.update(|l| l.finish(outcome)));
        });
    });

    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl">
            <h1 class="text-3xl font-bold mb-4">"Chat"</h1>

            {move || {
                history_error.get().map(|message| view! {
                    <div class="mb-4 p-3 bg-red-100 text-red-700 rounded">{message}</div>
                })
            }}

            <div class="bg-white rounded-xl shadow h-[32rem]">
                <ChatWindow log=log on_send=on_send />
            </div>
        </div>
    }
}
