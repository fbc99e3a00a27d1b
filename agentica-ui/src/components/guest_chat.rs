//! Guest Chat Widget
//!
//! Floating launcher and panel over the public chat endpoint. Rendered only
//! for visitors once the session has been read.

use leptos::*;

use agentica::guest::{GuestVisibility, GuestWidget};

use super::ChatWindow;
use crate::api::Api;
use crate::state::GlobalState;

#[component]
pub fn GuestChat() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let (loading, user) = (state.loading, state.user);
    let api = Api::new(state);

    // Lives with the layout, so the conversation survives navigation
    let widget = create_rw_signal(GuestWidget::new());
    let visibility = create_memo(move |_| {
        widget.with(|w| w.visibility_for(loading.get(), user.with(Option::is_some)))
    });
    let log = Signal::derive(move || widget.with(|w| w.chat().clone()));

    let on_send = Callback::new(move |input: String| {
        let Some(text) = widget.try_update(|w| w.chat_mut().begin_send(&input)).flatten() else {
            return;
        };

        let api = api.clone();
        spawn_local(async move {
            let outcome = api.send_public(&text).await;
            if let Err(e) = &outcome {
                web_sys::console::warn_1(&format!("Guest chat failed: {}", e).into());
            }
            widget.update(|w| w.chat_mut().finish(outcome));
        });
    });

    let toggle = move |_: ev::MouseEvent| widget.update(GuestWidget::toggle);

    move || match visibility.get() {
        GuestVisibility::Hidden => view! {}.into_view(),
        GuestVisibility::Collapsed => view! {
            <button
                class="fixed bottom-6 right-6 z-40 w-14 h-14 rounded-full bg-blue-600 hover:bg-blue-700 text-white text-2xl shadow-lg"
                title="Chat with us"
                on:click=toggle
            >
                "💬"
            </button>
        }
        .into_view(),
        GuestVisibility::Expanded => view! {
            <div class="fixed bottom-6 right-6 z-40 w-80 h-[28rem] bg-white rounded-xl shadow-2xl flex flex-col">
                <div class="flex items-center justify-between px-4 py-3 bg-blue-600 text-white rounded-t-xl">
                    <span class="font-semibold">"Agentica Assistant"</span>
                    <button class="text-xl" title="Close" on:click=toggle>"✕"</button>
                </div>
                <div class="flex-1 min-h-0">
                    <ChatWindow log=log on_send=on_send placeholder="Ask about our public documents..." />
                </div>
            </div>
        }
        .into_view(),
    }
}
