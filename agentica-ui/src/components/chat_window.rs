//! Chat Window Component
//!
//! Message list plus input, shared by the chat page and the guest widget.
//! The owner keeps the [`ChatLog`] and performs the request.

use leptos::html::Div;
use leptos::*;

use agentica::chat::{ChatLog, ChatMessage, Role};

use super::InlineLoading;

#[component]
pub fn ChatWindow(
    #[prop(into)]
    log: Signal<ChatLog>,
    /// Called with the raw input when the user sends
    on_send: Callback<String>,
    #[prop(default = "Type your message...")]
    placeholder: &'static str,
) -> impl IntoView {
    let (input, set_input) = create_signal(String::new());
    let bottom = create_node_ref::<Div>();

    // Keep the newest message in view
    create_effect(move |_| {
        log.with(|l| l.messages().len());
        if let Some(el) = bottom.get() {
            el.scroll_into_view();
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if log.with_untracked(|l| l.can_send(&text)) {
            set_input.set(String::new());
            on_send.call(text);
        }
    };

    view! {
        <div class="flex flex-col h-full">
            <div class="flex-1 overflow-y-auto space-y-3 p-4">
                {move || {
                    log.with(|l| {
                        l.messages()
                            .iter()
                            .cloned()
                            .map(|message| view! { <Bubble message=message /> })
                            .collect_view()
                    })
                }}

                {move || {
                    log.with(ChatLog::is_pending).then(|| view! {
                        <div class="flex items-center space-x-2 text-gray-500 text-sm">
                            <InlineLoading />
                            <span>"Thinking..."</span>
                        </div>
                    })
                }}

                <div node_ref=bottom />
            </div>

            <form on:submit=on_submit class="flex border-t border-gray-200 p-3 space-x-2">
                <input
                    type="text"
                    class="flex-1 border border-gray-300 rounded-md px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-600"
                    placeholder=placeholder
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    disabled=move || log.with(ChatLog::is_pending)
                />
                <button
                    type="submit"
                    class="px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-md disabled:opacity-50"
                    disabled=move || !log.with(|l| l.can_send(&input.get()))
                >
                    "Send"
                </button>
            </form>
        </div>
    }
}

#[component]
fn Bubble(message: ChatMessage) -> impl IntoView {
    let (row, bubble) = match message.role {
        Role::User => ("flex justify-end", "bg-blue-600 text-white"),
        Role::Assistant => ("flex justify-start", "bg-gray-100 text-gray-900"),
    };
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string();

    view! {
        <div class=row>
            <div class=format!("max-w-[75%] rounded-lg px-4 py-2 {}", bubble)>
                <p class="whitespace-pre-wrap">{message.text}</p>
                <span class="block text-xs opacity-70 mt-1">{time}</span>
            </div>
        </div>
    }
}
