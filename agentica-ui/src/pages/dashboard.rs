//! Dashboard Page
//!
//! Profile overview, document stats, upload form and the file table.

use leptos::html::Input;
use leptos::*;

use agentica::dashboard::Dashboard;
use agentica::model::{FileRecord, Visibility};

use super::page_scope;
use crate::api::Api;
use crate::components::{InlineLoading, Loading};
use crate::state::GlobalState;

/// Dashboard page component
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let api = Api::new(state.clone());
    let scope = page_scope();

    let dashboard = create_rw_signal(Dashboard::new());
    let (loaded, set_loaded) = create_signal(false);
    let selected = create_rw_signal(None::<web_sys::File>);
    let file_input = create_node_ref::<Input>();

    // Profile and files load side by side; each failure lands in its own slot
    {
        let (api, ticket) = (api.clone(), scope.ticket());
        spawn_local(async move {
            let outcome = api.me().await;
            ticket.apply(|| {
                dashboard.update(|d| match outcome {
                    Ok(user) => d.set_profile(user),
                    Err(e) => d.set_profile_error(e.to_string()),
                });
                set_loaded.set(true);
            });
        });
    }
    {
        let (api, ticket) = (api.clone(), scope.ticket());
        spawn_local(async move {
            let outcome = api.list_files().await;
            ticket.apply(|| {
                dashboard.update(|d| match outcome {
                    Ok(files) => d.set_files(files),
                    Err(e) => d.set_files_error(e.to_string()),
                })
            });
        });
    }

    let on_file = move |ev: ev::Event| {
        let file = event_target::<web_sys::HtmlInputElement>(&ev)
            .files()
            .and_then(|files| files.get(0));
        selected.set(file);
    };

    let on_visibility = move |ev: ev::Event| {
        if let Ok(visibility) = event_target_value(&ev).parse::<Visibility>() {
            dashboard.update(|d| d.set_upload_visibility(visibility));
        }
    };

    let on_upload = {
        let (api, state, scope) = (api.clone(), state.clone(), scope.clone());
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let Some(file) = selected.get_untracked() else {
                return;
            };
            if !dashboard.try_update(|d| d.begin_upload(true)).unwrap_or(false) {
                return;
            }

            let visibility = dashboard.with_untracked(Dashboard::upload_visibility);
            let (api, state, ticket) = (api.clone(), state.clone(), scope.ticket());
            spawn_local(async move {
                let outcome = api.upload_file(&file, visibility).await;
                ticket.apply(|| {
                    if let Ok(record) = &outcome {
                        state.show_success(&format!("Uploaded {}", record.filename));
                        selected.set(None);
                        if let Some(input) = file_input.get_untracked() {
                            input.set_value("");
                        }
                    }
                    dashboard.update(|d| d.finish_upload(outcome));
                });
            });
        }
    };

    let on_process = {
        let (api, state, scope) = (api.clone(), state.clone(), scope.clone());
        Callback::new(move |id: i64| {
            if !dashboard.try_update(|d| d.begin_process(id)).unwrap_or(false) {
                return;
            }

            let (api, state, ticket) = (api.clone(), state.clone(), scope.ticket());
            spawn_local(async move {
                let outcome = api.process_file(id).await;
                ticket.apply(|| {
                    if let Ok(response) = &outcome {
                        state.show_success(
                            response.message.as_deref().unwrap_or("File processed"),
                        );
                    }
                    dashboard.update(|d| d.finish_process(id, outcome.map(|r| r.status)));
                });
            });
        })
    };

    let on_delete = Callback::new(move |id: i64| {
        if !dashboard.try_update(|d| d.begin_delete(id)).unwrap_or(false) {
            return;
        }

        let (api, state, ticket) = (api.clone(), state.clone(), scope.ticket());
        spawn_local(async move {
            let outcome = api.delete_file(id).await;
            ticket.apply(|| {
                if outcome.is_ok() {
                    state.show_success("File deleted");
                }
                dashboard.update(|d| d.finish_delete(id, outcome));
            });
        });
    });

    view! {
        <div class="container mx-auto px-4 py-8 space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-500 mt-1">"Your documents at a glance"</p>
            </div>

            {move || {
                dashboard.with(|d| d.load_error().map(str::to_string)).map(|message| view! {
                    <div class="p-3 bg-red-100 text-red-700 rounded">{message}</div>
                })
            }}

            {move || if loaded.get() {
                view! { <ProfileCard dashboard=dashboard /> }.into_view()
            } else {
                view! { <Loading /> }.into_view()
            }}

            // Stats
            <section class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <StatCard
                    label="Profile Completeness"
                    value=Signal::derive(move || format!("{}%", dashboard.with(Dashboard::completeness)))
                />
                <StatCard
                    label="Uploaded Files"
                    value=Signal::derive(move || dashboard.with(Dashboard::total_files).to_string())
                />
                <StatCard
                    label="Processed Files"
                    value=Signal::derive(move || dashboard.with(Dashboard::processed_files).to_string())
                />
            </section>

            // Upload
            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Upload a New File"</h2>
                <form on:submit=on_upload class="flex flex-col md:flex-row md:items-center gap-4">
                    <input type="file" node_ref=file_input on:change=on_file />
                    <select
                        class="border border-gray-300 rounded-md px-3 py-2"
                        on:change=on_visibility
                    >
                        <option value="Private" selected=true>"Private"</option>
                        <option value="Public">"Public"</option>
                    </select>
                    <button
                        type="submit"
                        class="px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-md disabled:opacity-50"
                        disabled=move || {
                            let ready = selected.with(Option::is_some);
                            !dashboard.with(|d| d.upload_state().can_submit(ready))
                        }
                    >
                        {move || if dashboard.with(|d| d.upload_state().is_pending()) {
                            view! { <InlineLoading /> " Uploading..." }.into_view()
                        } else {
                            "Upload".into_view()
                        }}
                    </button>
                </form>
                {move || {
                    dashboard
                        .with(|d| d.upload_state().error().map(str::to_string))
                        .map(|message| view! { <p class="mt-3 text-red-600 text-sm">{message}</p> })
                }}
            </section>

            // Files
            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Your Files"</h2>
                {move || {
                    dashboard.with(|d| d.files_error().map(str::to_string)).map(|message| view! {
                        <p class="mb-3 text-red-600 text-sm">{message}</p>
                    })
                }}
                <table class="w-full text-sm">
                    <thead>
                        <tr class="border-b text-gray-600">
                            <th class="p-3 text-left">"File"</th>
                            <th class="p-3 text-left">"Visibility"</th>
                            <th class="p-3 text-left">"Status"</th>
                            <th class="p-3 text-left">"Uploaded"</th>
                            <th class="p-3 text-left">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let files = dashboard.with(|d| d.files().to_vec());
                            if files.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan="5" class="p-6 text-center text-gray-500">
                                            "No files uploaded yet."
                                        </td>
                                    </tr>
                                }
                                .into_view();
                            }

                            files
                                .into_iter()
                                .map(|file| view! {
                                    <FileRow
                                        file=file
                                        dashboard=dashboard
                                        on_process=on_process
                                        on_delete=on_delete
                                    />
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </section>
        </div>
    }
}

#[component]
fn ProfileCard(dashboard: RwSignal<Dashboard>) -> impl IntoView {
    let profile = move || dashboard.with(|d| d.profile().cloned());

    move || {
        profile().map(|user| {
            let details = user.profile.clone().unwrap_or_default();
            let field = |value: Option<&str>| value.unwrap_or("Not set").to_string();

            view! {
                <section class="bg-white rounded-xl shadow p-6 flex items-center gap-6">
                    {details.photo().map(|src| view! {
                        <img src=src.to_string() alt="Profile photo" class="w-20 h-20 rounded-full object-cover" />
                    })}
                    <div class="space-y-1">
                        <h2 class="text-xl font-semibold">{user.username.clone()}</h2>
                        <p class="text-gray-600">{user.email.clone().unwrap_or_default()}</p>
                        <p class="text-gray-600">"Address: " {field(details.address())}</p>
                        <p class="text-gray-600">"Phone: " {field(details.phone())}</p>
                    </div>
                </section>
            }
        })
    }
}

#[component]
fn StatCard(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-6">
            <p class="text-sm text-gray-500">{label}</p>
            <p class="text-3xl font-bold mt-2">{move || value.get()}</p>
        </div>
    }
}

#[component]
fn FileRow(
    file: FileRecord,
    dashboard: RwSignal<Dashboard>,
    on_process: Callback<i64>,
    on_delete: Callback<i64>,
) -> impl IntoView {
    let id = file.id;
    let can_process = dashboard.with_untracked(|d| d.can_process(&file));
    let busy = move || dashboard.with(|d| d.processing().is_some());
    let in_flight = move || dashboard.with(|d| d.processing() == Some(id));
    let deleting = move || dashboard.with(|d| d.deleting().is_some());
    let delete_in_flight = move || dashboard.with(|d| d.deleting() == Some(id));
    let uploaded = file
        .uploaded_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    let visibility = file
        .information_type_display
        .clone()
        .unwrap_or_else(|| file.information_type.to_string());

    view! {
        <tr class="border-b">
            <td class="p-3">{file.filename.clone()}</td>
            <td class="p-3">{visibility}</td>
            <td class="p-3">{file.status.to_string()}</td>
            <td class="p-3">{uploaded}</td>
            <td class="p-3 space-x-2">
                {can_process.then(|| view! {
                    <button
                        class="px-3 py-1 bg-green-600 hover:bg-green-700 text-white rounded disabled:opacity-50"
                        disabled=busy
                        on:click=move |_| on_process.call(id)
                    >
                        {move || if in_flight() {
                            view! { <InlineLoading /> " Processing..." }.into_view()
                        } else {
                            "Process".into_view()
                        }}
                    </button>
                })}
                <button
                    class="px-3 py-1 bg-red-600 hover:bg-red-700 text-white rounded disabled:opacity-50"
                    disabled=deleting
                    on:click=move |_| on_delete.call(id)
                >
                    {move || if delete_in_flight() {
                        view! { <InlineLoading /> " Deleting..." }.into_view()
                    } else {
                        "Delete".into_view()
                    }}
                </button>
            </td>
        </tr>
    }
}
