//! App Root Component
//!
//! Router, session provider and the layout around every page: navigation
//! bar, footer, toasts and the guest chat widget.

use leptos::*;
use leptos_router::*;

use agentica::routes::{access_for, RouteAccess};
use agentica::Route as Screen;

use crate::components::{GuestChat, Loading, Nav, Toast};
use crate::pages::{ChatPage, DashboardPage, HomePage, LoginPage, RegisterPage};
use crate::state::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_global_state();

    // Read the persisted session once the shell is mounted; until then
    // guarded routes show a spinner and the guest widget stays hidden
    create_effect(move |_| state.hydrate());

    view! {
        <Router>
            <div class="min-h-screen flex flex-col text-gray-900">
                <Nav />

                <main class="flex-1">
                    <Routes>
                        <Route path="/" view=HomePage />
                        <Route
                            path="/login"
                            view=|| view! { <Guarded screen=Screen::Login><LoginPage /></Guarded> }
                        />
                        <Route
                            path="/register"
                            view=|| view! { <Guarded screen=Screen::Register><RegisterPage /></Guarded> }
                        />
                        <Route
                            path="/dashboard"
                            view=|| view! { <Guarded screen=Screen::Dashboard><DashboardPage /></Guarded> }
                        />
                        <Route
                            path="/chat"
                            view=|| view! { <Guarded screen=Screen::Chat><ChatPage /></Guarded> }
                        />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Footer />
                <Toast />
                <GuestChat />
            </div>
        </Router>
    }
}

/// Renders `children` only when the session allows `screen`
#[component]
fn Guarded(screen: Screen, children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let (loading, user) = (state.loading, state.user);
    let access = create_memo(move |_| access_for(screen, loading.get(), user.with(Option::is_some)));

    move || match access.get() {
        RouteAccess::Loading => view! { <Loading /> }.into_view(),
        RouteAccess::Redirect(target) => view! { <Redirect path=target.path() /> }.into_view(),
        RouteAccess::Render => children().into_view(),
    }
}

#[component]
fn Footer() -> impl IntoView {
    let year = chrono::Datelike::year(&chrono::Local::now());
    let back_to_top = move |_: ev::MouseEvent| window().scroll_to_with_x_and_y(0.0, 0.0);

    view! {
        <footer class="bg-gray-100 text-gray-700 border-t border-gray-200">
            <div class="container mx-auto px-4 py-8 flex flex-col md:flex-row justify-between gap-6">
                <div class="space-y-2">
                    <span class="text-2xl font-extrabold text-blue-600">"Agentica"</span>
                    <p class="text-sm max-w-xs">
                        "Chat with your documents. Upload, index, ask."
                    </p>
                </div>

                <ul class="space-y-1 text-sm">
                    <li><A href=Screen::Home.path() class="hover:text-blue-600">"Home"</A></li>
                    <li><A href=Screen::Dashboard.path() class="hover:text-blue-600">"Dashboard"</A></li>
                    <li><A href=Screen::Chat.path() class="hover:text-blue-600">"Chat"</A></li>
                </ul>

                <button class="self-start text-sm hover:text-blue-600" on:click=back_to_top>
                    "Back to top"
                </button>
            </div>
            <div class="bg-gray-200 text-center text-xs text-gray-500 py-4">
                {format!("© {} Agentica. All rights reserved.", year)}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href=Screen::Home.path()
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium"
            >
                "Go Home"
            </A>
        </div>
    }
}
